//! Starting-point selection for the greedy loop.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::counters::{CoincidenceThreshold, Counters, WeightScheme};
use crate::error::{ConfigError, ValidationError};
use crate::fingerprint::FingerprintSet;
use crate::indices::{IndexKind, WeightMode};

/// How the first selected fingerprint is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// Most representative member: minimum leave-one-out similarity.
    #[default]
    Medoid,
    /// Uniform random member.
    Random,
    /// Least representative member: maximum leave-one-out similarity.
    Outlier,
}

impl fmt::Display for SeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Medoid => write!(f, "medoid"),
            Self::Random => write!(f, "random"),
            Self::Outlier => write!(f, "outlier"),
        }
    }
}

impl FromStr for SeedMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "medoid" => Ok(Self::Medoid),
            "random" => Ok(Self::Random),
            "outlier" | "out" => Ok(Self::Outlier),
            _ => Err(ConfigError::UnknownSeedMode(s.to_string())),
        }
    }
}

/// Picks the starting fingerprint for a selection run.
///
/// `medoid` and `outlier` score each fingerprint by the n-ary similarity
/// of the collection with that fingerprint removed (leave-one-out
/// aggregate, population `n - 1`). The leave-one-out comparison always
/// uses the unset threshold and fraction weights; only the index and
/// weight mode follow the run configuration. The medoid is the
/// fingerprint whose removal yields the
/// *minimum* remaining similarity, the outlier the maximum; ties go to
/// the lowest index. Non-finite scores are skipped.
///
/// `random` draws uniformly, reproducibly when `rng_seed` is given.
pub fn select_seed(
    set: &FingerprintSet,
    mode: SeedMode,
    index: IndexKind,
    weight_mode: WeightMode,
    rng_seed: Option<u64>,
) -> Result<usize, ValidationError> {
    match mode {
        SeedMode::Random => {
            let mut rng = match rng_seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_rng(&mut rand::rng()),
            };
            Ok(rng.random_range(0..set.len()))
        }
        SeedMode::Medoid => {
            let scores = leave_one_out_scores(set, index, weight_mode)?;
            let (best, value) = scores
                .iter()
                .filter(|(_, v)| v.is_finite())
                .min_by_key(|&&(_, v)| OrderedFloat(v))
                .copied()
                .unwrap_or((0, f64::NAN));
            debug!(seed = best, similarity = value, "medoid seed selected");
            Ok(best)
        }
        SeedMode::Outlier => {
            let scores = leave_one_out_scores(set, index, weight_mode)?;
            // Reverse keeps the first-encountered member on ties, which a
            // plain max_by_key would not.
            let (best, value) = scores
                .iter()
                .filter(|(_, v)| v.is_finite())
                .min_by_key(|&&(_, v)| Reverse(OrderedFloat(v)))
                .copied()
                .unwrap_or((0, f64::NAN));
            debug!(seed = best, similarity = value, "outlier seed selected");
            Ok(best)
        }
    }
}

/// Leave-one-out similarity of the collection for every member.
fn leave_one_out_scores(
    set: &FingerprintSet,
    index: IndexKind,
    weight_mode: WeightMode,
) -> Result<Vec<(usize, f64)>, ValidationError> {
    let total = set.column_sums();
    let mut scores = Vec::with_capacity(set.len());
    for i in 0..set.len() {
        let without = total.minus_row(set.row(i));
        let counters = Counters::from_column_sums(
            &without,
            CoincidenceThreshold::None,
            WeightScheme::Fraction,
        )?;
        scores.push((i, index.evaluate(&counters, weight_mode)));
    }
    Ok(scores)
}
