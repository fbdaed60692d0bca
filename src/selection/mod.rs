//! Greedy diversity selection.
//!
//! Builds an ordered subset of a fingerprint pool by repeatedly adding the
//! candidate that minimizes the n-ary similarity of the growing set:
//!
//! 1. [`seed`] picks the starting fingerprint (medoid, outlier, or random).
//! 2. [`greedy`] extends the selection one fingerprint per iteration,
//!    maintaining the running column-sum aggregate incrementally.
//! 3. [`tie`] resolves exact-value ties through average pairwise
//!    similarity against the already-selected set.
//!
//! The whole run is synchronous and owns its state; results are
//! deterministic for `medoid`/`outlier` seeding and reproducible for
//! `random` seeding given an explicit RNG seed.

pub mod greedy;
pub mod seed;
pub mod tie;

use serde::{Deserialize, Serialize};

pub use greedy::{DiversitySelector, SelectionResult, SelectionStep};
pub use seed::{select_seed, SeedMode};

use crate::counters::{CoincidenceThreshold, WeightScheme};
use crate::indices::{IndexKind, WeightMode};

/// Configuration for one diversity-selection run.
///
/// Deserializable from a YAML run file; unspecified fields take the
/// standard defaults (Russell-Rao, unweighted, unset threshold, fraction
/// weights, medoid seeding, ten picks).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// n-ary index minimized at every step.
    pub index: IndexKind,
    /// Weighted or unweighted index variant.
    pub weight_mode: WeightMode,
    /// Coincidence threshold, re-resolved per trial population size.
    pub threshold: CoincidenceThreshold,
    /// Column weight scheme for the counters.
    pub w_factor: WeightScheme,
    /// How the starting fingerprint is chosen.
    pub seed_mode: SeedMode,
    /// Number of fingerprints to select, seed included.
    pub target_size: usize,
    /// RNG seed for `random` seeding; `None` draws from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            index: IndexKind::RussellRao,
            weight_mode: WeightMode::Unweighted,
            threshold: CoincidenceThreshold::None,
            w_factor: WeightScheme::Fraction,
            seed_mode: SeedMode::Medoid,
            target_size: 10,
            rng_seed: None,
        }
    }
}
