//! Column weight schemes.
//!
//! Weights are functions of the per-column distance from balance
//! `d = |2s - n|`. Similar columns (beyond the coincidence threshold) use
//! the similarity weight; balanced columns use the dissimilarity weight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};

/// Weight function applied to column distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum WeightScheme {
    /// `sim: d / n`, `dis: 1 - (d - n mod 2) / n`.
    #[default]
    Fraction,
    /// `sim: k^-(n - d)`, `dis: k^-(d - n mod 2)` for a positive base `k`.
    Power(u32),
    /// Unit weights: weighted counters equal the unweighted ones.
    Identity,
}

impl WeightScheme {
    /// Builds a power scheme, rejecting a non-positive base.
    pub fn power(k: u32) -> Result<Self, ValidationError> {
        if k == 0 {
            Err(ValidationError::NonPositivePower)
        } else {
            Ok(Self::Power(k))
        }
    }

    /// Weight contributed by a similar column at distance `d`.
    pub fn sim_weight(&self, d: u64, n: u64) -> f64 {
        match *self {
            Self::Fraction => d as f64 / n as f64,
            Self::Power(k) => f64::from(k).powf(-((n - d) as f64)),
            Self::Identity => 1.0,
        }
    }

    /// Weight contributed by a dissimilar column at distance `d`.
    pub fn dis_weight(&self, d: u64, n: u64) -> f64 {
        // d and n share parity, so this never goes negative for real columns.
        let adjusted = d as f64 - (n % 2) as f64;
        match *self {
            Self::Fraction => 1.0 - adjusted / n as f64,
            Self::Power(k) => f64::from(k).powf(-adjusted),
            Self::Identity => 1.0,
        }
    }
}

impl fmt::Display for WeightScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fraction => write!(f, "fraction"),
            Self::Power(k) => write!(f, "power_{k}"),
            Self::Identity => write!(f, "identity"),
        }
    }
}

impl FromStr for WeightScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        match text.as_str() {
            "fraction" => Ok(Self::Fraction),
            "identity" | "none" | "1" => Ok(Self::Identity),
            _ => {
                if let Some(suffix) = text.strip_prefix("power_") {
                    let k: u32 = suffix
                        .parse()
                        .map_err(|_| ConfigError::UnknownWeightFactor(s.to_string()))?;
                    return Self::power(k)
                        .map_err(|_| ConfigError::UnknownWeightFactor(s.to_string()));
                }
                Err(ConfigError::UnknownWeightFactor(s.to_string()))
            }
        }
    }
}

impl TryFrom<String> for WeightScheme {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeightScheme> for String {
    fn from(value: WeightScheme) -> Self {
        value.to_string()
    }
}
