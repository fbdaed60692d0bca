//! Coincidence threshold resolution.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};

/// Cutoff separating columns dominated by one value from balanced columns.
///
/// The threshold is specified symbolically and resolved against a concrete
/// population size `n`, because the greedy selector re-resolves it for
/// every trial population as the selected set grows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CoincidenceThreshold {
    /// Default: resolves to `n mod 2`.
    #[default]
    None,
    /// Dissimilar mode: resolves to `ceil(n / 2)`.
    Dissimilar,
    /// Explicit cutoff, used as-is. Must be smaller than `n`.
    Fixed(u64),
    /// Relative cutoff in `(0, 1)`, scaled by `n` at resolution time.
    Fraction(f64),
}

impl CoincidenceThreshold {
    /// Builds a relative threshold, rejecting values outside `(0, 1)`.
    pub fn fraction(value: f64) -> Result<Self, ConfigError> {
        if value > 0.0 && value < 1.0 {
            Ok(Self::Fraction(value))
        } else {
            Err(ConfigError::InvalidThreshold(value.to_string()))
        }
    }

    /// Resolves the threshold for a population of `n` fingerprints.
    ///
    /// The resolved value always lies in `[0, n)`; a fixed cutoff at or
    /// above `n` is a [`ValidationError`].
    pub fn resolve(&self, n: u64) -> Result<f64, ValidationError> {
        match *self {
            Self::None => Ok((n % 2) as f64),
            Self::Dissimilar => Ok((n as f64 / 2.0).ceil()),
            Self::Fixed(t) => {
                if t >= n {
                    Err(ValidationError::ThresholdTooLarge {
                        threshold: t as f64,
                        n,
                    })
                } else {
                    Ok(t as f64)
                }
            }
            Self::Fraction(f) => {
                // The variant is public, so the (0, 1) bound enforced by
                // `fraction()` must be re-checked here.
                let scaled = f * n as f64;
                if (0.0..n as f64).contains(&scaled) {
                    Ok(scaled)
                } else {
                    Err(ValidationError::ThresholdTooLarge {
                        threshold: scaled,
                        n,
                    })
                }
            }
        }
    }
}

impl fmt::Display for CoincidenceThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Dissimilar => write!(f, "dissimilar"),
            Self::Fixed(t) => write!(f, "{t}"),
            Self::Fraction(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for CoincidenceThreshold {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "min" => Ok(Self::None),
            "dissimilar" => Ok(Self::Dissimilar),
            text => {
                if let Ok(t) = text.parse::<u64>() {
                    return Ok(Self::Fixed(t));
                }
                if let Ok(v) = text.parse::<f64>() {
                    return Self::fraction(v)
                        .map_err(|_| ConfigError::InvalidThreshold(s.to_string()));
                }
                Err(ConfigError::InvalidThreshold(s.to_string()))
            }
        }
    }
}

impl Serialize for CoincidenceThreshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::None => serializer.serialize_str("none"),
            Self::Dissimilar => serializer.serialize_str("dissimilar"),
            Self::Fixed(t) => serializer.serialize_u64(t),
            Self::Fraction(v) => serializer.serialize_f64(v),
        }
    }
}

impl<'de> Deserialize<'de> for CoincidenceThreshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(u64),
            Float(f64),
            Text(String),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(Self::None),
            Some(Repr::Int(t)) => Ok(Self::Fixed(t)),
            Some(Repr::Float(v)) => {
                if v.fract() == 0.0 && v >= 0.0 {
                    Ok(Self::Fixed(v as u64))
                } else {
                    Self::fraction(v).map_err(de::Error::custom)
                }
            }
            Some(Repr::Text(s)) => s.parse().map_err(de::Error::custom),
        }
    }
}
