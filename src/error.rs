//! Error types for divset operations.
//!
//! Two error families cover the library boundary:
//! - [`ConfigError`] for unrecognized option names and malformed option
//!   shapes, rejected eagerly at configuration-load time.
//! - [`ValidationError`] for data that violates an invariant of the
//!   counting or selection algorithms, rejected before any counting work
//!   begins.
//!
//! Numeric degeneracies inside index formulas (zero denominators) are not
//! errors: the affected index evaluates to a non-finite sentinel (`NaN` or
//! infinity) and callers skip such entries.

use thiserror::Error;

/// Errors raised while interpreting run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown similarity index '{0}'")]
    UnknownIndex(String),

    #[error("Unknown weight factor '{0}': expected 'fraction', 'power_<k>', or 'identity'")]
    UnknownWeightFactor(String),

    #[error("Unknown weight mode '{0}': expected 'weighted' or 'unweighted'")]
    UnknownWeightMode(String),

    #[error("Unknown seed mode '{0}': expected 'medoid', 'random', or 'outlier'")]
    UnknownSeedMode(String),

    #[error(
        "Invalid coincidence threshold '{0}': expected 'none', 'dissimilar', \
         a non-negative integer, or a fraction in (0, 1)"
    )]
    InvalidThreshold(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when input data breaks an algorithm invariant.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("A minimum of 2 fingerprints must be provided, got {0}")]
    TooFewFingerprints(usize),

    #[error(
        "All fingerprints must have the same length: fingerprint {index} \
         has length {actual}, expected {expected}"
    )]
    LengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Fingerprint {index} position {position} holds {value}: entries must be 0 or 1")]
    NonBinaryValue {
        index: usize,
        position: usize,
        value: u8,
    },

    #[error("Population size must be at least 2, got {0}")]
    PopulationTooSmall(u64),

    #[error("Coincidence threshold {threshold} must lie in [0, population size {n})")]
    ThresholdTooLarge { threshold: f64, n: u64 },

    #[error("Column sum {sum} at position {position} exceeds the population size {n}")]
    ColumnSumOutOfRange { position: usize, sum: u64, n: u64 },

    #[error("Weighting power must be a positive integer")]
    NonPositivePower,

    #[error("Theoretical population size {0} overflows the binomial counters (maximum 67)")]
    BinomialOverflow(u64),

    #[error("Selection size {requested} exceeds the pool size {pool}")]
    SelectionTooLarge { requested: usize, pool: usize },

    #[error("Selection size must be at least 1")]
    EmptySelection,
}
