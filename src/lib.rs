//! divset: n-ary fingerprint similarity counters and greedy diversity
//! subset selection.
//!
//! This library generalizes pairwise binary-fingerprint comparison to
//! collections of arbitrary size through a coincidence-counting engine,
//! evaluates a catalog of named similarity indices over the resulting
//! counters, and greedily selects a diverse subset of a fingerprint pool
//! by minimizing the n-ary similarity of the growing selection.

pub mod cli;
pub mod counters;
pub mod error;
pub mod fingerprint;
pub mod indices;
pub mod selection;

// Re-export commonly used types
pub use counters::{CoincidenceThreshold, Counters, WeightScheme};
pub use error::{ConfigError, ValidationError};
pub use fingerprint::{ColumnSums, FingerprintSet};
pub use indices::{full_table, IndexKind, IndexTable, WeightMode};
pub use selection::{
    select_seed, DiversitySelector, SeedMode, SelectionConfig, SelectionResult,
};
