//! Coincidence counting engine.
//!
//! Reduces a column-sum aggregate to the ten similarity/dissimilarity
//! counters every catalog index is a pure function of. Each column is
//! classified against a coincidence threshold by its signed distance from
//! balance `2s - n`:
//!
//! - `2s - n > threshold`  → 1-similar (majority of 1s)
//! - `n - 2s > threshold`  → 0-similar (majority of 0s)
//! - otherwise             → dissimilar (balanced column)
//!
//! Unweighted counters count columns; weighted counters accumulate a
//! per-column weight derived from `d = |2s - n|` through the configured
//! [`WeightScheme`]. Counters are computed fresh per (aggregate,
//! threshold, weight scheme) combination and are immutable once produced.

pub mod engine;
pub mod threshold;
pub mod weights;

pub use engine::Counters;
pub use threshold::CoincidenceThreshold;
pub use weights::WeightScheme;
