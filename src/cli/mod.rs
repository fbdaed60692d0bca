//! Command-line interface for divset.
//!
//! Provides commands for computing coincidence counters and index tables
//! over a fingerprint matrix, and for running greedy diversity selection.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
