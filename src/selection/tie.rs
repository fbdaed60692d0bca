//! Tie resolution through average pairwise similarity.

use ordered_float::OrderedFloat;
use tracing::trace;

use crate::counters::{CoincidenceThreshold, Counters, WeightScheme};
use crate::error::ValidationError;
use crate::fingerprint::{ColumnSums, FingerprintSet};
use crate::indices::{IndexKind, WeightMode};

/// Resolves a tie between equally-good candidates.
///
/// Each tied candidate is scored by its pairwise (n = 2) similarity to
/// every already-selected fingerprint, averaged; the candidate with the
/// minimum average wins. The pairwise comparisons always use the unset
/// threshold, fraction weights, and the unweighted index variant,
/// regardless of the outer run configuration. A persistent tie goes to
/// the first candidate in the
/// original iteration order; if every average is non-finite the first
/// candidate wins outright.
pub(crate) fn break_tie(
    set: &FingerprintSet,
    tied: &[usize],
    selected: &[usize],
    index: IndexKind,
) -> Result<usize, ValidationError> {
    debug_assert!(!tied.is_empty());
    let mut averages = Vec::with_capacity(tied.len());
    for &candidate in tied {
        let mut total = 0.0;
        for &member in selected {
            let pair = ColumnSums::pair(set.row(member), set.row(candidate));
            let counters = Counters::from_column_sums(
                &pair,
                CoincidenceThreshold::None,
                WeightScheme::Fraction,
            )?;
            total += index.evaluate(&counters, WeightMode::Unweighted);
        }
        let average = total / selected.len() as f64;
        trace!(candidate, average, "tie-break pairwise average");
        averages.push((candidate, average));
    }

    Ok(averages
        .iter()
        .filter(|(_, v)| v.is_finite())
        .min_by_key(|&&(_, v)| OrderedFloat(v))
        .map(|&(candidate, _)| candidate)
        .unwrap_or(tied[0]))
}
