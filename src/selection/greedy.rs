//! The greedy diversity-selection loop.

use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::{debug, warn};

use crate::counters::Counters;
use crate::error::ValidationError;
use crate::fingerprint::FingerprintSet;
use crate::selection::{seed::select_seed, tie::break_tie, SelectionConfig};

/// One iteration of the greedy loop.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SelectionStep {
    /// Index chosen this iteration.
    pub chosen: usize,
    /// n-ary similarity of the selected set after adding it.
    pub value: f64,
    /// Number of candidates that tied at the minimum.
    pub tie_size: usize,
}

/// Outcome of a diversity-selection run.
///
/// `selected` records the greedy construction order, not sorted order;
/// its first element is always the seed.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult {
    pub seed: usize,
    pub selected: Vec<usize>,
    pub steps: Vec<SelectionStep>,
}

/// Greedy selector: repeatedly extends the selected set with the
/// candidate whose addition minimizes the configured n-ary similarity.
#[derive(Debug, Clone)]
pub struct DiversitySelector {
    config: SelectionConfig,
}

impl DiversitySelector {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Runs the selection over `set`.
    ///
    /// The running column-sum aggregate is updated incrementally as
    /// members are added; candidate evaluation reads it without mutating
    /// it, so each iteration's minimum/tie-set reduction is deterministic
    /// in candidate index order.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the target size is zero or
    /// exceeds the pool, or if a trial aggregate fails counter
    /// validation (for example a fixed threshold at or above the trial
    /// population size).
    pub fn run(&self, set: &FingerprintSet) -> Result<SelectionResult, ValidationError> {
        let pool = set.len();
        let target = self.config.target_size;
        if target == 0 {
            return Err(ValidationError::EmptySelection);
        }
        if target > pool {
            return Err(ValidationError::SelectionTooLarge {
                requested: target,
                pool,
            });
        }

        let seed = select_seed(
            set,
            self.config.seed_mode,
            self.config.index,
            self.config.weight_mode,
            self.config.rng_seed,
        )?;
        debug!(seed, mode = %self.config.seed_mode, "selection seeded");

        let mut selected = Vec::with_capacity(target);
        let mut is_selected = vec![false; pool];
        selected.push(seed);
        is_selected[seed] = true;
        // Maintained incrementally from here on, never recomputed.
        let mut running = crate::fingerprint::ColumnSums::of_row(set.row(seed));

        let mut steps = Vec::with_capacity(target - 1);
        while selected.len() < target {
            let mut evaluations = Vec::with_capacity(pool - selected.len());
            for candidate in 0..pool {
                if is_selected[candidate] {
                    continue;
                }
                let trial = running.plus_row(set.row(candidate));
                let counters = Counters::from_column_sums(
                    &trial,
                    self.config.threshold,
                    self.config.w_factor,
                )?;
                let value = self.config.index.evaluate(&counters, self.config.weight_mode);
                evaluations.push((candidate, value));
            }

            let best = evaluations
                .iter()
                .filter(|(_, v)| v.is_finite())
                .min_by_key(|&&(_, v)| OrderedFloat(v))
                .copied();
            let (tied, value) = match best {
                Some((_, minimum)) => {
                    let tied: Vec<usize> = evaluations
                        .iter()
                        .filter(|&&(_, v)| v == minimum)
                        .map(|&(candidate, _)| candidate)
                        .collect();
                    (tied, minimum)
                }
                None => {
                    // Every candidate degenerated to a non-finite value;
                    // keep the run alive deterministically.
                    warn!(
                        step = selected.len(),
                        "all candidate similarities non-finite; taking first candidate"
                    );
                    (vec![evaluations[0].0], evaluations[0].1)
                }
            };

            let chosen = if tied.len() == 1 {
                tied[0]
            } else {
                break_tie(set, &tied, &selected, self.config.index)?
            };

            debug!(
                step = selected.len(),
                chosen,
                value,
                tie_size = tied.len(),
                "greedy step"
            );
            steps.push(SelectionStep {
                chosen,
                value,
                tie_size: tied.len(),
            });
            running.add_row_in_place(set.row(chosen));
            selected.push(chosen);
            is_selected[chosen] = true;
        }

        Ok(SelectionResult {
            seed,
            selected,
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::CoincidenceThreshold;
    use crate::indices::IndexKind;
    use crate::selection::SeedMode;

    fn sample_set() -> FingerprintSet {
        FingerprintSet::from_rows(&[
            vec![1, 1, 1, 0, 0, 0],
            vec![1, 1, 0, 0, 0, 0],
            vec![1, 1, 1, 1, 0, 0],
            vec![0, 0, 0, 1, 1, 1],
            vec![0, 0, 0, 0, 1, 1],
            vec![1, 0, 1, 0, 1, 0],
        ])
        .unwrap()
    }

    fn config(target: usize) -> SelectionConfig {
        SelectionConfig {
            target_size: target,
            ..SelectionConfig::default()
        }
    }

    #[test]
    fn test_selects_requested_count_without_duplicates() {
        let result = DiversitySelector::new(config(4)).run(&sample_set()).unwrap();
        assert_eq!(result.selected.len(), 4);
        let mut unique = result.selected.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 4);
        assert_eq!(result.selected[0], result.seed);
        assert_eq!(result.steps.len(), 3);
    }

    #[test]
    fn test_full_pool_selection_is_permutation() {
        let set = sample_set();
        let result = DiversitySelector::new(config(set.len())).run(&set).unwrap();
        let mut sorted = result.selected.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..set.len()).collect::<Vec<_>>());
        assert_eq!(result.selected[0], result.seed);
    }

    #[test]
    fn test_deterministic_for_medoid_seeding() {
        let set = sample_set();
        let first = DiversitySelector::new(config(5)).run(&set).unwrap();
        let second = DiversitySelector::new(config(5)).run(&set).unwrap();
        assert_eq!(first.selected, second.selected);
    }

    #[test]
    fn test_random_seeding_reproducible_with_rng_seed() {
        let set = sample_set();
        let cfg = SelectionConfig {
            seed_mode: SeedMode::Random,
            rng_seed: Some(99),
            target_size: 4,
            ..SelectionConfig::default()
        };
        let first = DiversitySelector::new(cfg.clone()).run(&set).unwrap();
        let second = DiversitySelector::new(cfg).run(&set).unwrap();
        assert_eq!(first.selected, second.selected);
    }

    #[test]
    fn test_duplicate_candidates_tie_break_stably() {
        // Rows 2 and 3 are identical: whenever both remain, their trial
        // values tie exactly and the earlier index must win.
        let set = FingerprintSet::from_rows(&[
            vec![1, 1, 1, 1, 0, 0],
            vec![1, 1, 1, 0, 0, 0],
            vec![0, 0, 0, 0, 1, 1],
            vec![0, 0, 0, 0, 1, 1],
        ])
        .unwrap();
        let result = DiversitySelector::new(config(4)).run(&set).unwrap();
        let pos_2 = result.selected.iter().position(|&i| i == 2).unwrap();
        let pos_3 = result.selected.iter().position(|&i| i == 3).unwrap();
        assert!(pos_2 < pos_3, "earlier duplicate must be selected first");
    }

    #[test]
    fn test_rejects_oversized_target() {
        let err = DiversitySelector::new(config(7)).run(&sample_set()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::SelectionTooLarge {
                requested: 7,
                pool: 6
            }
        ));
    }

    #[test]
    fn test_rejects_zero_target() {
        let err = DiversitySelector::new(config(0)).run(&sample_set()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptySelection));
    }

    #[test]
    fn test_fixed_threshold_propagates_trial_validation() {
        // Threshold 2 is valid for the full pool but not for the first
        // trial population of 2.
        let set = sample_set();
        let cfg = SelectionConfig {
            threshold: CoincidenceThreshold::Fixed(2),
            seed_mode: SeedMode::Random,
            rng_seed: Some(1),
            target_size: 3,
            ..SelectionConfig::default()
        };
        let err = DiversitySelector::new(cfg).run(&set).unwrap_err();
        assert!(matches!(err, ValidationError::ThresholdTooLarge { .. }));
    }

    #[test]
    fn test_weighted_mode_runs() {
        let set = sample_set();
        let cfg = SelectionConfig {
            index: IndexKind::SokalMichener,
            weight_mode: crate::indices::WeightMode::Weighted,
            target_size: 4,
            ..SelectionConfig::default()
        };
        let result = DiversitySelector::new(cfg).run(&set).unwrap();
        assert_eq!(result.selected.len(), 4);
        for step in &result.steps {
            assert!(step.value.is_finite());
        }
    }
}
