//! End-to-end tests of the public library surface: fingerprint loading,
//! counter computation, index evaluation, and full greedy selection runs.

use divset::{
    full_table, CoincidenceThreshold, Counters, DiversitySelector, FingerprintSet, IndexKind,
    SeedMode, SelectionConfig, ValidationError, WeightMode, WeightScheme,
};

fn sample_pool() -> FingerprintSet {
    FingerprintSet::from_rows(&[
        vec![1, 1, 0, 0, 1, 0, 1, 0],
        vec![1, 0, 0, 1, 1, 0, 0, 0],
        vec![0, 1, 1, 0, 0, 1, 1, 1],
        vec![1, 1, 1, 1, 0, 0, 0, 1],
        vec![0, 0, 0, 0, 1, 1, 1, 0],
        vec![1, 1, 0, 0, 1, 0, 1, 1],
        vec![0, 0, 1, 1, 0, 1, 0, 1],
        vec![1, 0, 1, 0, 1, 0, 1, 0],
    ])
    .unwrap()
}

#[test]
fn counters_from_observed_matrix() {
    let set = FingerprintSet::from_rows(&[
        vec![1, 1, 0],
        vec![1, 0, 0],
        vec![1, 1, 1],
        vec![0, 0, 0],
    ])
    .unwrap();
    // Column sums [3, 2, 1] over n = 4, threshold n % 2 = 0: the first
    // column is 1-similar (signed = 2), the last 0-similar (signed = -2),
    // the middle balanced and dissimilar.
    let counters = Counters::from_column_sums(
        &set.column_sums(),
        CoincidenceThreshold::None,
        WeightScheme::Fraction,
    )
    .unwrap();
    assert_eq!(counters.a, 1);
    assert_eq!(counters.d, 1);
    assert_eq!(counters.total_sim, 2);
    assert_eq!(counters.total_dis, 1);
    assert_eq!(counters.p, 3);
    assert!((counters.w_a - 0.5).abs() < 1e-12);
    assert!((counters.w_d - 0.5).abs() < 1e-12);
    assert!((counters.w_p - 2.0).abs() < 1e-12);
}

#[test]
fn full_table_is_consistent_with_direct_evaluation() {
    let set = sample_pool();
    let counters = Counters::from_column_sums(
        &set.column_sums(),
        CoincidenceThreshold::None,
        WeightScheme::Fraction,
    )
    .unwrap();
    let table = full_table(&counters);
    for kind in IndexKind::ALL {
        let direct = kind.evaluate(&counters, WeightMode::Unweighted);
        let tabled = table.unweighted[kind.abbreviation()];
        assert!(
            direct == tabled || (direct.is_nan() && tabled.is_nan()),
            "{kind}: {direct} vs {tabled}"
        );
    }
}

#[test]
fn full_pool_selection_is_a_permutation() {
    let set = sample_pool();
    let config = SelectionConfig {
        target_size: set.len(),
        ..SelectionConfig::default()
    };
    let result = DiversitySelector::new(config).run(&set).unwrap();

    assert_eq!(result.selected.len(), set.len());
    assert_eq!(result.selected[0], result.seed);
    let mut sorted = result.selected.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..set.len()).collect::<Vec<_>>());
    // One step per pick after the seed.
    assert_eq!(result.steps.len(), set.len() - 1);
}

#[test]
fn selection_grows_without_duplicates() {
    let set = sample_pool();
    let config = SelectionConfig {
        index: IndexKind::JaccardTanimoto,
        target_size: 5,
        ..SelectionConfig::default()
    };
    let result = DiversitySelector::new(config).run(&set).unwrap();

    assert_eq!(result.selected.len(), 5);
    let mut seen = result.selected.clone();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 5);
}

#[test]
fn medoid_runs_are_deterministic() {
    let set = sample_pool();
    let config = SelectionConfig {
        index: IndexKind::SokalMichener,
        target_size: 6,
        ..SelectionConfig::default()
    };
    let first = DiversitySelector::new(config.clone()).run(&set).unwrap();
    let second = DiversitySelector::new(config).run(&set).unwrap();
    assert_eq!(first.selected, second.selected);
    assert_eq!(first.seed, second.seed);
}

#[test]
fn random_seeding_is_reproducible_with_rng_seed() {
    let set = sample_pool();
    let config = SelectionConfig {
        seed_mode: SeedMode::Random,
        rng_seed: Some(1234),
        target_size: 4,
        ..SelectionConfig::default()
    };
    let first = DiversitySelector::new(config.clone()).run(&set).unwrap();
    let second = DiversitySelector::new(config).run(&set).unwrap();
    assert_eq!(first.selected, second.selected);
}

#[test]
fn seed_mode_changes_the_starting_point() {
    // Three near-identical fingerprints and one inverse: the outlier start
    // must be the inverse row, the medoid one of the clones.
    let set = FingerprintSet::from_rows(&[
        vec![1, 1, 1, 1, 0],
        vec![1, 1, 1, 1, 0],
        vec![1, 1, 1, 0, 0],
        vec![0, 0, 0, 0, 1],
    ])
    .unwrap();
    let medoid = DiversitySelector::new(SelectionConfig {
        target_size: 2,
        ..SelectionConfig::default()
    })
    .run(&set)
    .unwrap();
    let outlier = DiversitySelector::new(SelectionConfig {
        seed_mode: SeedMode::Outlier,
        target_size: 2,
        ..SelectionConfig::default()
    })
    .run(&set)
    .unwrap();
    assert!(medoid.seed < 3);
    assert_eq!(outlier.seed, 3);
}

#[test]
fn weighted_mode_and_explicit_threshold_run_to_completion() {
    let set = sample_pool();
    let config = SelectionConfig {
        index: IndexKind::SokalMichener,
        weight_mode: WeightMode::Weighted,
        threshold: CoincidenceThreshold::Dissimilar,
        w_factor: WeightScheme::Power(2),
        target_size: 4,
        ..SelectionConfig::default()
    };
    let result = DiversitySelector::new(config).run(&set).unwrap();
    assert_eq!(result.selected.len(), 4);
    for step in &result.steps {
        assert!(step.value.is_finite());
    }
}

#[test]
fn oversized_target_is_rejected() {
    let set = sample_pool();
    let config = SelectionConfig {
        target_size: set.len() + 1,
        ..SelectionConfig::default()
    };
    let err = DiversitySelector::new(config).run(&set).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::SelectionTooLarge {
            requested: 9,
            pool: 8
        }
    ));
}

#[test]
fn theoretical_counters_match_binomial_population() {
    // n = 3, threshold 3 % 2 = 1: only the unanimous columns count, with
    // C(3,0) = C(3,3) = 1 of each among the 2^3 = 8 histogram entries.
    let counters = Counters::theoretical(
        3,
        CoincidenceThreshold::None,
        WeightScheme::Fraction,
    )
    .unwrap();
    assert_eq!(counters.a, 1);
    assert_eq!(counters.d, 1);
    assert_eq!(counters.total_dis, 6);
    assert_eq!(counters.p, 8);
}
