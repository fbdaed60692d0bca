//! Counter computation over column-sum aggregates.

use serde::Serialize;

use crate::counters::{CoincidenceThreshold, WeightScheme};
use crate::error::ValidationError;
use crate::fingerprint::ColumnSums;

/// Largest population whose binomial column histogram fits in `u64`.
const MAX_THEORETICAL_N: u64 = 67;

/// The full set of unweighted and weighted similarity/dissimilarity
/// counters for one aggregate.
///
/// Conservation holds by construction:
/// `a + d + total_dis == p` and `w_a + w_d + total_w_dis == w_p`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Counters {
    /// 1-similar columns (majority of 1s beyond the threshold).
    pub a: u64,
    /// Weighted 1-similarity counter.
    pub w_a: f64,
    /// 0-similar columns (majority of 0s beyond the threshold).
    pub d: u64,
    /// Weighted 0-similarity counter.
    pub w_d: f64,
    /// `a + d`.
    pub total_sim: u64,
    /// `w_a + w_d`.
    pub total_w_sim: f64,
    /// Columns within the threshold of balance.
    pub total_dis: u64,
    /// Weighted dissimilarity counter.
    pub total_w_dis: f64,
    /// `total_sim + total_dis` (every column, once).
    pub p: u64,
    /// `total_w_sim + total_w_dis`.
    pub w_p: f64,
}

/// Accumulator shared by the observed and theoretical modes: classifies
/// one column-sum value and folds in its multiplicity.
struct Accumulator {
    n: u64,
    threshold: f64,
    weights: WeightScheme,
    counters: Counters,
}

impl Accumulator {
    fn new(n: u64, threshold: f64, weights: WeightScheme) -> Self {
        Self {
            n,
            threshold,
            weights,
            counters: Counters {
                a: 0,
                w_a: 0.0,
                d: 0,
                w_d: 0.0,
                total_sim: 0,
                total_w_sim: 0.0,
                total_dis: 0,
                total_w_dis: 0.0,
                p: 0,
                w_p: 0.0,
            },
        }
    }

    /// Folds `count` columns whose sum is `s` into the counters.
    fn add(&mut self, s: u64, count: u64) {
        let signed = 2 * s as i64 - self.n as i64;
        let dist = signed.unsigned_abs();
        let c = &mut self.counters;
        if signed as f64 > self.threshold {
            c.a += count;
            c.w_a += count as f64 * self.weights.sim_weight(dist, self.n);
        } else if (-signed) as f64 > self.threshold {
            c.d += count;
            c.w_d += count as f64 * self.weights.sim_weight(dist, self.n);
        } else {
            c.total_dis += count;
            c.total_w_dis += count as f64 * self.weights.dis_weight(dist, self.n);
        }
    }

    fn finish(mut self) -> Counters {
        let c = &mut self.counters;
        c.total_sim = c.a + c.d;
        c.total_w_sim = c.w_a + c.w_d;
        c.p = c.total_sim + c.total_dis;
        c.w_p = c.total_w_sim + c.total_w_dis;
        self.counters
    }
}

impl Counters {
    /// Computes the counters for an observed column-sum aggregate.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] before any counting work begins if the
    /// population is smaller than 2, the resolved threshold is not in
    /// `[0, n)`, or any column sum exceeds the population size.
    pub fn from_column_sums(
        aggregate: &ColumnSums,
        threshold: CoincidenceThreshold,
        weights: WeightScheme,
    ) -> Result<Self, ValidationError> {
        let n = aggregate.n();
        if n < 2 {
            return Err(ValidationError::PopulationTooSmall(n));
        }
        let resolved = threshold.resolve(n)?;
        for (position, &sum) in aggregate.sums().iter().enumerate() {
            if sum > n {
                return Err(ValidationError::ColumnSumOutOfRange { position, sum, n });
            }
        }

        let mut acc = Accumulator::new(n, resolved, weights);
        for &sum in aggregate.sums() {
            acc.add(sum, 1);
        }
        Ok(acc.finish())
    }

    /// Computes the counters for a theoretical population of `n` random
    /// fingerprints of effectively infinite length.
    ///
    /// Instead of observed columns, every possible column-sum value
    /// `k = 0..=n` contributes with multiplicity `C(n, k)`. Used for
    /// exact-null-model comparisons against observed counters.
    pub fn theoretical(
        n: u64,
        threshold: CoincidenceThreshold,
        weights: WeightScheme,
    ) -> Result<Self, ValidationError> {
        if n < 2 {
            return Err(ValidationError::PopulationTooSmall(n));
        }
        if n > MAX_THEORETICAL_N {
            return Err(ValidationError::BinomialOverflow(n));
        }
        let resolved = threshold.resolve(n)?;

        let mut acc = Accumulator::new(n, resolved, weights);
        for k in 0..=n {
            acc.add(k, binomial(n, k));
        }
        Ok(acc.finish())
    }
}

/// Binomial coefficient `C(n, k)` via the multiplicative formula.
///
/// Exact for every `n <= MAX_THEORETICAL_N`; the intermediate product is
/// carried in `u128` so the division stays integral.
fn binomial(n: u64, k: u64) -> u64 {
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
    }
    result as u64
}
