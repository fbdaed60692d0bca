//! Binary fingerprint collections and their column-sum aggregates.
//!
//! A fingerprint is a fixed-length sequence of 0/1 values; a collection is
//! an ordered, index-addressable set of fingerprints of identical length.
//! All n-ary counters depend only on the per-column count of 1-bits plus
//! the population size, so [`ColumnSums`] is the sufficient statistic that
//! the rest of the crate operates on: the original matrix is never needed
//! once the aggregate exists.

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::ValidationError;

/// An ordered collection of equal-length binary fingerprints.
///
/// Stored row-major: one row per fingerprint, one column per bit position.
/// Construction validates the collection invariants (at least two rows,
/// equal lengths, binary entries), so every `FingerprintSet` is safe to
/// aggregate without further checks.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintSet {
    bits: Array2<u8>,
}

impl FingerprintSet {
    /// Builds a collection from row vectors.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if fewer than two rows are given, if
    /// any row's length differs from the first row's, or if any entry is
    /// not 0 or 1.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, ValidationError> {
        if rows.len() < 2 {
            return Err(ValidationError::TooFewFingerprints(rows.len()));
        }
        let width = rows[0].len();
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ValidationError::LengthMismatch {
                    index,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (position, &value) in row.iter().enumerate() {
                if value > 1 {
                    return Err(ValidationError::NonBinaryValue {
                        index,
                        position,
                        value,
                    });
                }
            }
        }

        let mut bits = Array2::zeros((rows.len(), width));
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                bits[[i, j]] = value;
            }
        }
        Ok(Self { bits })
    }

    /// Number of fingerprints in the collection.
    pub fn len(&self) -> usize {
        self.bits.nrows()
    }

    /// True if the collection holds no fingerprints.
    ///
    /// Unreachable through [`from_rows`](Self::from_rows), which requires
    /// at least two rows; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.bits.nrows() == 0
    }

    /// Fingerprint length (number of bit positions).
    pub fn width(&self) -> usize {
        self.bits.ncols()
    }

    /// Borrowed view of fingerprint `i`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, u8> {
        self.bits.row(i)
    }

    /// Column-sum aggregate over the whole collection.
    pub fn column_sums(&self) -> ColumnSums {
        let mut sums = Array1::zeros(self.width());
        for row in self.bits.rows() {
            for (j, &bit) in row.iter().enumerate() {
                sums[j] += u64::from(bit);
            }
        }
        ColumnSums::new(sums, self.len() as u64)
    }
}

/// Column-sum aggregate: per-position 1-bit counts plus the population size.
///
/// The aggregate supports the incremental updates the greedy selector
/// relies on: adding or removing a single fingerprint adjusts the sums
/// element-wise and the population size by one, and is never recomputed
/// from the full matrix mid-run.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSums {
    sums: Array1<u64>,
    n: u64,
}

impl ColumnSums {
    /// Wraps a raw aggregate. Bounds against `n` are checked by the
    /// counter engine at compute time, so intermediate aggregates (for
    /// example a single selected fingerprint) are representable.
    pub fn new(sums: Array1<u64>, n: u64) -> Self {
        Self { sums, n }
    }

    /// Population size backing this aggregate.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Number of bit positions.
    pub fn width(&self) -> usize {
        self.sums.len()
    }

    /// Per-position sums.
    pub fn sums(&self) -> &Array1<u64> {
        &self.sums
    }

    /// New aggregate with `row` added (population grows by one).
    pub fn plus_row(&self, row: ArrayView1<'_, u8>) -> Self {
        let mut sums = self.sums.clone();
        for (j, &bit) in row.iter().enumerate() {
            sums[j] += u64::from(bit);
        }
        Self::new(sums, self.n + 1)
    }

    /// New aggregate with `row` removed (population shrinks by one).
    ///
    /// The caller guarantees `row` is a member of the aggregated
    /// collection, so the per-position subtraction cannot underflow.
    pub fn minus_row(&self, row: ArrayView1<'_, u8>) -> Self {
        let mut sums = self.sums.clone();
        for (j, &bit) in row.iter().enumerate() {
            sums[j] -= u64::from(bit);
        }
        Self::new(sums, self.n - 1)
    }

    /// Adds `row` into this aggregate in place.
    pub fn add_row_in_place(&mut self, row: ArrayView1<'_, u8>) {
        for (j, &bit) in row.iter().enumerate() {
            self.sums[j] += u64::from(bit);
        }
        self.n += 1;
    }

    /// Aggregate of a single fingerprint, the greedy selector's initial
    /// running state.
    pub fn of_row(row: ArrayView1<'_, u8>) -> Self {
        let mut sums = Array1::zeros(row.len());
        for (j, &bit) in row.iter().enumerate() {
            sums[j] = u64::from(bit);
        }
        Self::new(sums, 1)
    }

    /// Aggregate of exactly two fingerprints, as the tie-breaker's
    /// pairwise comparisons use.
    pub fn pair(a: ArrayView1<'_, u8>, b: ArrayView1<'_, u8>) -> Self {
        let mut sums = Array1::zeros(a.len());
        for (j, (&x, &y)) in a.iter().zip(b.iter()).enumerate() {
            sums[j] = u64::from(x) + u64::from(y);
        }
        Self::new(sums, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Vec<u8>> {
        vec![
            vec![1, 1, 0],
            vec![1, 0, 0],
            vec![1, 1, 1],
            vec![0, 0, 0],
        ]
    }

    #[test]
    fn test_from_rows_valid() {
        let set = FingerprintSet::from_rows(&sample_rows()).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.width(), 3);
    }

    #[test]
    fn test_from_rows_too_few() {
        let err = FingerprintSet::from_rows(&[vec![1, 0]]).unwrap_err();
        assert!(matches!(err, ValidationError::TooFewFingerprints(1)));
    }

    #[test]
    fn test_from_rows_length_mismatch() {
        let err = FingerprintSet::from_rows(&[vec![1, 0], vec![1, 0, 1]]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::LengthMismatch {
                index: 1,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_from_rows_non_binary() {
        let err = FingerprintSet::from_rows(&[vec![1, 0], vec![2, 0]]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonBinaryValue {
                index: 1,
                position: 0,
                value: 2
            }
        ));
    }

    #[test]
    fn test_column_sums() {
        let set = FingerprintSet::from_rows(&sample_rows()).unwrap();
        let cs = set.column_sums();
        assert_eq!(cs.n(), 4);
        assert_eq!(cs.sums().as_slice().unwrap(), &[3, 2, 1]);
    }

    #[test]
    fn test_column_sums_order_invariant() {
        let mut shuffled = sample_rows();
        shuffled.swap(0, 3);
        shuffled.swap(1, 2);
        let a = FingerprintSet::from_rows(&sample_rows()).unwrap().column_sums();
        let b = FingerprintSet::from_rows(&shuffled).unwrap().column_sums();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plus_minus_row_roundtrip() {
        let set = FingerprintSet::from_rows(&sample_rows()).unwrap();
        let cs = set.column_sums();
        let without = cs.minus_row(set.row(2));
        assert_eq!(without.n(), 3);
        assert_eq!(without.sums().as_slice().unwrap(), &[2, 1, 0]);
        let back = without.plus_row(set.row(2));
        assert_eq!(back, cs);
    }

    #[test]
    fn test_add_row_in_place_matches_plus_row() {
        let set = FingerprintSet::from_rows(&sample_rows()).unwrap();
        let base = ColumnSums::of_row(set.row(0));
        let mut incremental = base.clone();
        incremental.add_row_in_place(set.row(1));
        assert_eq!(incremental, base.plus_row(set.row(1)));
    }

    #[test]
    fn test_pair() {
        let set = FingerprintSet::from_rows(&sample_rows()).unwrap();
        let pair = ColumnSums::pair(set.row(0), set.row(2));
        assert_eq!(pair.n(), 2);
        assert_eq!(pair.sums().as_slice().unwrap(), &[2, 2, 1]);
    }
}
