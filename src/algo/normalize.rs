//! Weight normalization.
//!
//! A normalized row sums to one. Rows that sum to zero are left alone: a
//! vertex with no influence at all is a legitimate state, not an error.

use crate::weights::WeightRows;

/// Row totals whose magnitude is at or below this value are treated as zero.
pub const ZERO_SUM_EPSILON: f64 = 1e-12;

/// Default tolerance for [`is_normalized`].
pub const NORMALIZED_TOLERANCE: f64 = 1e-9;

/// Sum of a row.
#[inline]
pub fn row_sum(row: &[f64]) -> f64 {
    row.iter().sum()
}

/// Rescale `row` so it sums to one.
///
/// Returns `false` and leaves the row untouched if its total is zero. A
/// negative total is divided out like any other, so the result still sums
/// to one.
///
/// # Example
///
/// ```
/// use heft::algo::normalize::normalize_row;
///
/// let mut row = [0.0, 0.6, 0.3];
/// assert!(normalize_row(&mut row));
/// assert!((row[1] - 2.0 / 3.0).abs() < 1e-12);
///
/// let mut empty = [0.0, 0.0];
/// assert!(!normalize_row(&mut empty));
/// ```
pub fn normalize_row(row: &mut [f64]) -> bool {
    let total = row_sum(row);
    if total.abs() <= ZERO_SUM_EPSILON {
        return false;
    }
    let inv = 1.0 / total;
    for w in row.iter_mut() {
        *w *= inv;
    }
    true
}

/// Normalize every row, returning how many were rescaled.
pub fn normalize_rows(rows: &mut WeightRows) -> usize {
    let mut count = 0;
    rows.for_each_row_mut(|_, row| {
        if normalize_row(row) {
            count += 1;
        }
    });
    count
}

/// Check whether a row sums to one within `tolerance`, or is all zero.
pub fn is_normalized(row: &[f64], tolerance: f64) -> bool {
    let total = row_sum(row);
    total.abs() <= ZERO_SUM_EPSILON || (total - 1.0).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexId;

    #[test]
    fn test_normalize_scales_to_one() {
        let mut row = [2.0, 1.0, 1.0];
        assert!(normalize_row(&mut row));
        assert_eq!(row, [0.5, 0.25, 0.25]);
        assert!(is_normalized(&row, NORMALIZED_TOLERANCE));
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut row = [0.2, 0.3, 0.5];
        normalize_row(&mut row);
        let once = row;
        normalize_row(&mut row);
        for (a, b) in once.iter().zip(&row) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_zero_row_unchanged() {
        let mut row = [0.0; 4];
        assert!(!normalize_row(&mut row));
        assert_eq!(row, [0.0; 4]);
        assert!(is_normalized(&row, NORMALIZED_TOLERANCE));
    }

    #[test]
    fn test_near_zero_row_not_divided() {
        let mut row = [1e-14, 0.0];
        assert!(!normalize_row(&mut row));
        assert_eq!(row, [1e-14, 0.0]);
    }

    #[test]
    fn test_negative_total_is_rescaled() {
        let mut row = [-0.2, -0.3];
        assert!(!is_normalized(&row, NORMALIZED_TOLERANCE));
        assert!(normalize_row(&mut row));
        assert!((row[0] - 0.4).abs() < 1e-12);
        assert!((row[1] - 0.6).abs() < 1e-12);
        assert!(is_normalized(&row, NORMALIZED_TOLERANCE));

        let mut near_zero = [-1e-14, 0.0];
        assert!(!normalize_row(&mut near_zero));
        assert_eq!(near_zero, [-1e-14, 0.0]);
    }

    #[test]
    fn test_normalize_rows_counts() {
        let mut rows = WeightRows::new(2);
        rows.push(VertexId::new(0), &[1.0, 1.0]).unwrap();
        rows.push(VertexId::new(1), &[0.0, 0.0]).unwrap();
        rows.push(VertexId::new(2), &[0.0, 3.0]).unwrap();

        assert_eq!(normalize_rows(&mut rows), 2);
        assert_eq!(rows.row(0), &[0.5, 0.5]);
        assert_eq!(rows.row(1), &[0.0, 0.0]);
        assert_eq!(rows.row(2), &[0.0, 1.0]);
    }

    #[test]
    fn test_is_normalized_rejects_partial_rows() {
        assert!(!is_normalized(&[0.5, 0.2], NORMALIZED_TOLERANCE));
    }
}
