//! Influence limiting and pruning.
//!
//! Game engines and GPU skinning paths usually cap the number of influences
//! per vertex (often four). [`limit_influences`] keeps the largest `max`
//! weights of a row and zeroes the rest. [`prune_row`] zeroes weights below a
//! threshold. Neither rescales what remains; run
//! [`normalize_row`](super::normalize::normalize_row) afterwards.

use std::cmp::Ordering;

use crate::weights::WeightRows;

/// Keep the `max` largest-magnitude entries of `row` and zero the others.
///
/// `max == 0` means "no limit" and leaves the row unchanged, as does a `max`
/// at least as large as the row. Equal magnitudes are ranked by column, so
/// the lower influence index wins a tie. Returns the number of nonzero
/// entries that were zeroed.
///
/// # Example
///
/// ```
/// use heft::algo::limit::limit_influences;
///
/// let mut row = [0.1, 0.6, 0.3];
/// limit_influences(&mut row, 2);
/// assert_eq!(row, [0.0, 0.6, 0.3]);
/// ```
pub fn limit_influences(row: &mut [f64], max: usize) -> usize {
    if max == 0 || max >= row.len() {
        return 0;
    }

    let mut order: Vec<usize> = (0..row.len()).collect();
    order.select_nth_unstable_by(max - 1, |&a, &b| rank(row, a, b));

    let mut keep = vec![false; row.len()];
    for &i in &order[..max] {
        keep[i] = true;
    }

    let mut zeroed = 0;
    for (w, keep) in row.iter_mut().zip(keep) {
        if !keep && *w != 0.0 {
            *w = 0.0;
            zeroed += 1;
        }
    }
    zeroed
}

/// Largest magnitude first, then lowest column first.
#[inline]
fn rank(row: &[f64], a: usize, b: usize) -> Ordering {
    row[b].abs().total_cmp(&row[a].abs()).then(a.cmp(&b))
}

/// Apply [`limit_influences`] to every row, returning the number of entries zeroed.
pub fn limit_rows(rows: &mut WeightRows, max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let mut zeroed = 0;
    rows.for_each_row_mut(|_, row| zeroed += limit_influences(row, max));
    zeroed
}

/// Zero every entry whose magnitude is strictly below `threshold`.
///
/// Returns the number of entries zeroed. A threshold of zero does nothing.
pub fn prune_row(row: &mut [f64], threshold: f64) -> usize {
    if threshold <= 0.0 {
        return 0;
    }
    let mut zeroed = 0;
    for w in row.iter_mut() {
        if *w != 0.0 && w.abs() < threshold {
            *w = 0.0;
            zeroed += 1;
        }
    }
    zeroed
}

/// Apply [`prune_row`] to every row.
pub fn prune_rows(rows: &mut WeightRows, threshold: f64) -> usize {
    let mut zeroed = 0;
    rows.for_each_row_mut(|_, row| zeroed += prune_row(row, threshold));
    zeroed
}

/// Number of nonzero entries in a row.
#[inline]
pub fn influence_count(row: &[f64]) -> usize {
    row.iter().filter(|&&w| w != 0.0).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::normalize::normalize_row;
    use crate::mesh::VertexId;

    #[test]
    fn test_limit_keeps_largest() {
        let mut row = [0.1, 0.6, 0.3];
        assert_eq!(limit_influences(&mut row, 2), 1);
        assert_eq!(row, [0.0, 0.6, 0.3]);

        normalize_row(&mut row);
        assert!((row[1] - 0.6 / 0.9).abs() < 1e-12);
        assert!((row[2] - 0.3 / 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_limit_cardinality() {
        let original = [0.05, 0.3, 0.1, 0.25, 0.2, 0.1];
        let mut row = original;
        limit_influences(&mut row, 2);

        assert_eq!(influence_count(&row), 2);
        assert_eq!(row[1], 0.3);
        assert_eq!(row[3], 0.25);
    }

    #[test]
    fn test_limit_tie_prefers_lower_index() {
        let mut row = [0.25, 0.25, 0.25, 0.25];
        limit_influences(&mut row, 2);
        assert_eq!(row, [0.25, 0.25, 0.0, 0.0]);

        let mut row = [0.1, 0.4, 0.1, 0.4];
        limit_influences(&mut row, 3);
        assert_eq!(row, [0.1, 0.4, 0.0, 0.4]);
    }

    #[test]
    fn test_limit_does_not_rescale() {
        let mut row = [0.5, 0.3, 0.2];
        limit_influences(&mut row, 1);
        assert_eq!(row, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_limit_noops() {
        let mut row = [0.1, 0.2, 0.7];
        assert_eq!(limit_influences(&mut row, 0), 0);
        assert_eq!(limit_influences(&mut row, 3), 0);
        assert_eq!(limit_influences(&mut row, 10), 0);
        assert_eq!(row, [0.1, 0.2, 0.7]);
    }

    #[test]
    fn test_limit_zero_row() {
        let mut row = [0.0; 5];
        assert_eq!(limit_influences(&mut row, 2), 0);
        assert_eq!(row, [0.0; 5]);
    }

    #[test]
    fn test_prune() {
        let mut row = [0.005, 0.5, 0.495];
        assert_eq!(prune_row(&mut row, 0.01), 1);
        assert_eq!(row, [0.0, 0.5, 0.495]);
        assert_eq!(prune_row(&mut row, 0.0), 0);
    }

    #[test]
    fn test_limit_rows() {
        let mut rows = WeightRows::new(3);
        rows.push(VertexId::new(0), &[0.2, 0.3, 0.5]).unwrap();
        rows.push(VertexId::new(1), &[1.0, 0.0, 0.0]).unwrap();

        assert_eq!(limit_rows(&mut rows, 1), 2);
        assert_eq!(rows.row(0), &[0.0, 0.0, 0.5]);
        assert_eq!(rows.row(1), &[1.0, 0.0, 0.0]);
    }
}
