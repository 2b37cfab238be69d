//! Undo and redo of weight edits.
//!
//! An [`OperationRecord`] holds the rows an operation replaced and the rows it
//! wrote. Undo writes the old rows back verbatim and redo writes the new rows
//! back verbatim; nothing is recomputed, so an undo restores the exact bits
//! that were there before.
//!
//! [`undo`] and [`redo`] are plain functions over a record, for hosts that
//! keep their own undo stack. [`History`] is a small stack for everyone else.

use std::collections::VecDeque;

use log::debug;

use crate::error::{Result, WeightError};
use crate::mesh::VertexId;
use crate::weights::{InfluenceSet, WeightRows, WeightStore};

/// The before and after state of one weight edit.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    influences: InfluenceSet,
    before: WeightRows,
    after: WeightRows,
}

impl OperationRecord {
    /// Create a record.
    ///
    /// `before` and `after` must cover the same vertices in the same order,
    /// with one column per influence.
    pub fn new(influences: InfluenceSet, before: WeightRows, after: WeightRows) -> Result<Self> {
        for rows in [&before, &after] {
            if rows.num_influences() != influences.len() {
                return Err(WeightError::InvalidInfluenceSet {
                    expected: influences.len(),
                    found: rows.num_influences(),
                });
            }
        }
        if before.vertices() != after.vertices() {
            return Err(WeightError::invalid_param(
                "after",
                format!("{} rows", after.len()),
                "must cover the same vertices as the prior rows",
            ));
        }
        Ok(Self {
            influences,
            before,
            after,
        })
    }

    /// Vertices touched by the operation.
    pub fn vertices(&self) -> &[VertexId] {
        self.before.vertices()
    }

    /// Column order of both row sets.
    pub fn influences(&self) -> &InfluenceSet {
        &self.influences
    }

    /// Rows as they were before the operation.
    pub fn before(&self) -> &WeightRows {
        &self.before
    }

    /// Rows as the operation wrote them.
    pub fn after(&self) -> &WeightRows {
        &self.after
    }
}

/// Restore the rows a record replaced.
pub fn undo<S: WeightStore + ?Sized>(record: &OperationRecord, store: &mut S) -> Result<()> {
    store.set_weights(&record.before, &record.influences)?;
    Ok(())
}

/// Write a record's rows again.
pub fn redo<S: WeightStore + ?Sized>(record: &OperationRecord, store: &mut S) -> Result<()> {
    store.set_weights(&record.after, &record.influences)?;
    Ok(())
}

/// A bounded undo/redo stack of [`OperationRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct History {
    done: VecDeque<OperationRecord>,
    undone: Vec<OperationRecord>,
    capacity: usize,
}

impl History {
    /// Create a history holding at most `capacity` undo steps (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            capacity,
        }
    }

    /// Record an operation that has already been applied.
    ///
    /// Clears the redo branch. If the history is full, the oldest record is
    /// dropped.
    pub fn push(&mut self, record: OperationRecord) {
        self.undone.clear();
        self.done.push_back(record);
        if self.capacity > 0 && self.done.len() > self.capacity {
            self.done.pop_front();
            debug!("history full, dropped oldest record");
        }
    }

    /// Undo the most recent operation.
    ///
    /// If the store rejects the write, the record stays on the undo stack.
    pub fn undo<S: WeightStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        let record = self.done.back().ok_or(WeightError::NothingToUndo)?;
        undo(record, store)?;
        if let Some(record) = self.done.pop_back() {
            self.undone.push(record);
        }
        Ok(())
    }

    /// Redo the most recently undone operation.
    pub fn redo<S: WeightStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        let record = self.undone.last().ok_or(WeightError::NothingToRedo)?;
        redo(record, store)?;
        if let Some(record) = self.undone.pop() {
            self.done.push_back(record);
        }
        Ok(())
    }

    /// Check if there is anything to undo.
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    /// Check if there is anything to redo.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Number of undo steps held.
    pub fn len(&self) -> usize {
        self.done.len()
    }

    /// Check if the history holds no undo steps.
    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::WeightMatrix;

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    fn create_matrix() -> WeightMatrix {
        let influences = InfluenceSet::new(["a", "b"]).unwrap();
        WeightMatrix::from_rows(influences, &[[0.1, 0.9], [0.7, 0.3], [1.0 / 3.0, 2.0 / 3.0]]).unwrap()
    }

    /// Apply `rows` to the matrix and return the record.
    fn apply(matrix: &mut WeightMatrix, rows: WeightRows) -> OperationRecord {
        let influences = matrix.influences().clone();
        let prior = matrix.set_weights(&rows, &influences).unwrap();
        OperationRecord::new(influences, prior, rows).unwrap()
    }

    fn edit(vertices: &[usize], row: [f64; 2]) -> WeightRows {
        let mut rows = WeightRows::new(2);
        for &i in vertices {
            rows.push(v(i), &row).unwrap();
        }
        rows
    }

    #[test]
    fn test_undo_is_exact() {
        let mut matrix = create_matrix();
        let original = matrix.clone();

        let record = apply(&mut matrix, edit(&[0, 2], [0.123456789, 0.876543211]));
        assert_ne!(matrix, original);

        undo(&record, &mut matrix).unwrap();
        assert_eq!(matrix, original);
        for (a, b) in matrix.rows().zip(original.rows()) {
            for (x, y) in a.iter().zip(b) {
                assert_eq!(x.to_bits(), y.to_bits());
            }
        }

        redo(&record, &mut matrix).unwrap();
        assert_eq!(matrix.row(v(2)).unwrap(), &[0.123456789, 0.876543211]);
    }

    #[test]
    fn test_record_rejects_mismatched_rows() {
        let influences = InfluenceSet::new(["a", "b"]).unwrap();
        let err = OperationRecord::new(influences.clone(), edit(&[0], [1.0, 0.0]), edit(&[1], [1.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, WeightError::InvalidParameter { .. }));

        let err = OperationRecord::new(influences, WeightRows::new(3), WeightRows::new(3)).unwrap_err();
        assert!(matches!(err, WeightError::InvalidInfluenceSet { expected: 2, found: 3 }));
    }

    #[test]
    fn test_history_undo_redo_sequence() {
        let mut matrix = create_matrix();
        let original = matrix.clone();
        let mut history = History::new(0);

        history.push(apply(&mut matrix, edit(&[0], [0.5, 0.5])));
        let after_first = matrix.clone();
        history.push(apply(&mut matrix, edit(&[0, 1], [0.0, 1.0])));

        history.undo(&mut matrix).unwrap();
        assert_eq!(matrix, after_first);
        history.undo(&mut matrix).unwrap();
        assert_eq!(matrix, original);
        assert!(matches!(history.undo(&mut matrix), Err(WeightError::NothingToUndo)));

        history.redo(&mut matrix).unwrap();
        assert_eq!(matrix, after_first);
        assert!(history.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut matrix = create_matrix();
        let mut history = History::new(0);

        history.push(apply(&mut matrix, edit(&[0], [0.5, 0.5])));
        history.undo(&mut matrix).unwrap();
        assert!(history.can_redo());

        history.push(apply(&mut matrix, edit(&[1], [0.5, 0.5])));
        assert!(!history.can_redo());
        assert!(matches!(history.redo(&mut matrix), Err(WeightError::NothingToRedo)));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut matrix = create_matrix();
        let mut history = History::new(2);

        for i in 0..3 {
            history.push(apply(&mut matrix, edit(&[i], [1.0, 0.0])));
        }
        assert_eq!(history.len(), 2);

        history.undo(&mut matrix).unwrap();
        history.undo(&mut matrix).unwrap();
        assert!(!history.can_undo());
        // The first edit was evicted and cannot be undone.
        assert_eq!(matrix.row(v(0)).unwrap(), &[1.0, 0.0]);
    }

    #[test]
    fn test_failed_undo_keeps_record() {
        let mut matrix = create_matrix();
        let mut history = History::new(0);
        history.push(apply(&mut matrix, edit(&[2], [0.0, 1.0])));

        let mut smaller = WeightMatrix::from_rows(
            InfluenceSet::new(["a", "b"]).unwrap(),
            &[[1.0, 0.0]],
        )
        .unwrap();
        assert!(history.undo(&mut smaller).is_err());
        assert!(history.can_undo());
    }
}
