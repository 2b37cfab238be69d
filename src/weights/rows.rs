//! Weight rows for a subset of vertices.

use std::collections::HashMap;

use crate::error::{Result, WeightError};
use crate::mesh::VertexId;

/// Weight rows for a subset of vertices, stored contiguously.
///
/// Rows keep the order in which they were pushed, which for rows produced by
/// this crate is ascending vertex order. Pushing a vertex twice is allowed
/// here; [`WeightStore::set_weights`](super::WeightStore::set_weights)
/// rejects such rows with [`WeightError::DuplicateVertex`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRows {
    num_influences: usize,
    vertices: Vec<VertexId>,
    values: Vec<f64>,
}

impl WeightRows {
    /// Create an empty set of rows with `num_influences` columns.
    pub fn new(num_influences: usize) -> Self {
        Self::with_capacity(num_influences, 0)
    }

    /// Create an empty set of rows with room for `rows` vertices.
    pub fn with_capacity(num_influences: usize, rows: usize) -> Self {
        Self {
            num_influences,
            vertices: Vec::with_capacity(rows),
            values: Vec::with_capacity(rows * num_influences),
        }
    }

    /// Append a row for `vertex`.
    ///
    /// Fails with [`WeightError::InvalidInfluenceSet`] if the row length does
    /// not match the column count.
    pub fn push(&mut self, vertex: VertexId, row: &[f64]) -> Result<()> {
        if row.len() != self.num_influences {
            return Err(WeightError::InvalidInfluenceSet {
                expected: self.num_influences,
                found: row.len(),
            });
        }
        self.vertices.push(vertex);
        self.values.extend_from_slice(row);
        Ok(())
    }

    /// Number of columns per row.
    #[inline]
    pub fn num_influences(&self) -> usize {
        self.num_influences
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check if there are no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in row order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// The `i`-th row.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.num_influences;
        &self.values[i * n..(i + 1) * n]
    }

    /// The `i`-th row, mutably.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let n = self.num_influences;
        &mut self.values[i * n..(i + 1) * n]
    }

    /// Iterate over `(vertex, row)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &[f64])> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(move |(i, &v)| (v, self.row(i)))
    }

    /// Apply `f` to every row in place.
    pub fn for_each_row_mut<F: FnMut(VertexId, &mut [f64])>(&mut self, mut f: F) {
        for i in 0..self.vertices.len() {
            let v = self.vertices[i];
            f(v, self.row_mut(i));
        }
    }

    /// Map from vertex to row position, for repeated lookups.
    pub fn index_map(&self) -> HashMap<VertexId, usize> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect()
    }

    /// Check whether every entry of every row is zero.
    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|&w| w == 0.0)
    }

    /// Raw row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
