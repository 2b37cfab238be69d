//! Dense per-mesh weight storage.

use std::collections::HashSet;

use crate::error::{Result, WeightError};
use crate::mesh::{InfluenceId, VertexId};

use super::influence::InfluenceSet;
use super::rows::WeightRows;

/// Read/write access to a skin's weights.
///
/// This is the boundary to whatever owns the weights (an in-memory
/// [`WeightMatrix`], or a host application's skin deformer). Rows are always
/// exchanged in the column order of the caller's [`InfluenceSet`].
pub trait WeightStore {
    /// Number of vertices covered by the store.
    fn num_vertices(&self) -> usize;

    /// Influences known to the store, in its own column order.
    fn influences(&self) -> &InfluenceSet;

    /// Read rows for `vertices`, with columns ordered as in `influences`.
    fn get_weights(&self, vertices: &[VertexId], influences: &InfluenceSet) -> Result<WeightRows>;

    /// Write `rows` and return the rows they replaced.
    ///
    /// The prior rows must cover the same vertices in the same order as
    /// `rows`, with columns ordered as in `influences`. A vertex may appear in
    /// `rows` only once; repeats are rejected with
    /// [`WeightError::DuplicateVertex`].
    ///
    /// Implementations must validate everything before writing anything: on
    /// error the store is left untouched.
    fn set_weights(&mut self, rows: &WeightRows, influences: &InfluenceSet) -> Result<WeightRows>;
}

/// Dense vertex-by-influence weight matrix covering a whole mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    influences: InfluenceSet,
    num_vertices: usize,
    values: Vec<f64>,
}

impl WeightMatrix {
    /// Create a matrix from one row per vertex.
    ///
    /// # Example
    /// ```
    /// use heft::weights::{InfluenceSet, WeightMatrix};
    /// use heft::mesh::VertexId;
    ///
    /// let influences = InfluenceSet::new(["root", "tip"]).unwrap();
    /// let matrix = WeightMatrix::from_rows(influences, &[vec![1.0, 0.0], vec![0.5, 0.5]]).unwrap();
    /// assert_eq!(matrix.row(VertexId::new(1)).unwrap(), &[0.5, 0.5]);
    /// ```
    pub fn from_rows<R: AsRef<[f64]>>(influences: InfluenceSet, rows: &[R]) -> Result<Self> {
        let n = influences.len();
        let mut values = Vec::with_capacity(rows.len() * n);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n {
                return Err(WeightError::InvalidInfluenceSet {
                    expected: n,
                    found: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            influences,
            num_vertices: rows.len(),
            values,
        })
    }

    /// Number of columns.
    #[inline]
    pub fn num_influences(&self) -> usize {
        self.influences.len()
    }

    /// The row of `v`.
    pub fn row(&self, v: VertexId) -> Result<&[f64]> {
        let range = self.range(v)?;
        Ok(&self.values[range])
    }

    /// The row of `v`, mutably.
    pub fn row_mut(&mut self, v: VertexId) -> Result<&mut [f64]> {
        let range = self.range(v)?;
        Ok(&mut self.values[range])
    }

    /// A single weight.
    pub fn weight(&self, v: VertexId, influence: InfluenceId) -> Result<f64> {
        let row = self.row(v)?;
        row.get(influence.index())
            .copied()
            .ok_or_else(|| WeightError::invalid_param("influence", influence, "column out of range"))
    }

    /// Iterate over all rows in vertex order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        let n = self.num_influences();
        (0..self.num_vertices).map(move |i| &self.values[i * n..(i + 1) * n])
    }

    /// Copy out the rows of `vertices` in the matrix's own column order.
    pub fn snapshot(&self, vertices: &[VertexId]) -> Result<WeightRows> {
        let mut rows = WeightRows::with_capacity(self.num_influences(), vertices.len());
        for &v in vertices {
            rows.push(v, self.row(v)?)?;
        }
        Ok(rows)
    }

    fn range(&self, v: VertexId) -> Result<std::ops::Range<usize>> {
        if v.index() >= self.num_vertices {
            return Err(WeightError::InvalidVertex { vertex: v.index() });
        }
        let n = self.num_influences();
        Ok(v.index() * n..(v.index() + 1) * n)
    }

    fn validate_rows(&self, rows: &WeightRows, influences: &InfluenceSet) -> Result<Vec<usize>> {
        if rows.num_influences() != influences.len() {
            return Err(WeightError::InvalidInfluenceSet {
                expected: influences.len(),
                found: rows.num_influences(),
            });
        }
        let columns = influences.columns_in(&self.influences)?;
        let mut seen = HashSet::with_capacity(rows.len());
        for &v in rows.vertices() {
            if v.index() >= self.num_vertices {
                return Err(WeightError::InvalidVertex { vertex: v.index() });
            }
            if !seen.insert(v) {
                return Err(WeightError::DuplicateVertex { vertex: v.index() });
            }
        }
        Ok(columns)
    }
}

impl WeightStore for WeightMatrix {
    fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    fn influences(&self) -> &InfluenceSet {
        &self.influences
    }

    fn get_weights(&self, vertices: &[VertexId], influences: &InfluenceSet) -> Result<WeightRows> {
        let columns = influences.columns_in(&self.influences)?;
        let mut rows = WeightRows::with_capacity(columns.len(), vertices.len());
        let mut buffer = vec![0.0; columns.len()];

        for &v in vertices {
            let source = self.row(v)?;
            for (dst, &col) in buffer.iter_mut().zip(&columns) {
                *dst = source[col];
            }
            rows.push(v, &buffer)?;
        }
        Ok(rows)
    }

    fn set_weights(&mut self, rows: &WeightRows, influences: &InfluenceSet) -> Result<WeightRows> {
        let columns = self.validate_rows(rows, influences)?;
        let mut prior = WeightRows::with_capacity(columns.len(), rows.len());
        let mut buffer = vec![0.0; columns.len()];

        for (v, row) in rows.iter() {
            let range = self.range(v)?;
            let target = &mut self.values[range];
            for ((old, &col), &new) in buffer.iter_mut().zip(&columns).zip(row) {
                *old = target[col];
                target[col] = new;
            }
            prior.push(v, &buffer)?;
        }
        Ok(prior)
    }
}
