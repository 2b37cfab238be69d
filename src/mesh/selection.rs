//! Target vertex sets.
//!
//! A [`TargetSet`] names the vertices an operation is allowed to modify,
//! optionally with a per-vertex strength in `[0, 1]` (the falloff of a paint
//! brush, for instance). Vertices are kept sorted and unique so that every
//! operation visits them in the same order.

use std::collections::BTreeMap;

use super::index::VertexId;
use super::topology::Adjacency;
use crate::error::Result;

/// Sorted, de-duplicated set of target vertices with optional strengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSet {
    vertices: Vec<VertexId>,
    strengths: Option<Vec<f64>>,
}

impl TargetSet {
    /// Create a target set where every vertex has full strength.
    pub fn new<T: IntoIterator<Item = VertexId>>(vertices: T) -> Self {
        let mut vertices: Vec<VertexId> = vertices.into_iter().collect();
        vertices.sort_unstable();
        vertices.dedup();
        Self {
            vertices,
            strengths: None,
        }
    }

    /// Target every vertex of a mesh with `num_vertices` vertices.
    pub fn all(num_vertices: usize) -> Self {
        Self {
            vertices: (0..num_vertices).map(VertexId::new).collect(),
            strengths: None,
        }
    }

    /// Create a target set with per-vertex strengths.
    ///
    /// Strengths are clamped to `[0, 1]`; NaN becomes 0. If a vertex appears
    /// more than once, its first strength wins.
    pub fn with_strengths<T: IntoIterator<Item = (VertexId, f64)>>(targets: T) -> Self {
        let mut map = BTreeMap::new();
        for (v, s) in targets {
            let s = if s.is_nan() { 0.0 } else { s.clamp(0.0, 1.0) };
            map.entry(v).or_insert(s);
        }
        let (vertices, strengths): (Vec<VertexId>, Vec<f64>) = map.into_iter().unzip();
        Self {
            vertices,
            strengths: Some(strengths),
        }
    }

    /// Number of target vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check if there are no target vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Target vertices in ascending order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Strength of the `i`-th target vertex (1.0 when no strengths were given).
    #[inline]
    pub fn strength(&self, i: usize) -> f64 {
        self.strengths.as_ref().map_or(1.0, |s| s[i])
    }

    /// Iterate over `(vertex, strength)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(move |(i, &v)| (v, self.strength(i)))
    }

    /// Expand the set by `rings` rings of neighbors.
    ///
    /// Newly added vertices get full strength when the set has no strengths
    /// and 0 otherwise, so widening a brush footprint only adds context rows
    /// without changing which vertices move.
    pub fn grow<A: Adjacency>(&self, adjacency: &A, rings: usize) -> Result<Self> {
        let mut members: BTreeMap<VertexId, f64> = self.iter().collect();
        let added_strength = if self.strengths.is_some() { 0.0 } else { 1.0 };
        let mut frontier: Vec<VertexId> = self.vertices.clone();

        for _ in 0..rings {
            let mut next = Vec::new();
            for &v in &frontier {
                for &n in adjacency.neighbors(v)? {
                    if !members.contains_key(&n) {
                        members.insert(n, added_strength);
                        next.push(n);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        let (vertices, strengths): (Vec<_>, Vec<_>) = members.into_iter().unzip();
        Ok(Self {
            vertices,
            strengths: self.strengths.as_ref().map(|_| strengths),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Topology;

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let set = TargetSet::new([v(3), v(1), v(3), v(2)]);
        assert_eq!(set.vertices(), &[v(1), v(2), v(3)]);
        assert_eq!(set.strength(0), 1.0);
    }

    #[test]
    fn test_strengths_clamped_and_first_wins() {
        let set = TargetSet::with_strengths([(v(2), 1.5), (v(0), f64::NAN), (v(2), 0.1)]);
        let pairs: Vec<_> = set.iter().collect();
        assert_eq!(pairs, vec![(v(0), 0.0), (v(2), 1.0)]);
    }

    #[test]
    fn test_grow_one_ring() {
        // Strip: 0-1-2-3-4
        let topo = Topology::from_adjacency(&[
            vec![1],
            vec![0, 2],
            vec![1, 3],
            vec![2, 4],
            vec![3],
        ])
        .unwrap();
        let set = TargetSet::new([v(2)]);

        let grown = set.grow(&topo, 1).unwrap();
        assert_eq!(grown.vertices(), &[v(1), v(2), v(3)]);

        let grown = set.grow(&topo, 5).unwrap();
        assert_eq!(grown.len(), 5);
    }

    #[test]
    fn test_grow_keeps_brush_strengths() {
        let topo = Topology::from_adjacency(&[vec![1], vec![0, 2], vec![1]]).unwrap();
        let set = TargetSet::with_strengths([(v(1), 0.5)]);
        let grown = set.grow(&topo, 1).unwrap();
        let pairs: Vec<_> = grown.iter().collect();
        assert_eq!(pairs, vec![(v(0), 0.0), (v(1), 0.5), (v(2), 0.0)]);
    }
}
