//! First-ring adjacency.
//!
//! [`Topology`] stores, for every vertex, the sorted list of vertices that
//! share an edge with it. The lists are packed into a single buffer with an
//! offset table (the same layout as a CSR matrix), so a neighbor query is a
//! slice lookup.

use super::index::VertexId;
use crate::error::{Result, WeightError};

/// Read-only first-ring adjacency queries.
///
/// This is the seam between the weight algorithms and whatever owns the mesh.
/// Implementations must be deterministic: the same vertex always yields the
/// same neighbors in the same order, and a vertex is never its own neighbor.
pub trait Adjacency {
    /// Number of vertices in the mesh.
    fn num_vertices(&self) -> usize;

    /// Vertices directly connected to `v` by an edge.
    ///
    /// Returns [`WeightError::InvalidVertex`] if `v` is not part of the mesh.
    fn neighbors(&self, v: VertexId) -> Result<&[VertexId]>;

    /// Check whether `v` is part of the mesh.
    #[inline]
    fn contains(&self, v: VertexId) -> bool {
        v.index() < self.num_vertices()
    }
}

/// Packed first-ring adjacency for a fixed vertex count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    /// `offsets[v]..offsets[v + 1]` is the range of `v`'s ring in `rings`.
    offsets: Vec<usize>,
    rings: Vec<VertexId>,
}

impl Topology {
    /// Build adjacency from triangle faces.
    ///
    /// # Example
    /// ```
    /// use heft::mesh::{Adjacency, Topology, VertexId};
    ///
    /// let topo = Topology::from_triangles(4, &[[0, 1, 2], [0, 2, 3]]).unwrap();
    /// let ring: Vec<usize> = topo.neighbors(VertexId::new(0)).unwrap()
    ///     .iter().map(|v| v.index()).collect();
    /// assert_eq!(ring, vec![1, 2, 3]);
    /// ```
    pub fn from_triangles(num_vertices: usize, faces: &[[usize; 3]]) -> Result<Self> {
        Self::from_polygons(num_vertices, faces)
    }

    /// Build adjacency from polygon faces of any size.
    ///
    /// Consecutive vertices of a face (wrapping around) are connected. Repeated
    /// vertices within a face are tolerated and never produce a self-edge.
    pub fn from_polygons<F: AsRef<[usize]>>(num_vertices: usize, faces: &[F]) -> Result<Self> {
        let mut rings: Vec<Vec<usize>> = vec![Vec::new(); num_vertices];

        for (fi, face) in faces.iter().enumerate() {
            let face = face.as_ref();
            if let Some(&vertex) = face.iter().find(|&&v| v >= num_vertices) {
                return Err(WeightError::InvalidFace { face: fi, vertex });
            }
            let n = face.len();
            if n < 2 {
                continue;
            }
            for i in 0..n {
                let a = face[i];
                let b = face[(i + 1) % n];
                if a != b {
                    rings[a].push(b);
                    rings[b].push(a);
                }
            }
        }

        Ok(Self::pack(rings))
    }

    /// Build adjacency from explicit neighbor lists, one per vertex.
    ///
    /// Self references are dropped and duplicates merged. The lists are not
    /// required to be symmetric; each vertex keeps exactly the ring it was given.
    pub fn from_adjacency(rings: &[Vec<usize>]) -> Result<Self> {
        let num_vertices = rings.len();
        let mut cleaned = Vec::with_capacity(num_vertices);

        for (v, ring) in rings.iter().enumerate() {
            if let Some(&vertex) = ring.iter().find(|&&n| n >= num_vertices) {
                return Err(WeightError::InvalidVertex { vertex });
            }
            cleaned.push(ring.iter().copied().filter(|&n| n != v).collect());
        }

        Ok(Self::pack(cleaned))
    }

    fn pack(mut rings: Vec<Vec<usize>>) -> Self {
        let mut offsets = Vec::with_capacity(rings.len() + 1);
        let total: usize = rings.iter().map(Vec::len).sum();
        let mut packed = Vec::with_capacity(total);

        offsets.push(0);
        for ring in &mut rings {
            ring.sort_unstable();
            ring.dedup();
            packed.extend(ring.iter().map(|&n| VertexId::new(n)));
            offsets.push(packed.len());
        }

        Self {
            offsets,
            rings: packed,
        }
    }

    /// Number of neighbors of `v`.
    pub fn valence(&self, v: VertexId) -> Result<usize> {
        self.neighbors(v).map(<[VertexId]>::len)
    }

    /// Number of undirected edges, counting an edge once even if only one
    /// endpoint lists it.
    pub fn num_edges(&self) -> usize {
        let mut count = 0;
        for v in self.vertex_ids() {
            for &n in self.ring(v) {
                if n > v || !self.ring(n).contains(&v) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Iterate over all vertex ids.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.num_vertices()).map(VertexId::new)
    }

    #[inline]
    fn ring(&self, v: VertexId) -> &[VertexId] {
        let i = v.index();
        &self.rings[self.offsets[i]..self.offsets[i + 1]]
    }
}

impl Adjacency for Topology {
    #[inline]
    fn num_vertices(&self) -> usize {
        self.offsets.len() - 1
    }

    fn neighbors(&self, v: VertexId) -> Result<&[VertexId]> {
        if !self.contains(v) {
            return Err(WeightError::InvalidVertex { vertex: v.index() });
        }
        Ok(self.ring(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ring: &[VertexId]) -> Vec<usize> {
        ring.iter().map(|v| v.index()).collect()
    }

    fn create_tetrahedron() -> Topology {
        Topology::from_triangles(4, &[[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]).unwrap()
    }

    #[test]
    fn test_tetrahedron_rings() {
        let topo = create_tetrahedron();
        assert_eq!(topo.num_vertices(), 4);
        assert_eq!(topo.num_edges(), 6);

        for v in topo.vertex_ids() {
            let ring = topo.neighbors(v).unwrap();
            assert_eq!(ring.len(), 3);
            assert!(!ring.contains(&v), "{:?} must not neighbor itself", v);
        }
        assert_eq!(ids(topo.neighbors(VertexId::new(3)).unwrap()), vec![0, 1, 2]);
    }

    #[test]
    fn test_quad_faces_skip_diagonals() {
        let topo = Topology::from_polygons(4, &[vec![0, 1, 2, 3]]).unwrap();
        assert_eq!(ids(topo.neighbors(VertexId::new(0)).unwrap()), vec![1, 3]);
        assert_eq!(ids(topo.neighbors(VertexId::new(2)).unwrap()), vec![1, 3]);
    }

    #[test]
    fn test_isolated_vertex_has_empty_ring() {
        let topo = Topology::from_triangles(4, &[[0, 1, 2]]).unwrap();
        assert!(topo.neighbors(VertexId::new(3)).unwrap().is_empty());
        assert_eq!(topo.valence(VertexId::new(3)).unwrap(), 0);
    }

    #[test]
    fn test_invalid_vertex_query() {
        let topo = create_tetrahedron();
        let err = topo.neighbors(VertexId::new(4)).unwrap_err();
        assert!(matches!(err, WeightError::InvalidVertex { vertex: 4 }));
    }

    #[test]
    fn test_invalid_face() {
        let err = Topology::from_triangles(3, &[[0, 1, 5]]).unwrap_err();
        assert!(matches!(err, WeightError::InvalidFace { face: 0, vertex: 5 }));
    }

    #[test]
    fn test_from_adjacency_cleans_rings() {
        let topo = Topology::from_adjacency(&[vec![2, 1, 1, 0], vec![0], vec![0]]).unwrap();
        assert_eq!(ids(topo.neighbors(VertexId::new(0)).unwrap()), vec![1, 2]);

        let err = Topology::from_adjacency(&[vec![1], vec![7]]).unwrap_err();
        assert!(matches!(err, WeightError::InvalidVertex { vertex: 7 }));
    }
}
