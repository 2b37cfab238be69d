//! Mesh connectivity.
//!
//! The weight algorithms only ever need to know which vertices share an edge.
//! [`Topology`] answers that question for a fixed mesh, and the [`Adjacency`]
//! trait lets host integrations plug in their own connectivity instead.
//!
//! # Construction
//!
//! ```
//! use heft::mesh::{Adjacency, Topology, VertexId};
//!
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//! let topo = Topology::from_triangles(4, &faces).unwrap();
//!
//! assert_eq!(topo.num_vertices(), 4);
//! assert_eq!(topo.neighbors(VertexId::new(1)).unwrap().len(), 2);
//! ```

mod index;
mod selection;
mod topology;

pub use index::{InfluenceId, VertexId};
pub use selection::TargetSet;
pub use topology::{Adjacency, Topology};
