//! Skin weight storage.
//!
//! A skin binds every vertex to a set of influences (usually joints) with a
//! weight per influence. This module holds the containers the algorithms
//! work on:
//!
//! - [`InfluenceSet`]: influence names with a fixed column assignment
//! - [`WeightMatrix`]: dense weights for every vertex of a mesh
//! - [`WeightRows`]: rows for a subset of vertices (snapshots, results)
//! - [`WeightStore`]: read/write access in a caller-chosen column order
//!
//! # Example
//!
//! ```
//! use heft::mesh::VertexId;
//! use heft::weights::{InfluenceSet, WeightMatrix, WeightStore};
//!
//! let influences = InfluenceSet::new(["spine", "arm"]).unwrap();
//! let matrix = WeightMatrix::from_rows(influences, &[[1.0, 0.0], [0.4, 0.6]]).unwrap();
//!
//! // Read with the columns swapped.
//! let request = InfluenceSet::new(["arm", "spine"]).unwrap();
//! let rows = matrix.get_weights(&[VertexId::new(1)], &request).unwrap();
//! assert_eq!(rows.row(0), &[0.6, 0.4]);
//! ```

mod influence;
mod matrix;
mod rows;

pub use influence::InfluenceSet;
pub use matrix::{WeightMatrix, WeightStore};
pub use rows::WeightRows;
