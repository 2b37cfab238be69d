//! # Heft
//!
//! Skin weight cleanup for rigged meshes: neighbor averaging, influence
//! limiting, and normalization.
//!
//! Every vertex of a skinned mesh carries one weight per influence (bone).
//! Heft edits those weights the way a painting tool's smooth brush does:
//! each target vertex moves toward the mean of its first-ring neighbors, the
//! smallest influences are dropped, and the rest are rescaled to sum to one.
//! Every edit is undoable bit for bit.
//!
//! ## Features
//!
//! - **Frozen-snapshot averaging**: results never depend on visit order, so
//!   targets are processed in parallel with rayon
//! - **Influence limiting and pruning**: keep the N largest weights per vertex
//! - **Atomic writes**: a failed edit leaves the weights untouched
//! - **Undo/redo**: records replay stored rows verbatim
//! - **Rig fitting**: recover influence transforms from deformed positions
//! - **JSON skin files** and a `heft` command-line tool
//!
//! ## Quick Start
//!
//! ```no_run
//! use heft::prelude::*;
//!
//! let mut skin = heft::io::load("character.json").unwrap();
//! let influences = skin.weights.influences().clone();
//! let targets = TargetSet::all(skin.weights.num_vertices());
//!
//! let config = SkinConfig::default().with_blend_factor(0.5).with_max_influences(4);
//! run(&skin.topology, &mut skin.weights, &influences, &targets, &config).unwrap();
//!
//! heft::io::save(&skin, "character_smoothed.json").unwrap();
//! ```
//!
//! ## Smoothing a Selection
//!
//! ```
//! use heft::prelude::*;
//!
//! // A strip of four vertices: 0 - 1 - 2 - 3
//! let topo = Topology::from_polygons(4, &[[0, 1, 2], [1, 3, 2]]).unwrap();
//! let influences = InfluenceSet::new(["upper", "lower"]).unwrap();
//! let mut weights = WeightMatrix::from_rows(
//!     influences.clone(),
//!     &[[1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]],
//! ).unwrap();
//!
//! let mut history = History::new(32);
//! let targets = TargetSet::new([VertexId::new(1), VertexId::new(2)]);
//! let outcome = run(&topo, &mut weights, &influences, &targets, &SkinConfig::default()).unwrap();
//! if let Some(record) = outcome.into_record() {
//!     history.push(record);
//! }
//!
//! let row = weights.row(VertexId::new(1)).unwrap();
//! assert!((row[0] + row[1] - 1.0).abs() < 1e-12);
//!
//! history.undo(&mut weights).unwrap();
//! assert_eq!(weights.row(VertexId::new(1)).unwrap(), &[1.0, 0.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod history;
pub mod io;
pub mod mesh;
pub mod pipeline;
pub mod weights;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use heft::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, WeightError};
    pub use crate::history::{History, OperationRecord};
    pub use crate::mesh::{Adjacency, InfluenceId, TargetSet, Topology, VertexId};
    pub use crate::pipeline::{run, Outcome, SkinConfig};
    pub use crate::weights::{InfluenceSet, WeightMatrix, WeightRows, WeightStore};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
