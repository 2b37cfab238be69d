//! Error types for heft.
//!
//! Structural errors (bad vertex ids, mismatched shapes) abort a batch before
//! anything is written. Numerical edge cases such as zero-sum rows or vertices
//! without neighbors are handled where they occur and never show up here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`WeightError`].
pub type Result<T> = std::result::Result<T, WeightError>;

/// Errors that can occur during skin weight operations.
#[derive(Error, Debug)]
pub enum WeightError {
    /// A vertex id is not part of the topology or weight matrix.
    #[error("vertex {vertex} is not part of the topology")]
    InvalidVertex {
        /// The offending vertex index.
        vertex: usize,
    },

    /// The same vertex appears twice in a set of rows to be written.
    #[error("vertex {vertex} appears more than once in the rows to write")]
    DuplicateVertex {
        /// The repeated vertex index.
        vertex: usize,
    },

    /// A weight store returned prior rows that do not line up with the rows
    /// it was asked to write.
    #[error("weight store returned {found} prior rows for {expected} written rows in a different layout")]
    PriorMismatch {
        /// Number of rows written.
        expected: usize,
        /// Number of prior rows returned.
        found: usize,
    },

    /// A computation needed the weights of a vertex that were not supplied.
    #[error("no weight row supplied for vertex {vertex}")]
    MissingRow {
        /// The vertex whose row is missing.
        vertex: usize,
    },

    /// A face references a vertex outside the declared vertex count.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidFace {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A weight row does not have one entry per influence.
    #[error("weight row has {found} entries but the influence set has {expected}")]
    InvalidInfluenceSet {
        /// Number of influences in the set.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// An influence named by the caller does not exist in the weight store.
    #[error("unknown influence: {name}")]
    UnknownInfluence {
        /// The influence name.
        name: String,
    },

    /// The weight matrix shape does not match the topology.
    #[error("weight matrix covers {found} vertices but the topology has {expected}")]
    MatrixMismatch {
        /// Vertex count of the topology.
        expected: usize,
        /// Vertex count of the weight matrix.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// Rigid fitting had too little weighted data to determine a transform.
    #[error("cannot fit a transform for influence {influence}: no weighted points")]
    DegenerateFit {
        /// Column index of the influence.
        influence: usize,
    },

    /// The history has no record to undo.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The history has no record to redo.
    #[error("nothing to redo")]
    NothingToRedo,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed skin file contents.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Error loading a skin file.
    #[error("failed to load skin from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving a skin file.
    #[error("failed to save skin to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl WeightError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        WeightError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_message() {
        let err = WeightError::invalid_param("blend_factor", 1.5, "must be in [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid parameter: blend_factor = 1.5 (must be in [0, 1])"
        );
    }

    #[test]
    fn test_shape_messages() {
        let err = WeightError::InvalidInfluenceSet { expected: 3, found: 2 };
        assert!(err.to_string().contains("2 entries"));

        let err = WeightError::MatrixMismatch { expected: 10, found: 8 };
        assert!(err.to_string().contains("topology has 10"));
    }
}
