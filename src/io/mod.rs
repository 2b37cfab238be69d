//! Skin file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save |
//! |--------|-----------|------|------|
//! | JSON skin | `.json` | ✓ | ✓ |
//!
//! # Usage
//!
//! ```no_run
//! use heft::io::{load, save};
//!
//! let skin = load("character.json").unwrap();
//! save(&skin, "character_smoothed.json").unwrap();
//! ```

pub mod json;

use std::path::Path;

use crate::error::{Result, WeightError};
use crate::mesh::Topology;
use crate::weights::{WeightMatrix, WeightStore};

/// Supported skin file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON skin file.
    Json,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// A mesh's connectivity together with its weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Skin {
    /// Polygon faces as vertex index lists.
    pub faces: Vec<Vec<usize>>,
    /// First-ring adjacency derived from `faces`.
    pub topology: Topology,
    /// Per-vertex weights.
    pub weights: WeightMatrix,
}

impl Skin {
    /// Build a skin, deriving adjacency from the faces.
    ///
    /// Fails if a face refers to a vertex the weight matrix does not cover.
    pub fn new(faces: Vec<Vec<usize>>, weights: WeightMatrix) -> Result<Self> {
        let topology = Topology::from_polygons(weights.num_vertices(), &faces)?;
        Ok(Self {
            faces,
            topology,
            weights,
        })
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| WeightError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a skin with automatic format detection.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Skin> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Json => json::load(path),
    }
}

/// Save a skin with automatic format detection.
pub fn save<P: AsRef<Path>>(skin: &Skin, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Json => json::save(skin, path),
    }
}
