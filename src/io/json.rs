//! JSON skin files.
//!
//! A skin file holds the connectivity of a mesh and its weight matrix:
//!
//! ```json
//! {
//!   "vertex_count": 3,
//!   "faces": [[0, 1, 2]],
//!   "influences": ["root", "tip"],
//!   "weights": [[1.0, 0.0], [0.5, 0.5], [0.0, 1.0]]
//! }
//! ```
//!
//! `weights` has one row per vertex and one column per influence, in the order
//! of `influences`. Faces may be polygons of any size.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeightError};
use crate::weights::{InfluenceSet, WeightMatrix, WeightStore};

use super::Skin;

/// On-disk layout of a skin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkinFile {
    /// Number of mesh vertices.
    pub vertex_count: usize,
    /// Polygon faces as vertex index lists.
    #[serde(default)]
    pub faces: Vec<Vec<usize>>,
    /// Influence names, one per weight column.
    pub influences: Vec<String>,
    /// One weight row per vertex.
    pub weights: Vec<Vec<f64>>,
}

impl SkinFile {
    /// Capture a skin in file form.
    pub fn from_skin(skin: &Skin) -> Self {
        Self {
            vertex_count: skin.weights.num_vertices(),
            faces: skin.faces.clone(),
            influences: skin.weights.influences().names().to_vec(),
            weights: skin.weights.rows().map(<[f64]>::to_vec).collect(),
        }
    }

    /// Validate the contents and build a [`Skin`].
    pub fn into_skin(self) -> Result<Skin> {
        if self.weights.len() != self.vertex_count {
            return Err(WeightError::MatrixMismatch {
                expected: self.vertex_count,
                found: self.weights.len(),
            });
        }
        let influences = InfluenceSet::new(self.influences)?;
        let weights = WeightMatrix::from_rows(influences, &self.weights)?;
        Skin::new(self.faces, weights)
    }
}

/// Parse a skin from a JSON string.
///
/// # Example
///
/// ```
/// use heft::io::json;
/// use heft::mesh::VertexId;
///
/// let skin = json::from_str(r#"{
///     "vertex_count": 3,
///     "faces": [[0, 1, 2]],
///     "influences": ["root", "tip"],
///     "weights": [[1.0, 0.0], [0.5, 0.5], [0.0, 1.0]]
/// }"#).unwrap();
/// assert_eq!(skin.weights.row(VertexId::new(1)).unwrap(), &[0.5, 0.5]);
/// ```
pub fn from_str(s: &str) -> Result<Skin> {
    let file: SkinFile = serde_json::from_str(s)?;
    file.into_skin()
}

/// Serialize a skin to a pretty-printed JSON string.
pub fn to_string(skin: &Skin) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SkinFile::from_skin(skin))?)
}

/// Load a skin from a JSON file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Skin> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let file: SkinFile = serde_json::from_reader(reader).map_err(|e| WeightError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    file.into_skin()
}

/// Save a skin to a JSON file.
pub fn save<P: AsRef<Path>>(skin: &Skin, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    serde_json::to_writer_pretty(&mut writer, &SkinFile::from_skin(skin)).map_err(|e| {
        WeightError::SaveError {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Adjacency, VertexId};

    const QUAD: &str = r#"{
        "vertex_count": 4,
        "faces": [[0, 1, 2, 3]],
        "influences": ["hip", "knee"],
        "weights": [[1.0, 0.0], [0.75, 0.25], [0.25, 0.75], [0.0, 1.0]]
    }"#;

    #[test]
    fn test_parse_quad() {
        let skin = from_str(QUAD).unwrap();
        assert_eq!(skin.topology.num_vertices(), 4);
        assert_eq!(skin.weights.influences().names(), &["hip", "knee"]);

        let ring: Vec<usize> = skin
            .topology
            .neighbors(VertexId::new(0))
            .unwrap()
            .iter()
            .map(|v| v.index())
            .collect();
        assert_eq!(ring, vec![1, 3]);
    }

    #[test]
    fn test_string_round_trip() {
        let skin = from_str(QUAD).unwrap();
        let text = to_string(&skin).unwrap();
        let reloaded = from_str(&text).unwrap();
        assert_eq!(reloaded.weights, skin.weights);
        assert_eq!(reloaded.faces, skin.faces);
    }

    #[test]
    fn test_file_round_trip() {
        let skin = from_str(QUAD).unwrap();
        let path = std::env::temp_dir().join(format!("heft-json-{}.json", std::process::id()));
        save(&skin, &path).unwrap();
        let reloaded = load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(reloaded.weights, skin.weights);
    }

    #[test]
    fn test_row_count_mismatch() {
        let text = r#"{"vertex_count": 3, "faces": [], "influences": ["a"], "weights": [[1.0], [1.0]]}"#;
        assert!(matches!(
            from_str(text),
            Err(WeightError::MatrixMismatch { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_bad_rows() {
        let short = r#"{"vertex_count": 1, "influences": ["a", "b"], "weights": [[1.0]]}"#;
        assert!(matches!(
            from_str(short),
            Err(WeightError::InvalidInfluenceSet { expected: 2, found: 1 })
        ));

        let duplicate = r#"{"vertex_count": 1, "influences": ["a", "a"], "weights": [[1.0, 0.0]]}"#;
        assert!(matches!(
            from_str(duplicate),
            Err(WeightError::InvalidParameter { .. })
        ));

        let bad_face = r#"{"vertex_count": 2, "faces": [[0, 1, 5]], "influences": ["a"], "weights": [[1.0], [1.0]]}"#;
        assert!(matches!(from_str(bad_face), Err(WeightError::InvalidFace { .. })));

        assert!(matches!(from_str("{"), Err(WeightError::Parse(_))));
    }
}
