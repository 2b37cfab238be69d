//! Ordered influence sets.

use std::collections::HashMap;

use crate::error::{Result, WeightError};
use crate::mesh::InfluenceId;

/// An ordered list of influence names with a fixed column assignment.
///
/// The position of a name in the set is its column in every weight row read
/// or written with this set. A set is built once per operation; a later
/// operation may build a differently ordered set for the same skin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InfluenceSet {
    names: Vec<String>,
    lookup: HashMap<String, InfluenceId>,
}

impl InfluenceSet {
    /// Create a set from influence names.
    ///
    /// Returns an error if a name appears twice.
    pub fn new<T, S>(names: T) -> Result<Self>
    where
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for name in names {
            let name = name.into();
            if set.lookup.contains_key(&name) {
                return Err(WeightError::invalid_param(
                    "influences",
                    name,
                    "influence names must be unique",
                ));
            }
            set.lookup.insert(name.clone(), InfluenceId::new(set.names.len()));
            set.names.push(name);
        }
        Ok(set)
    }

    /// Number of influences.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the set has no influences.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column of the named influence.
    pub fn index_of(&self, name: &str) -> Option<InfluenceId> {
        self.lookup.get(name).copied()
    }

    /// Name of the influence in column `id`.
    pub fn name(&self, id: InfluenceId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Influence names in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// For every column of `self`, the matching column in `other`.
    ///
    /// Fails with [`WeightError::UnknownInfluence`] if `other` lacks a name.
    pub fn columns_in(&self, other: &InfluenceSet) -> Result<Vec<usize>> {
        self.names
            .iter()
            .map(|name| {
                other
                    .index_of(name)
                    .map(InfluenceId::index)
                    .ok_or_else(|| WeightError::UnknownInfluence { name: name.clone() })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_assignment() {
        let set = InfluenceSet::new(["hip", "knee", "ankle"]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.index_of("knee"), Some(InfluenceId::new(1)));
        assert_eq!(set.name(InfluenceId::new(2)), Some("ankle"));
        assert_eq!(set.index_of("toe"), None);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        assert!(InfluenceSet::new(["a", "b", "a"]).is_err());
    }

    #[test]
    fn test_columns_in_reordered_set() {
        let stored = InfluenceSet::new(["a", "b", "c"]).unwrap();
        let request = InfluenceSet::new(["c", "a"]).unwrap();
        assert_eq!(request.columns_in(&stored).unwrap(), vec![2, 0]);

        let bad = InfluenceSet::new(["a", "z"]).unwrap();
        let err = bad.columns_in(&stored).unwrap_err();
        assert!(matches!(err, WeightError::UnknownInfluence { ref name } if name == "z"));
    }
}
