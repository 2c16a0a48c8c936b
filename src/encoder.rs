//! Availability zone encoding
//!
//! Maps AZ names to compact identifiers carried in the `az_id` column.
//! The table is injected into a record set and must not change while a
//! snapshot is being built.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Encodes AZ names into compact identifiers
pub trait AzEncoder {
    /// Encode an AZ name. `None` (no AZ) encodes to `None`.
    fn encode_az(&self, az: Option<&str>) -> Result<Option<String>, EncodeError>;
}

/// Fixed AZ table, ids assigned from 1 in list order
#[derive(Debug, Clone, Default)]
pub struct AzIndex {
    ids: HashMap<String, u32>,
}

impl AzIndex {
    /// Build the table from an ordered list of AZ names
    ///
    /// Repeated names keep the id of their first occurrence.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: HashMap<String, u32> = HashMap::new();
        let mut next = 1u32;

        for name in names {
            if let Entry::Vacant(entry) = ids.entry(name.into()) {
                entry.insert(next);
                next += 1;
            }
        }

        Self { ids }
    }

    /// Number of known AZs
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl AzEncoder for AzIndex {
    fn encode_az(&self, az: Option<&str>) -> Result<Option<String>, EncodeError> {
        match az {
            None => Ok(None),
            Some(name) => self
                .ids
                .get(name)
                .map(|id| Some(id.to_string()))
                .ok_or_else(|| EncodeError::UnknownAz(name.to_string())),
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("Unknown availability zone: {0}")]
    UnknownAz(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_list_order() {
        let index = AzIndex::new(["z1", "z2", "z3"]);
        assert_eq!(index.encode_az(Some("z1")).unwrap(), Some("1".to_string()));
        assert_eq!(index.encode_az(Some("z3")).unwrap(), Some("3".to_string()));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_no_az_encodes_to_none() {
        let index = AzIndex::new(["z1"]);
        assert_eq!(index.encode_az(None).unwrap(), None);
    }

    #[test]
    fn test_unknown_az() {
        let index = AzIndex::new(["z1"]);
        assert_eq!(
            index.encode_az(Some("z9")),
            Err(EncodeError::UnknownAz("z9".to_string()))
        );
    }

    #[test]
    fn test_duplicates_keep_first_id() {
        let index = AzIndex::new(["z1", "z2", "z1", "z3"]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.encode_az(Some("z1")).unwrap(), Some("1".to_string()));
        assert_eq!(index.encode_az(Some("z3")).unwrap(), Some("3".to_string()));
    }
}
