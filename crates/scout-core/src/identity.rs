//! # Identity Newtypes
//!
//! `FieldId` and `SchemaId` keep field numbering and schema identity from
//! being confused with plain integers or with the schema's content
//! fingerprint.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a field, unique across the entire schema and stable across
/// schema edits.
///
/// Serializes as a bare integer. As a record key on the wire it is the
/// stringified integer (`"12"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FieldId(pub u32);

impl FieldId {
    /// The raw numeric identifier.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for FieldId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FieldId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

/// Stable identity of a schema.
///
/// Renaming or editing a schema keeps its `SchemaId`; compatibility between
/// devices is decided by the content fingerprint, never by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(pub Uuid);

impl SchemaId {
    /// Generate a new random schema identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SchemaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_id_parses_trimmed() {
        assert_eq!(" 42 ".parse::<FieldId>().unwrap(), FieldId(42));
        assert!("x1".parse::<FieldId>().is_err());
    }

    #[test]
    fn field_id_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&FieldId(7)).unwrap(), "7");
    }

    #[test]
    fn schema_ids_are_distinct() {
        assert_ne!(SchemaId::new(), SchemaId::new());
    }
}
