//! # Match Record
//!
//! A `MatchRecord` is one observation: field id to value. In memory it is
//! keyed by `FieldId`; on the wire it is a flat JSON object keyed by the
//! stringified id (`{"1": "254", "3": 4, "4": true}`), re-hydrated to integer
//! keys on load. A key that is not an integer fails deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldValue;
use crate::identity::FieldId;
use crate::schema::Schema;

/// Field id to value mapping for one observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchRecord(BTreeMap<FieldId, FieldValue>);

impl MatchRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field's value. Re-setting a key overwrites it.
    pub fn set(&mut self, id: FieldId, value: impl Into<FieldValue>) {
        self.0.insert(id, value.into());
    }

    /// A field's value.
    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.0.get(&id)
    }

    /// Remove a field's value.
    pub fn remove(&mut self, id: FieldId) -> Option<FieldValue> {
        self.0.remove(&id)
    }

    /// Number of recorded fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate values in field id order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        self.0.iter().map(|(id, v)| (*id, v))
    }

    /// Look up a value by field name and reduce it to filename-safe text.
    ///
    /// The field is found with [`Schema::field_by_name`]; its value is
    /// stringified and every character outside `[A-Za-z0-9_-]` is dropped.
    /// Returns `None` if the field or its value is missing.
    pub fn value_by_name(&self, schema: &Schema, name: &str) -> Option<String> {
        let field = schema.field_by_name(name)?;
        let value = self.get(field.id)?;
        Some(
            value
                .to_string()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect(),
        )
    }
}

impl FromIterator<(FieldId, FieldValue)> for MatchRecord {
    fn from_iter<T: IntoIterator<Item = (FieldId, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
