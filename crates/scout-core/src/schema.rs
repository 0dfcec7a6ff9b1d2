//! # Form Schema
//!
//! A `Schema` is an ordered list of titled sections, each an ordered list of
//! fields. Section order is display-significant; the flattened
//! section-then-field traversal defines each field's absolute index (see
//! [`crate::layout`]).
//!
//! ## Invariants
//!
//! Checked by [`Schema::validate`]:
//!
//! - field ids are unique across the entire schema, not just per section;
//! - section titles are unique (they qualify field names in axis labels);
//! - counter defaults sit within `min..=max` when bounds are given;
//! - dropdown options are unique and a configured default is one of them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::field::{Field, FieldKind};
use crate::identity::{FieldId, SchemaId};
use crate::layout::FieldLayout;

/// A titled group of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section title, unique within the schema.
    pub title: String,
    /// Fields in display order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A form schema: the shape of a match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Stable identity, kept across edits and renames.
    #[serde(default)]
    pub id: SchemaId,
    /// Display name.
    pub name: String,
    /// Sections in display order.
    pub sections: Vec<Section>,
}

impl Schema {
    /// Construct a schema with a fresh identity.
    pub fn new(name: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            id: SchemaId::new(),
            name: name.into(),
            sections,
        }
    }

    /// Construct and validate a schema.
    ///
    /// # Errors
    ///
    /// Returns `ScoutError::SchemaValidation` if an invariant is violated.
    pub fn try_new(name: impl Into<String>, sections: Vec<Section>) -> Result<Self, ScoutError> {
        let schema = Self::new(name, sections);
        schema.validate()?;
        Ok(schema)
    }

    /// Iterate fields in flattened section-then-field order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// Total number of fields.
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }

    /// Look up a field by id.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields().find(|f| f.id == id)
    }

    /// Look up a field by name, ignoring case and surrounding whitespace.
    ///
    /// When several fields share a name the last one in traversal order wins,
    /// matching how stored records have always resolved names.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        let wanted = name.trim().to_lowercase();
        self.fields()
            .filter(|f| f.name.trim().to_lowercase() == wanted)
            .last()
    }

    /// Build the absolute-index layout of this schema.
    pub fn layout(&self) -> FieldLayout {
        FieldLayout::new(self)
    }

    /// Check the structural invariants of this schema.
    ///
    /// # Errors
    ///
    /// Returns `ScoutError::SchemaValidation` naming the first violation.
    pub fn validate(&self) -> Result<(), ScoutError> {
        let mut titles = HashSet::new();
        let mut ids = HashSet::new();

        for section in &self.sections {
            if !titles.insert(section.title.as_str()) {
                return Err(ScoutError::SchemaValidation(format!(
                    "duplicate section title {:?}",
                    section.title
                )));
            }
            for field in &section.fields {
                if !ids.insert(field.id) {
                    return Err(ScoutError::SchemaValidation(format!(
                        "duplicate field id {} ({:?} in section {:?})",
                        field.id, field.name, section.title
                    )));
                }
                validate_kind(field)?;
            }
        }
        Ok(())
    }
}

fn validate_kind(field: &Field) -> Result<(), ScoutError> {
    match &field.kind {
        FieldKind::Counter(props) => {
            let below = props.min.is_some_and(|min| props.default < min);
            let above = props.max.is_some_and(|max| props.default > max);
            if below || above {
                return Err(ScoutError::SchemaValidation(format!(
                    "counter {} ({:?}): default {} outside bounds {:?}..={:?}",
                    field.id, field.name, props.default, props.min, props.max
                )));
            }
        }
        FieldKind::Dropdown(props) => {
            let mut seen = HashSet::new();
            if let Some(dup) = props.options.iter().find(|o| !seen.insert(o.as_str())) {
                return Err(ScoutError::SchemaValidation(format!(
                    "dropdown {} ({:?}): duplicate option {dup:?}",
                    field.id, field.name
                )));
            }
            if let Some(default) = &props.default {
                if !props.options.contains(default) {
                    return Err(ScoutError::SchemaValidation(format!(
                        "dropdown {} ({:?}): default {default:?} is not an option",
                        field.id, field.name
                    )));
                }
            }
        }
        FieldKind::Checkbox(_) | FieldKind::Text(_) | FieldKind::Timer(_) | FieldKind::Grid(_) => {}
    }
    Ok(())
}
