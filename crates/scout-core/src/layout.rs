//! # Field Layout — Absolute Field Indices
//!
//! Consumers that address fields positionally (chart axes, heatmap
//! pickers) use the field's **absolute index**: its position in the
//! flattened section-then-field traversal. `FieldLayout` computes that
//! index once per schema so every consumer agrees on field identity.
//!
//! Axis labels have the form `"Section - Field"`. A label without the
//! separator names a field alone, and the first field with that name in
//! traversal order wins.

use std::collections::HashMap;

use crate::field::FieldType;
use crate::identity::FieldId;
use crate::schema::Schema;

/// Separator between section title and field name in axis labels.
pub const AXIS_SEPARATOR: &str = " - ";

/// One field's position in the flattened schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    /// Absolute index in flattened traversal order.
    pub index: usize,
    /// Title of the containing section.
    pub section: String,
    /// Field identifier.
    pub field_id: FieldId,
    /// Field display name.
    pub field_name: String,
    /// Field kind tag.
    pub field_type: FieldType,
    /// Whether the field is required.
    pub required: bool,
}

impl LayoutEntry {
    /// The `"Section - Field"` label for this entry.
    pub fn axis_label(&self) -> String {
        format!("{}{AXIS_SEPARATOR}{}", self.section, self.field_name)
    }
}

/// Absolute-index table for one schema.
#[derive(Debug, Clone, Default)]
pub struct FieldLayout {
    entries: Vec<LayoutEntry>,
    by_id: HashMap<FieldId, usize>,
}

impl FieldLayout {
    /// Compute the layout of a schema.
    pub fn new(schema: &Schema) -> Self {
        let mut entries = Vec::with_capacity(schema.field_count());
        let mut by_id = HashMap::with_capacity(schema.field_count());

        for section in &schema.sections {
            for field in &section.fields {
                let index = entries.len();
                by_id.entry(field.id).or_insert(index);
                entries.push(LayoutEntry {
                    index,
                    section: section.title.clone(),
                    field_id: field.id,
                    field_name: field.name.clone(),
                    field_type: field.field_type(),
                    required: field.required,
                });
            }
        }

        Self { entries, by_id }
    }

    /// All entries in absolute-index order.
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absolute index of a field id.
    pub fn absolute_index(&self, id: FieldId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// The entry at an absolute index.
    pub fn entry(&self, index: usize) -> Option<&LayoutEntry> {
        self.entries.get(index)
    }

    /// The `"Section - Field"` label at an absolute index.
    pub fn axis_label(&self, index: usize) -> Option<String> {
        self.entry(index).map(LayoutEntry::axis_label)
    }

    /// Resolve an axis label to an absolute index.
    ///
    /// `"Section - Field"` must match both section title and field name. A
    /// label that does not split into exactly two parts is treated as a bare
    /// field name.
    pub fn resolve_axis(&self, label: &str) -> Option<usize> {
        let parts: Vec<&str> = label.split(AXIS_SEPARATOR).collect();
        let (section, name) = match parts.as_slice() {
            [section, name] => (Some(*section), *name),
            _ => (None, label),
        };
        self.entries
            .iter()
            .find(|e| e.field_name == name && section.map_or(true, |s| e.section == s))
            .map(|e| e.index)
    }

    /// Entries of a given kind, for pickers that only accept one kind.
    pub fn of_type(&self, field_type: FieldType) -> impl Iterator<Item = &LayoutEntry> {
        self.entries
            .iter()
            .filter(move |e| e.field_type == field_type)
    }
}
