//! # Schema Fingerprints
//!
//! A fingerprint is the lowercase hex SHA-256 of a schema's canonical
//! content. Receivers compare the fingerprint embedded in a payload against
//! the active schema's fingerprint before trusting decoded values.
//!
//! ## Hash Input
//!
//! The input is `{"sections": [...]}`: section titles, field order, ids,
//! names, types, required flags, and kind-specific props. The schema's `id`
//! and `name` are identity and display metadata and are excluded, so renaming
//! a schema keeps its codes compatible. Input `label` props are excluded for
//! the same reason.
//!
//! Section order and field order are part of the input. Reordering sections
//! changes the fingerprint and makes previously compatible data incompatible.
//! Existing codes depend on this, so it must not be normalized away.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use scout_core::{CanonicalBytes, CanonicalizationError, Field, FieldLayout, Schema, Section};

use crate::sha256::{SchemaHasher, Sha256Hasher};

/// Errors from fingerprint computation or parsing.
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// The schema content could not be canonicalized.
    #[error("schema canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A fingerprint string is not 64 lowercase hex characters.
    #[error("invalid fingerprint {value:?}: {reason}")]
    Invalid {
        /// The offending text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// The fingerprint of a schema's content.
///
/// Payloads carry this value verbatim. Decoding is lenient (any string) so
/// that a payload from a foreign or older hash scheme is reported as a schema
/// mismatch rather than as corruption; use [`SchemaFingerprint::parse`] for
/// operator input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaFingerprint(String);

impl SchemaFingerprint {
    /// Parse and validate a fingerprint string.
    ///
    /// # Errors
    ///
    /// Returns `FingerprintError::Invalid` unless the value is exactly 64
    /// lowercase hex characters.
    pub fn parse(value: &str) -> Result<Self, FingerprintError> {
        let value = value.trim();
        if value.len() != 64 {
            return Err(FingerprintError::Invalid {
                value: value.to_string(),
                reason: format!("expected 64 hex characters, got {}", value.len()),
            });
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(FingerprintError::Invalid {
                value: value.to_string(),
                reason: "expected lowercase hex".to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }

    /// The hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A short prefix for log lines and listings.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for SchemaFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize)]
struct FingerprintInput {
    sections: Vec<Section>,
}

impl FingerprintInput {
    fn of(schema: &Schema) -> Self {
        let sections = schema
            .sections
            .iter()
            .map(|section| Section {
                title: section.title.clone(),
                fields: section
                    .fields
                    .iter()
                    .map(|field| Field {
                        kind: field.kind.without_labels(),
                        ..field.clone()
                    })
                    .collect(),
            })
            .collect();
        Self { sections }
    }
}

/// Fingerprint a schema with SHA-256.
///
/// # Errors
///
/// Returns `FingerprintError::Canonicalization` if the schema content cannot
/// be canonicalized.
pub fn fingerprint(schema: &Schema) -> Result<SchemaFingerprint, FingerprintError> {
    fingerprint_with(&Sha256Hasher, schema)
}

/// Fingerprint a schema with the given hash primitive.
///
/// # Errors
///
/// Returns `FingerprintError::Canonicalization` if the schema content cannot
/// be canonicalized.
pub fn fingerprint_with(
    hasher: &impl SchemaHasher,
    schema: &Schema,
) -> Result<SchemaFingerprint, FingerprintError> {
    let canonical = CanonicalBytes::new(&FingerprintInput::of(schema))?;
    Ok(SchemaFingerprint(hasher.hash(&canonical).to_hex()))
}

/// The active schema with its fingerprint and layout, computed once.
#[derive(Debug, Clone)]
pub struct FingerprintCache<H = Sha256Hasher> {
    hasher: H,
    schema: Schema,
    fingerprint: SchemaFingerprint,
    layout: FieldLayout,
}

impl FingerprintCache<Sha256Hasher> {
    /// Cache a schema using SHA-256.
    ///
    /// # Errors
    ///
    /// Returns `FingerprintError::Canonicalization` if the schema content
    /// cannot be canonicalized.
    pub fn new(schema: Schema) -> Result<Self, FingerprintError> {
        Self::with_hasher(Sha256Hasher, schema)
    }
}

impl<H: SchemaHasher> FingerprintCache<H> {
    /// Cache a schema using the given hash primitive.
    ///
    /// # Errors
    ///
    /// Returns `FingerprintError::Canonicalization` if the schema content
    /// cannot be canonicalized.
    pub fn with_hasher(hasher: H, schema: Schema) -> Result<Self, FingerprintError> {
        let fingerprint = fingerprint_with(&hasher, &schema)?;
        let layout = schema.layout();
        tracing::debug!(schema = %schema.name, fingerprint = fingerprint.short(), "schema fingerprinted");
        Ok(Self {
            hasher,
            schema,
            fingerprint,
            layout,
        })
    }

    /// The cached schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The cached fingerprint.
    pub fn fingerprint(&self) -> &SchemaFingerprint {
        &self.fingerprint
    }

    /// The cached absolute-index layout.
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Replace the active schema.
    ///
    /// The fingerprint and layout are recomputed only when the section
    /// content differs; a rename keeps both. Returns `true` when the
    /// fingerprint changed, which invalidates any session bound to the old
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `FingerprintError::Canonicalization` if the new content cannot
    /// be canonicalized; the cache is left unchanged.
    pub fn replace(&mut self, schema: Schema) -> Result<bool, FingerprintError> {
        if schema.sections == self.schema.sections {
            self.schema = schema;
            return Ok(false);
        }
        let fingerprint = fingerprint_with(&self.hasher, &schema)?;
        let changed = fingerprint != self.fingerprint;
        tracing::info!(
            schema = %schema.name,
            old = self.fingerprint.short(),
            new = fingerprint.short(),
            "active schema replaced"
        );
        self.layout = schema.layout();
        self.schema = schema;
        self.fingerprint = fingerprint;
        Ok(changed)
    }

    /// Whether a payload fingerprint matches the active schema.
    pub fn matches(&self, other: &SchemaFingerprint) -> bool {
        self.fingerprint == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::{
        CheckboxProps, CounterProps, DropdownProps, Field, FieldId, FieldKind, TextProps,
    };

    fn schema() -> Schema {
        Schema::new(
            "Regional",
            vec![
                Section {
                    title: "Info".into(),
                    fields: vec![Field::new(
                        1,
                        "Team Number",
                        true,
                        FieldKind::Text(TextProps::default()),
                    )],
                },
                Section {
                    title: "Auto".into(),
                    fields: vec![
                        Field::new(2, "Leave", true, FieldKind::Checkbox(CheckboxProps::default())),
                        Field::new(
                            3,
                            "Start",
                            false,
                            FieldKind::Dropdown(DropdownProps {
                                options: vec!["Left".into(), "Right".into()],
                                default: None,
                                label: None,
                            }),
                        ),
                    ],
                },
            ],
        )
    }

    #[test]
    fn deterministic() {
        let s = schema();
        assert_eq!(fingerprint(&s).unwrap(), fingerprint(&s).unwrap());
        assert_eq!(fingerprint(&s).unwrap().as_str().len(), 64);
    }

    #[test]
    fn identity_and_name_excluded() {
        let a = schema();
        let mut b = schema();
        b.name = "Renamed".into();
        assert_ne!(a.id, b.id);
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn input_labels_excluded() {
        let a = schema();
        let mut b = schema();
        if let FieldKind::Dropdown(props) = &mut b.sections[1].fields[1].kind {
            props.label = Some("Starting position".into());
        }
        if let FieldKind::Text(props) = &mut b.sections[0].fields[0].kind {
            props.label = Some("Team".into());
        }
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn field_id_change_detected() {
        let a = schema();
        let mut b = schema();
        b.sections[1].fields[0].id = FieldId(9);
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn field_type_change_detected() {
        let a = schema();
        let mut b = schema();
        b.sections[1].fields[0].kind = FieldKind::Counter(CounterProps::default());
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn required_flag_change_detected() {
        let a = schema();
        let mut b = schema();
        b.sections[1].fields[1].required = true;
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn option_change_detected() {
        let a = schema();
        let mut b = schema();
        if let FieldKind::Dropdown(props) = &mut b.sections[1].fields[1].kind {
            props.options.push("Center".into());
        }
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn section_reorder_changes_fingerprint() {
        let a = schema();
        let mut b = schema();
        b.sections.reverse();
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn parse_validates() {
        let fp = fingerprint(&schema()).unwrap();
        assert_eq!(SchemaFingerprint::parse(fp.as_str()).unwrap(), fp);
        assert!(SchemaFingerprint::parse("abc").is_err());
        assert!(SchemaFingerprint::parse(&"G".repeat(64)).is_err());
    }

    #[test]
    fn cache_recomputes_only_on_content_change() {
        let mut cache = FingerprintCache::new(schema()).unwrap();
        let original = cache.fingerprint().clone();

        let mut renamed = schema();
        renamed.name = "Other".into();
        assert!(!cache.replace(renamed).unwrap());
        assert_eq!(cache.fingerprint(), &original);
        assert_eq!(cache.schema().name, "Other");

        let mut edited = schema();
        edited.sections[0].fields[0].required = false;
        assert!(cache.replace(edited).unwrap());
        assert_ne!(cache.fingerprint(), &original);
        assert!(!cache.matches(&original));
    }

    #[test]
    fn cache_layout_matches_schema() {
        let cache = FingerprintCache::new(schema()).unwrap();
        assert_eq!(cache.layout().resolve_axis("Auto - Start"), Some(2));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use scout_core::{CounterProps, Field, FieldKind};

    proptest! {
        /// Any change to a counter's default yields a different fingerprint.
        #[test]
        fn counter_default_sensitivity(a in -1000i64..1000, b in -1000i64..1000) {
            prop_assume!(a != b);
            let make = |default| Schema::new("p", vec![Section {
                title: "S".into(),
                fields: vec![Field::new(1, "C", true, FieldKind::Counter(CounterProps {
                    default,
                    min: None,
                    max: None,
                }))],
            }]);
            prop_assert_ne!(fingerprint(&make(a)).unwrap(), fingerprint(&make(b)).unwrap());
        }
    }
}
