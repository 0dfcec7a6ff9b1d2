//! # Form Document Validation
//!
//! Validates form-definition documents against the embedded
//! `form.schema.json` (Draft 2020-12) and loads them into the
//! [`scout_core::Schema`] model.
//!
//! ## Trust Boundary
//!
//! Schema documents arrive from other devices and hand-edited files.
//! Documents that fail validation are rejected with structured violations
//! (instance path, schema path, message) before any model type is built.
//! Documents that pass are then checked against the model invariants
//! ([`scout_core::Schema::validate`]), which JSON Schema cannot express
//! (id uniqueness across sections, dropdown defaults among options).

use std::fmt;
use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use scout_core::{Schema, ScoutError};

/// The embedded form-definition JSON Schema.
pub const FORM_SCHEMA: &str = include_str!("../schemas/form.schema.json");

/// Error while validating or loading a form document.
#[derive(Error, Debug)]
pub enum SchemaDocumentError {
    /// The document did not conform to the form schema.
    #[error("form document failed validation:\n{violations}")]
    ValidationFailed {
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The document conformed structurally but broke a model invariant.
    #[error("form document rejected: {0}")]
    Model(#[from] ScoutError),

    /// The document could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path or label of the document.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The embedded form schema could not be compiled.
    #[error("validator build error: {0}")]
    ValidatorBuildError(String),
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the document.
    pub instance_path: String,
    /// JSON Pointer path within the form schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Document encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` are YAML; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Compiled validator for form-definition documents.
pub struct SchemaDocumentValidator {
    validator: Validator,
}

impl fmt::Debug for SchemaDocumentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDocumentValidator").finish_non_exhaustive()
    }
}

impl SchemaDocumentValidator {
    /// Compile the embedded form schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaDocumentError::ValidatorBuildError` if the embedded
    /// schema fails to parse or compile.
    pub fn new() -> Result<Self, SchemaDocumentError> {
        let schema: Value = serde_json::from_str(FORM_SCHEMA)
            .map_err(|e| SchemaDocumentError::ValidatorBuildError(e.to_string()))?;
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(&schema)
            .map_err(|e| SchemaDocumentError::ValidatorBuildError(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Validate a parsed document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaDocumentError::ValidationFailed` listing every
    /// violation.
    pub fn validate_document(&self, instance: &Value) -> Result<(), SchemaDocumentError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaDocumentError::ValidationFailed {
                violations: ValidationViolations { violations },
            })
        }
    }

    /// Parse, validate, and load a form document from text.
    ///
    /// # Errors
    ///
    /// Returns `DocumentLoadError` if the text does not parse,
    /// `ValidationFailed` if it breaks the form schema, and `Model` if it
    /// breaks a model invariant.
    pub fn load_str(
        &self,
        text: &str,
        format: DocumentFormat,
        label: &str,
    ) -> Result<Schema, SchemaDocumentError> {
        let value: Value = match format {
            DocumentFormat::Json => serde_json::from_str(text).map_err(|e| {
                SchemaDocumentError::DocumentLoadError {
                    path: label.to_string(),
                    reason: format!("invalid JSON: {e}"),
                }
            })?,
            DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| {
                SchemaDocumentError::DocumentLoadError {
                    path: label.to_string(),
                    reason: format!("invalid YAML: {e}"),
                }
            })?,
        };

        self.validate_document(&value)?;

        let schema: Schema =
            serde_json::from_value(value).map_err(|e| SchemaDocumentError::DocumentLoadError {
                path: label.to_string(),
                reason: e.to_string(),
            })?;
        schema.validate()?;

        tracing::debug!(
            document = label,
            schema = %schema.name,
            fields = schema.field_count(),
            "form document loaded"
        );
        Ok(schema)
    }

    /// Read, validate, and load a form document from disk.
    ///
    /// # Errors
    ///
    /// As [`load_str`](Self::load_str), plus `DocumentLoadError` if the file
    /// cannot be read.
    pub fn load_file(&self, path: &Path) -> Result<Schema, SchemaDocumentError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| SchemaDocumentError::DocumentLoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        self.load_str(&text, DocumentFormat::from_path(path), &path.display().to_string())
    }
}
