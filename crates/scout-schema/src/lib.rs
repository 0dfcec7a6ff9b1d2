//! # scout-schema — Form Document Validation
//!
//! Schema documents are the one input a device accepts from outside its own
//! form editor. This crate is the gate they pass through:
//!
//! - [`SchemaDocumentValidator::validate_document`] checks a JSON value
//!   against the embedded `form.schema.json` (Draft 2020-12).
//! - [`SchemaDocumentValidator::load_file`] reads a JSON or YAML document,
//!   validates it, builds a [`scout_core::Schema`], and checks the model
//!   invariants.
//!
//! ## Crate Policy
//!
//! - Depends only on `scout-core` internally.
//! - Invalid documents are rejected with structured errors including the
//!   instance path and the violated rule.

pub mod validate;

pub use validate::{
    DocumentFormat, SchemaDocumentError, SchemaDocumentValidator, ValidationViolations,
    Violation, FORM_SCHEMA,
};
