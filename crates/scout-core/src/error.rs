//! # Error Types
//!
//! Structured errors shared across the workspace. Crate-specific failures
//! (codec, archive, session) live in their own crates and wrap these where
//! they cross a boundary.

use thiserror::Error;

/// Top-level error type for the scout core.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A schema violated one of its structural invariants.
    #[error("schema validation error: {0}")]
    SchemaValidation(String),

    /// Lifecycle transition rejected.
    #[error("invalid state transition: {0}")]
    InvalidTransition(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
