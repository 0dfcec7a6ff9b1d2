//! Errors raised by carrier storage.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors from carrier storage operations.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// A filesystem operation failed.
    #[error("{op} failed for {}: {source}", path.display())]
    Io {
        /// The operation that failed.
        op: &'static str,
        /// The path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A filesystem operation did not finish within the configured bound.
    #[error("{op} timed out after {}ms for {}", after.as_millis(), path.display())]
    Timeout {
        /// The operation that timed out.
        op: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The bound that elapsed.
        after: Duration,
    },

    /// No carrier with this name exists in the expected location.
    #[error("carrier not found: {0}")]
    NotFound(String),

    /// A carrier with this name already exists at the destination.
    #[error("carrier already exists: {0}")]
    AlreadyExists(String),

    /// The name is not a plain carrier file name.
    #[error("invalid carrier name {0:?}")]
    InvalidName(String),

    /// A background task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),
}
