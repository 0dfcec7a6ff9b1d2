//! # scout-cli — Field Scout Command-Line Interface
//!
//! ## Subcommands
//!
//! - `scout schema check|fields`: validate a form document, show its layout.
//! - `scout encode`: complete a record against the schema, embed it in a
//!   carrier, and save it as `team-match-timestamp.svg`.
//! - `scout decode`: extract and decode the payload of a carrier.
//! - `scout list`: classify stored carriers against the active schema.
//! - `scout import`: classify scanned payload strings, optionally saving
//!   the compatible ones.
//! - `scout archive|unarchive|delete`: batch storage operations.
//!
//! ## Exit Codes
//!
//! `0` success, `1` failure or incompatible codes, `2` partial batch failure.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in the command modules; domain logic lives in
//!   the library crates.
//! - Handlers return `anyhow::Result<u8>`; `main` maps it to the exit code.

pub mod archive;
pub mod config;
pub mod decode;
pub mod encode;
pub mod import;
pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use scout_archive::CarrierStore;
use scout_core::Schema;
use scout_crypto::FingerprintCache;
use scout_schema::SchemaDocumentValidator;

use crate::config::ScoutConfig;

/// Success.
pub const EXIT_OK: u8 = 0;
/// Failure, or codes incompatible with the active schema.
pub const EXIT_FAILURE: u8 = 1;
/// Some batch items failed.
pub const EXIT_PARTIAL: u8 = 2;

/// Resolve a path that may be relative to the data directory.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `data_dir` is resolved there; otherwise it is taken relative to the
/// current directory.
pub fn resolve_path(path: &Path, data_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let data_relative = data_dir.join(path);
    if data_relative.exists() {
        data_relative
    } else {
        path.to_path_buf()
    }
}

/// Load and validate a schema document.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let validator = SchemaDocumentValidator::new()?;
    validator
        .load_file(path)
        .with_context(|| format!("failed to load schema {}", path.display()))
}

/// Load the configured schema and fingerprint it.
pub fn load_active(config: &ScoutConfig) -> Result<FingerprintCache> {
    let path = config
        .schema
        .as_deref()
        .context("no schema configured: pass --schema, set SCOUT_SCHEMA, or add `schema:` to the config file")?;
    let schema = load_schema(&resolve_path(path, &config.data_dir))?;
    let cache = FingerprintCache::new(schema)?;
    tracing::debug!(
        schema = %cache.schema().name,
        fingerprint = cache.fingerprint().short(),
        "active schema loaded"
    );
    Ok(cache)
}

/// The carrier store for the configured data directory.
pub fn open_store(config: &ScoutConfig) -> CarrierStore {
    CarrierStore::new(&config.data_dir, config.io_timeout())
}
