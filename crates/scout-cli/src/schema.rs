//! # Schema Subcommand
//!
//! ```bash
//! scout schema check forms/season.yaml
//! scout schema fields forms/season.yaml
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use scout_crypto::FingerprintCache;
use scout_schema::{SchemaDocumentError, SchemaDocumentValidator};

use crate::config::ScoutConfig;
use crate::{resolve_path, EXIT_FAILURE, EXIT_OK};

/// Schema subcommand arguments.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

/// Available schema subcommands.
#[derive(Subcommand, Debug)]
pub enum SchemaCommand {
    /// Validate a form document and print its fingerprint.
    Check {
        /// Schema document; defaults to the configured schema.
        file: Option<PathBuf>,
    },
    /// List fields with absolute index and axis label.
    Fields {
        /// Schema document; defaults to the configured schema.
        file: Option<PathBuf>,
    },
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs, config: &ScoutConfig) -> Result<u8> {
    match &args.command {
        SchemaCommand::Check { file } => run_check(&target(file.as_deref(), config)?),
        SchemaCommand::Fields { file } => run_fields(&target(file.as_deref(), config)?),
    }
}

fn target(file: Option<&Path>, config: &ScoutConfig) -> Result<PathBuf> {
    let path = file
        .or(config.schema.as_deref())
        .context("no schema file given and none configured")?;
    Ok(resolve_path(path, &config.data_dir))
}

fn run_check(path: &Path) -> Result<u8> {
    let validator = SchemaDocumentValidator::new()?;
    let schema = match validator.load_file(path) {
        Ok(schema) => schema,
        Err(SchemaDocumentError::ValidationFailed { violations }) => {
            println!("INVALID {}", path.display());
            println!("{violations}");
            return Ok(EXIT_FAILURE);
        }
        Err(SchemaDocumentError::Model(e)) => {
            println!("INVALID {}", path.display());
            println!("  {e}");
            return Ok(EXIT_FAILURE);
        }
        Err(e) => return Err(e.into()),
    };
    let cache = FingerprintCache::new(schema)?;
    println!("OK {}", path.display());
    println!("  name:        {}", cache.schema().name);
    println!("  sections:    {}", cache.schema().sections.len());
    println!("  fields:      {}", cache.schema().field_count());
    println!("  fingerprint: {}", cache.fingerprint());
    Ok(EXIT_OK)
}

fn run_fields(path: &Path) -> Result<u8> {
    let schema = crate::load_schema(path)?;
    let layout = schema.layout();
    println!("{:>5}  {:>5}  {:<9} {:<3} LABEL", "INDEX", "ID", "TYPE", "REQ");
    for entry in layout.entries() {
        println!(
            "{:>5}  {:>5}  {:<9} {:<3} {}",
            entry.index,
            entry.field_id.get(),
            entry.field_type.as_str(),
            if entry.required { "*" } else { "" },
            entry.axis_label()
        );
    }
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"{
        "name": "Practice",
        "sections": [
            {"title": "Info", "fields": [
                {"id": 1, "name": "Team Number", "type": "text", "required": true}
            ]}
        ]
    }"#;

    #[test]
    fn check_valid_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, FORM).unwrap();
        assert_eq!(run_check(&path).unwrap(), EXIT_OK);
        assert_eq!(run_fields(&path).unwrap(), EXIT_OK);
    }

    #[test]
    fn check_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, r#"{"name": "x", "sections": [{"title": "A", "fields": [{"id": 1}]}]}"#)
            .unwrap();
        assert_eq!(run_check(&path).unwrap(), EXIT_FAILURE);
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_check(&dir.path().join("absent.json")).is_err());
    }
}
