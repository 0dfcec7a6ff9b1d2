//! # Decode Subcommand
//!
//! ```bash
//! scout decode saved-matches/254-12-1700000000.svg
//! scout decode 254-12-1700000000        # looked up in the store
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scout_codec::{extract, RecordCodec};

use crate::config::ScoutConfig;
use crate::{load_active, open_store, resolve_path, EXIT_FAILURE, EXIT_OK};

/// Arguments for the decode subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Carrier file path, or the name of a stored carrier.
    pub carrier: PathBuf,
}

/// Execute the decode subcommand.
pub async fn run_decode(args: &DecodeArgs, config: &ScoutConfig) -> Result<u8> {
    let path = resolve_path(&args.carrier, &config.data_dir);
    let body = if path.is_file() {
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read carrier {}", path.display()))?
    } else {
        let name = args.carrier.to_string_lossy();
        open_store(config).read(&name).await?.body
    };

    let Some(payload) = extract(&body) else {
        println!("No payload in {}", args.carrier.display());
        return Ok(EXIT_FAILURE);
    };
    let envelope = RecordCodec::new().deserialize(&payload)?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if config.schema.is_none() {
        return Ok(EXIT_OK);
    }
    let active = load_active(config)?;
    if !active.matches(&envelope.schema) {
        eprintln!(
            "Incompatible: payload schema {} does not match active schema {}",
            envelope.schema.short(),
            active.fingerprint().short()
        );
        return Ok(EXIT_FAILURE);
    }
    for (id, value) in envelope.data.iter() {
        let label = active
            .layout()
            .absolute_index(id)
            .and_then(|i| active.layout().axis_label(i))
            .unwrap_or_else(|| format!("field {id}"));
        eprintln!("  {label}: {value}");
    }
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn carrier_without_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.svg");
        std::fs::write(&path, scout_codec::BLANK_CARRIER).unwrap();
        let config = ScoutConfig {
            data_dir: dir.path().to_path_buf(),
            ..ScoutConfig::default()
        };
        let code = run_decode(&DecodeArgs { carrier: path }, &config)
            .await
            .unwrap();
        assert_eq!(code, EXIT_FAILURE);
    }

    #[tokio::test]
    async fn missing_carrier_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig {
            data_dir: dir.path().to_path_buf(),
            ..ScoutConfig::default()
        };
        let args = DecodeArgs {
            carrier: PathBuf::from("ghost"),
        };
        assert!(run_decode(&args, &config).await.is_err());
    }
}
