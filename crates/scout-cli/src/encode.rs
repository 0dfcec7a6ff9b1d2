//! # Encode Subcommand
//!
//! Completes a record against the active schema, embeds its payload in a
//! carrier, and saves the carrier to the store.
//!
//! ```bash
//! scout --schema forms/season.yaml encode --record match.json --carrier qr.svg
//! ```
//!
//! The record file is the wire form of a match record: a JSON object keyed
//! by field id, e.g. `{"1": "254", "2": "12", "3": true, "4": 3}`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scout_archive::CarrierName;
use scout_codec::{try_embed, RecordCodec, BLANK_CARRIER};
use scout_core::{MatchRecord, Timestamp};
use scout_state::{FormSession, SessionError};

use crate::config::ScoutConfig;
use crate::{load_active, open_store, resolve_path, EXIT_FAILURE, EXIT_OK};

/// Arguments for the encode subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// JSON record keyed by field id.
    #[arg(long)]
    pub record: PathBuf,

    /// SVG carrier to embed into; a blank carrier is used when omitted.
    #[arg(long)]
    pub carrier: Option<PathBuf>,

    /// Unix timestamp for the file name; defaults to now.
    #[arg(long)]
    pub timestamp: Option<i64>,

    /// Print the carrier instead of saving it.
    #[arg(long)]
    pub stdout: bool,
}

/// Execute the encode subcommand.
pub async fn run_encode(args: &EncodeArgs, config: &ScoutConfig) -> Result<u8> {
    let active = load_active(config)?;

    let record_path = resolve_path(&args.record, &config.data_dir);
    let text = std::fs::read_to_string(&record_path)
        .with_context(|| format!("failed to read record {}", record_path.display()))?;
    let restored: MatchRecord = serde_json::from_str(&text)
        .with_context(|| format!("invalid record {}", record_path.display()))?;
    for (id, _) in restored.iter() {
        if active.schema().field(id).is_none() {
            tracing::warn!(field = %id, "record value has no field in schema; dropped");
        }
    }

    let mut session = FormSession::open(
        active.schema().clone(),
        active.fingerprint().clone(),
        Some(restored),
    );
    let record = match session.complete() {
        Ok(record) => record,
        Err(SessionError::RequiredFieldsMissing { fields }) => {
            println!("Record incomplete; required fields unanswered:");
            for id in fields {
                let label = active
                    .layout()
                    .absolute_index(id)
                    .and_then(|i| active.layout().axis_label(i))
                    .unwrap_or_else(|| id.to_string());
                println!("  [{id}] {label}");
            }
            return Ok(EXIT_FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let payload = RecordCodec::new().serialize(&record, active.fingerprint())?;

    let carrier = match &args.carrier {
        Some(path) => {
            let path = resolve_path(path, &config.data_dir);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read carrier {}", path.display()))?
        }
        None => BLANK_CARRIER.to_string(),
    };
    let body = try_embed(&carrier, payload.as_str()).context("cannot embed payload")?;

    if args.stdout {
        println!("{body}");
        return Ok(EXIT_OK);
    }

    let timestamp = match args.timestamp {
        Some(secs) => Timestamp::from_unix_seconds(secs)?,
        None => Timestamp::now(),
    };
    let name = CarrierName::for_record(active.schema(), &record, &timestamp);
    let path = open_store(config).save(&name.file_name(), &body).await?;

    println!("Saved {}", path.display());
    println!("  {name}");
    println!("  schema:  {}", active.fingerprint().short());
    println!("  payload: {} bytes", payload.as_str().len());
    Ok(EXIT_OK)
}
