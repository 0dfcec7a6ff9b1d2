//! # Import Subcommand
//!
//! Classifies scanned payload strings against the active schema. With
//! `--save`, each compatible payload is embedded in a blank carrier and
//! saved under its `team-match-timestamp.svg` name. A taken name gets a
//! sequence number (`team-match-timestamp-2.svg`); nothing is overwritten.
//!
//! ```bash
//! scout import "eJyrVkrOz0nNS..." "eJyrVkrO..."
//! scout import --from-file scans.txt --save
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scout_archive::{classify_payloads, ArchiveError, CarrierName, CarrierStore};
use scout_codec::{embed, RecordCodec, BLANK_CARRIER};
use scout_core::Timestamp;

use crate::archive::print_classification;
use crate::config::ScoutConfig;
use crate::{load_active, open_store, resolve_path, EXIT_FAILURE, EXIT_OK};

/// Arguments for the import subcommand.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Scanned payload strings.
    #[arg(required_unless_present = "from_file")]
    pub payloads: Vec<String>,

    /// Read payloads from a file, one per line.
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    /// Save compatible payloads to the store.
    #[arg(long)]
    pub save: bool,

    /// Print the classification as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the import subcommand.
pub async fn run_import(args: &ImportArgs, config: &ScoutConfig) -> Result<u8> {
    let active = load_active(config)?;

    let mut payloads = args.payloads.clone();
    if let Some(file) = &args.from_file {
        let path = resolve_path(file, &config.data_dir);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        payloads.extend(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        );
    }

    let classification = classify_payloads(&payloads, active.fingerprint());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        print_classification(&classification);
    }

    if args.save {
        let store = open_store(config);
        let codec = RecordCodec::new();
        let now = Timestamp::now();
        for code in &classification.compatible {
            let record = &code.envelope.data;
            let payload = codec.serialize(record, active.fingerprint())?;
            let name = CarrierName::for_record(active.schema(), record, &now);
            let path = save_unique(&store, &name, &embed(BLANK_CARRIER, payload.as_str())).await?;
            println!("Saved {}", path.display());
        }
    }

    Ok(if classification.incompatible.is_empty() {
        EXIT_OK
    } else {
        EXIT_FAILURE
    })
}

/// Names tried after the plain one before giving up.
const MAX_NUMBERED_NAMES: u32 = 99;

async fn save_unique(store: &CarrierStore, name: &CarrierName, body: &str) -> Result<PathBuf> {
    let mut candidate = name.file_name();
    for n in 2..=MAX_NUMBERED_NAMES + 1 {
        match store.save_new(&candidate, body).await {
            Ok(path) => return Ok(path),
            Err(ArchiveError::AlreadyExists(taken)) => {
                tracing::debug!(file = %taken, "carrier name taken");
                candidate = name.numbered_file_name(n);
            }
            Err(e) => return Err(e.into()),
        }
    }
    anyhow::bail!("no free carrier name for {name}")
}
