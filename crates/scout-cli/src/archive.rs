//! # Stored Carrier Subcommands
//!
//! ```bash
//! scout list --archived
//! scout archive 254-12-1700000000.svg 118-3-1699990000.svg
//! scout unarchive 254-12-1700000000.svg
//! scout delete 254-12-1700000000
//! ```

use anyhow::Result;
use clap::Args;

use scout_archive::{classify_store, BatchReport, Classification};

use crate::config::ScoutConfig;
use crate::{load_active, open_store, EXIT_FAILURE, EXIT_OK, EXIT_PARTIAL};

/// Arguments for the list subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Include archived carriers.
    #[arg(long)]
    pub archived: bool,

    /// Print the classification as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the archive, unarchive, and delete subcommands.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Carrier file names; `.svg` may be omitted.
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Storage batch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Archive,
    Unarchive,
    Delete,
}

/// Execute the list subcommand.
pub async fn run_list(args: &ListArgs, config: &ScoutConfig) -> Result<u8> {
    let active = load_active(config)?;
    let classification = classify_store(&open_store(config), active.fingerprint(), args.archived).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        print_classification(&classification);
    }
    Ok(if classification.incompatible.is_empty() {
        EXIT_OK
    } else {
        EXIT_FAILURE
    })
}

/// Execute a batch storage subcommand.
pub async fn run_batch(kind: BatchKind, args: &BatchArgs, config: &ScoutConfig) -> Result<u8> {
    let store = open_store(config);
    let report = match kind {
        BatchKind::Archive => store.archive_many(&args.names).await?,
        BatchKind::Unarchive => store.unarchive_many(&args.names).await?,
        BatchKind::Delete => store.delete_many(&args.names).await?,
    };
    print_report(kind, &report);
    Ok(batch_exit_code(&report))
}

/// `0` when every item succeeded, `1` when none did, `2` otherwise.
pub fn batch_exit_code(report: &BatchReport) -> u8 {
    match (report.succeeded.is_empty(), report.failed.is_empty()) {
        (_, true) => EXIT_OK,
        (true, false) => EXIT_FAILURE,
        (false, false) => EXIT_PARTIAL,
    }
}

fn print_report(kind: BatchKind, report: &BatchReport) {
    let verb = match kind {
        BatchKind::Archive => "Archived",
        BatchKind::Unarchive => "Unarchived",
        BatchKind::Delete => "Deleted",
    };
    for name in &report.succeeded {
        println!("{verb} {name}");
    }
    for failure in &report.failed {
        println!("FAILED {}: {}", failure.name, failure.error);
    }
    println!(
        "{} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
}

pub(crate) fn print_classification(classification: &Classification) {
    println!("Compatible Codes ({})", classification.compatible.len());
    for code in &classification.compatible {
        match code.origin.carrier_name() {
            Some(name) => println!("  {}  {name}", code.origin),
            None => println!("  {}  {} values", code.origin, code.envelope.data.len()),
        }
    }
    if !classification.incompatible.is_empty() {
        println!();
        println!("Incompatible Codes ({})", classification.incompatible.len());
        for code in &classification.incompatible {
            println!("  {}  {}", code.origin, code.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_archive::BatchFailure;

    fn report(ok: usize, failed: usize) -> BatchReport {
        BatchReport {
            succeeded: (0..ok).map(|i| format!("{i}.svg")).collect(),
            failed: (0..failed)
                .map(|i| BatchFailure {
                    name: format!("f{i}.svg"),
                    error: "carrier not found".into(),
                })
                .collect(),
        }
    }

    #[test]
    fn exit_codes() {
        assert_eq!(batch_exit_code(&report(3, 0)), EXIT_OK);
        assert_eq!(batch_exit_code(&report(0, 0)), EXIT_OK);
        assert_eq!(batch_exit_code(&report(2, 1)), EXIT_PARTIAL);
        assert_eq!(batch_exit_code(&report(0, 2)), EXIT_FAILURE);
    }

    #[tokio::test]
    async fn delete_batch_partial() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig {
            data_dir: dir.path().to_path_buf(),
            ..ScoutConfig::default()
        };
        open_store(&config)
            .save("a.svg", scout_codec::BLANK_CARRIER)
            .await
            .unwrap();
        let args = BatchArgs {
            names: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            run_batch(BatchKind::Delete, &args, &config).await.unwrap(),
            EXIT_PARTIAL
        );
    }
}
