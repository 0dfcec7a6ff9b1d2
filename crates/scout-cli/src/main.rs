//! # scout CLI entry point
//!
//! Parses command-line arguments, resolves configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scout_cli::archive::{run_batch, run_list, BatchArgs, BatchKind, ListArgs};
use scout_cli::config::ScoutConfig;
use scout_cli::decode::{run_decode, DecodeArgs};
use scout_cli::encode::{run_encode, EncodeArgs};
use scout_cli::import::{run_import, ImportArgs};
use scout_cli::schema::{run_schema, SchemaArgs};
use scout_cli::EXIT_FAILURE;

/// Field scout interchange CLI.
///
/// Validates form schemas, encodes completed match records into SVG
/// carriers, decodes and classifies carriers and scanned payloads, and
/// manages the saved-matches archive.
#[derive(Parser, Debug)]
#[command(name = "scout", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding `saved-matches/`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Active schema document (JSON or YAML).
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a form schema or list its fields.
    Schema(SchemaArgs),

    /// Complete a record, embed it in a carrier, and save it.
    Encode(EncodeArgs),

    /// Extract and decode the payload of a carrier.
    Decode(DecodeArgs),

    /// Classify stored carriers against the active schema.
    List(ListArgs),

    /// Classify scanned payload strings against the active schema.
    Import(ImportArgs),

    /// Move carriers into the archive.
    Archive(BatchArgs),

    /// Move carriers out of the archive.
    Unarchive(BatchArgs),

    /// Delete carriers.
    Delete(BatchArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match ScoutConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_flags(cli.data_dir, cli.schema),
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    tracing::debug!(?config, "configuration resolved");

    let result = match &cli.command {
        Commands::Schema(args) => run_schema(args, &config),
        Commands::Encode(args) => run_encode(args, &config).await,
        Commands::Decode(args) => run_decode(args, &config).await,
        Commands::List(args) => run_list(args, &config).await,
        Commands::Import(args) => run_import(args, &config).await,
        Commands::Archive(args) => run_batch(BatchKind::Archive, args, &config).await,
        Commands::Unarchive(args) => run_batch(BatchKind::Unarchive, args, &config).await,
        Commands::Delete(args) => run_batch(BatchKind::Delete, args, &config).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_schema_check() {
        let cli = Cli::try_parse_from(["scout", "schema", "check", "form.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema(_)));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "scout", "list", "--archived", "-vv", "--data-dir", "/tmp/x", "--schema", "f.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert_eq!(cli.schema, Some(PathBuf::from("f.json")));
        if let Commands::List(args) = cli.command {
            assert!(args.archived);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn parse_encode() {
        let cli = Cli::try_parse_from([
            "scout", "encode", "--record", "r.json", "--carrier", "qr.svg", "--timestamp", "1700000000",
        ])
        .unwrap();
        if let Commands::Encode(args) = cli.command {
            assert_eq!(args.timestamp, Some(1_700_000_000));
            assert_eq!(args.carrier, Some(PathBuf::from("qr.svg")));
        } else {
            panic!("expected encode");
        }
    }

    #[test]
    fn parse_import_from_file() {
        let cli = Cli::try_parse_from(["scout", "import", "--from-file", "scans.txt"]).unwrap();
        assert!(matches!(cli.command, Commands::Import(_)));
    }

    #[test]
    fn import_requires_input() {
        assert!(Cli::try_parse_from(["scout", "import"]).is_err());
    }

    #[test]
    fn batch_requires_names() {
        assert!(Cli::try_parse_from(["scout", "delete"]).is_err());
        let cli = Cli::try_parse_from(["scout", "delete", "a", "b"]).unwrap();
        if let Commands::Delete(args) = cli.command {
            assert_eq!(args.names, vec!["a", "b"]);
        } else {
            panic!("expected delete");
        }
    }
}
