//! Encode a record, list it, archive it, and list again through the
//! command handlers.

use std::path::PathBuf;

use scout_cli::archive::{run_batch, run_list, BatchArgs, BatchKind, ListArgs};
use scout_cli::config::ScoutConfig;
use scout_cli::decode::{run_decode, DecodeArgs};
use scout_cli::encode::{run_encode, EncodeArgs};
use scout_cli::{open_store, EXIT_FAILURE, EXIT_OK};

const FORM_YAML: &str = r#"
name: Qualifiers
sections:
  - title: Info
    fields:
      - id: 1
        name: Team Number
        type: text
        required: true
      - id: 2
        name: Match Number
        type: text
        required: true
  - title: Teleop
    fields:
      - id: 3
        name: Cycles
        type: counter
        required: true
        props:
          default: 0
          min: 0
"#;

fn config(dir: &tempfile::TempDir) -> ScoutConfig {
    ScoutConfig {
        data_dir: dir.path().to_path_buf(),
        schema: Some(PathBuf::from("form.yaml")),
        io_timeout_ms: 5000,
    }
}

#[tokio::test]
async fn encode_list_archive_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("form.yaml"), FORM_YAML).unwrap();
    std::fs::write(
        dir.path().join("record.json"),
        r#"{"1": "254", "2": "12", "3": 5}"#,
    )
    .unwrap();
    let config = config(&dir);

    let encode = EncodeArgs {
        record: PathBuf::from("record.json"),
        carrier: None,
        timestamp: Some(1_700_000_000),
        stdout: false,
    };
    assert_eq!(run_encode(&encode, &config).await.unwrap(), EXIT_OK);

    let list = ListArgs {
        archived: false,
        json: true,
    };
    assert_eq!(run_list(&list, &config).await.unwrap(), EXIT_OK);

    let decode = DecodeArgs {
        carrier: PathBuf::from("254-12-1700000000"),
    };
    assert_eq!(run_decode(&decode, &config).await.unwrap(), EXIT_OK);

    let batch = BatchArgs {
        names: vec!["254-12-1700000000.svg".into()],
    };
    assert_eq!(
        run_batch(BatchKind::Archive, &batch, &config).await.unwrap(),
        EXIT_OK
    );
    let carriers = open_store(&config).list().await.unwrap();
    assert_eq!(carriers.len(), 1);
    assert!(carriers[0].archived);

    // Archived carriers are still found by name.
    assert_eq!(run_decode(&decode, &config).await.unwrap(), EXIT_OK);
}

#[tokio::test]
async fn foreign_carrier_lists_as_incompatible() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("form.yaml"), FORM_YAML).unwrap();
    let config = config(&dir);
    open_store(&config)
        .save("999-1-1.svg", scout_codec::BLANK_CARRIER)
        .await
        .unwrap();

    let list = ListArgs {
        archived: true,
        json: false,
    };
    assert_eq!(run_list(&list, &config).await.unwrap(), EXIT_FAILURE);
}
