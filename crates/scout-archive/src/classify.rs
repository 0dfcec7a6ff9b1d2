//! # Payload Classifier
//!
//! Sorts incoming codes into those that can be read against the active
//! schema and those that cannot. A code is compatible only when its payload
//! is present, decodes cleanly, and carries the active schema fingerprint.
//! Every other outcome is an [`IncompatibleReason`], never an error.
//!
//! Both buckets are ordered by [`CodeOrigin`], so the result is the same
//! whatever order concurrent reads complete in.

use std::fmt;

use serde::Serialize;
use tokio::task::JoinSet;

use scout_codec::{extract, PayloadEnvelope, RecordCodec};
use scout_crypto::SchemaFingerprint;

use crate::error::ArchiveError;
use crate::name::CarrierName;
use crate::store::{CarrierStore, StoredCarrier};

/// Where a code came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CodeOrigin {
    /// A carrier file in the store.
    Stored { file_name: String, archived: bool },
    /// A raw payload string, by position in the scan list.
    Scanned { index: usize },
}

impl CodeOrigin {
    /// Stable key used for selection.
    pub fn key(&self) -> String {
        match self {
            Self::Stored { file_name, .. } => file_name.clone(),
            Self::Scanned { index } => format!("scan:{index}"),
        }
    }

    /// Display identifiers parsed from the file name, for stored carriers.
    pub fn carrier_name(&self) -> Option<CarrierName> {
        match self {
            Self::Stored { file_name, .. } => Some(CarrierName::parse(file_name)),
            Self::Scanned { .. } => None,
        }
    }
}

impl fmt::Display for CodeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored {
                file_name,
                archived: true,
            } => write!(f, "{file_name} (archived)"),
            Self::Stored { file_name, .. } => f.write_str(file_name),
            Self::Scanned { index } => write!(f, "scan #{}", index + 1),
        }
    }
}

/// Why a code cannot be read against the active schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IncompatibleReason {
    /// The carrier holds no payload.
    MissingPayload,
    /// The payload does not decode.
    Corrupt { detail: String },
    /// The payload was produced under another schema.
    SchemaMismatch { found: SchemaFingerprint },
}

impl fmt::Display for IncompatibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPayload => f.write_str("no payload"),
            Self::Corrupt { detail } => write!(f, "corrupt payload: {detail}"),
            Self::SchemaMismatch { found } => write!(f, "schema mismatch ({})", found.short()),
        }
    }
}

/// A code readable against the active schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibleCode {
    pub origin: CodeOrigin,
    pub envelope: PayloadEnvelope,
}

/// A code that cannot be read against the active schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompatibleCode {
    pub origin: CodeOrigin,
    pub reason: IncompatibleReason,
}

/// Codes partitioned by compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub compatible: Vec<CompatibleCode>,
    pub incompatible: Vec<IncompatibleCode>,
}

impl Classification {
    /// Total number of classified codes.
    pub fn len(&self) -> usize {
        self.compatible.len() + self.incompatible.len()
    }

    /// Whether nothing was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, origin: CodeOrigin, outcome: Result<PayloadEnvelope, IncompatibleReason>) {
        match outcome {
            Ok(envelope) => self.compatible.push(CompatibleCode { origin, envelope }),
            Err(reason) => {
                tracing::debug!(code = %origin, reason = %reason, "code incompatible");
                self.incompatible.push(IncompatibleCode { origin, reason });
            }
        }
    }

    fn sort(&mut self) {
        self.compatible.sort_by(|a, b| a.origin.cmp(&b.origin));
        self.incompatible.sort_by(|a, b| a.origin.cmp(&b.origin));
    }
}

/// Classify one payload string against the active fingerprint.
pub fn classify_payload(
    payload: &str,
    active: &SchemaFingerprint,
) -> Result<PayloadEnvelope, IncompatibleReason> {
    let envelope = RecordCodec::new()
        .deserialize(payload)
        .map_err(|e| IncompatibleReason::Corrupt {
            detail: e.to_string(),
        })?;
    if envelope.schema != *active {
        return Err(IncompatibleReason::SchemaMismatch {
            found: envelope.schema,
        });
    }
    Ok(envelope)
}

/// Classify one carrier document against the active fingerprint.
pub fn classify_carrier(
    body: &str,
    active: &SchemaFingerprint,
) -> Result<PayloadEnvelope, IncompatibleReason> {
    let payload = extract(body).ok_or(IncompatibleReason::MissingPayload)?;
    classify_payload(&payload, active)
}

/// Classify raw scanned payload strings, keyed by scan order.
pub fn classify_payloads<S: AsRef<str>>(
    payloads: &[S],
    active: &SchemaFingerprint,
) -> Classification {
    let mut classification = Classification::default();
    for (index, payload) in payloads.iter().enumerate() {
        classification.push(
            CodeOrigin::Scanned { index },
            classify_payload(payload.as_ref(), active),
        );
    }
    classification.sort();
    classification
}

/// Classify carriers already read from the store.
pub fn classify_carriers(carriers: &[StoredCarrier], active: &SchemaFingerprint) -> Classification {
    let mut classification = Classification::default();
    for carrier in carriers {
        classification.push(
            CodeOrigin::Stored {
                file_name: carrier.file_name.clone(),
                archived: carrier.archived,
            },
            classify_carrier(&carrier.body, active),
        );
    }
    classification.sort();
    classification
}

/// Read and classify every carrier in the store.
///
/// Decoding fans out one task per carrier; the merged result is sorted.
pub async fn classify_store(
    store: &CarrierStore,
    active: &SchemaFingerprint,
    include_archived: bool,
) -> Result<Classification, ArchiveError> {
    let carriers = if include_archived {
        store.list().await?
    } else {
        store.list_in(false).await?
    };

    let mut tasks = JoinSet::new();
    for carrier in carriers {
        let active = active.clone();
        tasks.spawn(async move {
            let origin = CodeOrigin::Stored {
                file_name: carrier.file_name,
                archived: carrier.archived,
            };
            (origin, classify_carrier(&carrier.body, &active))
        });
    }

    let mut classification = Classification::default();
    while let Some(joined) = tasks.join_next().await {
        let (origin, outcome) = joined.map_err(|e| ArchiveError::Task(e.to_string()))?;
        classification.push(origin, outcome);
    }
    classification.sort();
    tracing::info!(
        compatible = classification.compatible.len(),
        incompatible = classification.incompatible.len(),
        "store classified"
    );
    Ok(classification)
}
