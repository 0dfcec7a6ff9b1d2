//! # Transport Payloads
//!
//! A payload is the compressed JSON envelope
//! `{"schema": "<fingerprint>", "data": {"<field id>": <value>, ...}}`.
//! The fingerprint travels with the data so a receiver can decide whether
//! the values line up with its own schema before trusting them.

use serde::{Deserialize, Serialize};

use scout_core::MatchRecord;
use scout_crypto::SchemaFingerprint;

use crate::compress::{Compressor, DeflateBase64};
use crate::error::CodecError;

/// A compressed, transport-safe payload string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportPayload(String);

impl TransportPayload {
    /// Wrap a payload string received from a carrier or scan.
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    /// The payload text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap the payload text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TransportPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The decoded content of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEnvelope {
    /// Fingerprint of the schema the record was filled against.
    pub schema: SchemaFingerprint,
    /// Field values keyed by field id.
    pub data: MatchRecord,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    schema: &'a SchemaFingerprint,
    data: &'a MatchRecord,
}

/// Serializes records to payloads and back.
#[derive(Debug, Clone, Default)]
pub struct RecordCodec<C = DeflateBase64> {
    compressor: C,
}

impl RecordCodec<DeflateBase64> {
    /// A codec using DEFLATE + base64.
    pub fn new() -> Self {
        Self {
            compressor: DeflateBase64,
        }
    }
}

impl<C: Compressor> RecordCodec<C> {
    /// A codec using the given compression primitive.
    pub fn with_compressor(compressor: C) -> Self {
        Self { compressor }
    }

    /// Encode a record with the fingerprint of its schema.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Encoding` if serialization or compression fails.
    pub fn serialize(
        &self,
        record: &MatchRecord,
        fingerprint: &SchemaFingerprint,
    ) -> Result<TransportPayload, CodecError> {
        let json = serde_json::to_string(&EnvelopeRef {
            schema: fingerprint,
            data: record,
        })
        .map_err(|e| CodecError::Encoding(e.to_string()))?;
        let payload = self.compressor.compress(&json)?;
        tracing::debug!(
            fields = record.len(),
            json_bytes = json.len(),
            payload_bytes = payload.len(),
            "record serialized"
        );
        Ok(TransportPayload(payload))
    }

    /// Decode a payload into its envelope.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::CorruptPayload` if the payload cannot be
    /// decompressed or is not a well-formed envelope.
    pub fn deserialize(&self, payload: &str) -> Result<PayloadEnvelope, CodecError> {
        let json = self.compressor.decompress(payload)?;
        serde_json::from_str(&json).map_err(|e| CodecError::CorruptPayload(format!("json: {e}")))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use scout_core::{FieldId, FieldValue};

    fn value() -> impl Strategy<Value = FieldValue> {
        prop_oneof![
            any::<bool>().prop_map(FieldValue::Bool),
            any::<i64>().prop_map(FieldValue::Int),
            ".{0,24}".prop_map(FieldValue::Text),
        ]
    }

    proptest! {
        #[test]
        fn serialize_then_deserialize_is_identity(
            entries in proptest::collection::btree_map(0u32..500, value(), 0..20)
        ) {
            let record: MatchRecord = entries
                .into_iter()
                .map(|(k, v)| (FieldId(k), v))
                .collect();
            let fp = SchemaFingerprint::parse(&"0f".repeat(32)).unwrap();
            let codec = RecordCodec::new();
            let payload = codec.serialize(&record, &fp).unwrap();
            let env = codec.deserialize(payload.as_str()).unwrap();
            prop_assert_eq!(env.schema, fp);
            prop_assert_eq!(env.data, record);
        }

        #[test]
        fn arbitrary_text_never_panics(text in ".{0,64}") {
            let _ = RecordCodec::new().deserialize(&text);
        }
    }
}
