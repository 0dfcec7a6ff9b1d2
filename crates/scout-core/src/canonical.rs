//! # Canonical Serialization — JCS-Compatible Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes that a
//! schema fingerprint is computed over.
//!
//! ## Invariant
//!
//! The inner field is private. The only way to construct `CanonicalBytes`
//! is through `CanonicalBytes::new()`, which rejects floats and then
//! serializes with `serde_jcs` (RFC 8785): sorted object keys, compact
//! separators, deterministic byte sequence.
//!
//! Arrays keep their order under JCS. Section order and field order inside a
//! schema therefore remain significant to the digest, which is what keeps
//! fingerprints of previously generated codes stable.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with float rejection.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - All numbers are integers.
/// - Object keys are sorted; arrays keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// non-integer number. Returns `CanonicalizationError::SerializationFailed`
    /// if JCS serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}
