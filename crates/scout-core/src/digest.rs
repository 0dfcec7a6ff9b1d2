//! # Content Digest
//!
//! `ContentDigest` is the algorithm-tagged output of the hash primitive.
//! The primitive itself lives in `scout-crypto`; this crate only owns the
//! value type so every crate can carry digests without pulling in a hasher.

use serde::{Deserialize, Serialize};

use crate::error::ScoutError;

/// The hash algorithm that produced a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-character hex string into a SHA-256 digest.
    ///
    /// # Errors
    ///
    /// Returns `ScoutError::Serialization` if the string is not exactly 64
    /// hex characters.
    pub fn from_hex(hex: &str) -> Result<Self, ScoutError> {
        let hex = hex.trim();
        if hex.len() != 64 {
            return Err(ScoutError::Serialization(format!(
                "digest must be 64 hex chars, got {}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = hex.get(i * 2..i * 2 + 2).ok_or_else(|| {
                ScoutError::Serialization(format!("non-ASCII digest text: {hex:?}"))
            })?;
            *byte = u8::from_str_radix(pair, 16).map_err(|e| {
                ScoutError::Serialization(format!("invalid hex at position {}: {e}", i * 2))
            })?;
        }
        Ok(Self::new(DigestAlgorithm::Sha256, bytes))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}
