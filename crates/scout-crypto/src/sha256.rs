//! # SHA-256 Digest Computation
//!
//! Computes SHA-256 digests exclusively from `CanonicalBytes`. The function
//! signature makes it a compile error to hash raw bytes, so every fingerprint
//! flows through canonicalization.

use scout_core::{CanonicalBytes, ContentDigest, DigestAlgorithm};
use sha2::{Digest, Sha256};

/// The hash primitive used for schema fingerprints.
///
/// Implementations must be deterministic and collision resistant: two
/// schemas that differ in any field id, type, required flag, or option must
/// hash differently with overwhelming probability.
pub trait SchemaHasher {
    /// Hash canonical bytes.
    fn hash(&self, data: &CanonicalBytes) -> ContentDigest;
}

/// SHA-256 backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl SchemaHasher for Sha256Hasher {
    fn hash(&self, data: &CanonicalBytes) -> ContentDigest {
        sha256_digest(data)
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute a SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}
