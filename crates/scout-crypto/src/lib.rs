//! # scout-crypto — Hash Primitive & Schema Fingerprints
//!
//! - **SHA-256** digest computation from `CanonicalBytes` (the only valid
//!   input type), behind the [`SchemaHasher`] trait so the primitive can be
//!   swapped without touching callers.
//! - **Schema fingerprints**: the hex digest of a schema's canonical content,
//!   used by receivers to decide whether an incoming payload was produced by
//!   a compatible schema.
//! - **Fingerprint cache** holding the active schema and its fingerprint,
//!   recomputed only when the schema's content changes.
//!
//! ## Crate Policy
//!
//! - Depends only on `scout-core` internally.
//! - Tests use real SHA-256, never a mock.

pub mod fingerprint;
pub mod sha256;

pub use fingerprint::{
    fingerprint, fingerprint_with, FingerprintCache, FingerprintError, SchemaFingerprint,
};
pub use sha256::{sha256_digest, sha256_hex, SchemaHasher, Sha256Hasher};
