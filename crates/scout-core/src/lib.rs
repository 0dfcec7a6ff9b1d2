//! # scout-core — Foundational Types for the Scout Interchange Core
//!
//! This crate is the leaf of the workspace DAG. It defines the data model
//! every other crate speaks: the form schema, the closed set of field kinds,
//! the match record, and the canonicalization pipeline that schema
//! fingerprints are computed over.
//!
//! ## Key Design Principles
//!
//! 1. **Closed field-kind variant.** `FieldKind` is one enum with a typed
//!    configuration payload per kind. Default values and the validity rule
//!    are exhaustive `match`es, so adding a kind forces every consumer to
//!    handle it.
//!
//! 2. **`CanonicalBytes` newtype.** All hash input flows through
//!    `CanonicalBytes::new()`. There is no other way to produce bytes a
//!    fingerprint can be computed over.
//!
//! 3. **Integer-keyed records.** `MatchRecord` is keyed by `FieldId` in memory
//!    and by the stringified id on the wire. Non-integer keys are rejected at
//!    decode time.
//!
//! 4. **Positional addressing computed once.** `FieldLayout` fixes the
//!    absolute index of every field in flattened section+field order so all
//!    consumers agree on field identity.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `scout-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod field;
pub mod identity;
pub mod layout;
pub mod record;
pub mod schema;
pub mod temporal;
pub mod timer;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, ScoutError};
pub use field::{
    CheckboxProps, CounterProps, DropdownProps, Field, FieldKind, FieldType, FieldValue,
    GridProps, TextProps, TimerProps,
};
pub use identity::{FieldId, SchemaId};
pub use layout::{FieldLayout, LayoutEntry, AXIS_SEPARATOR};
pub use record::MatchRecord;
pub use schema::{Schema, Section};
pub use temporal::Timestamp;
