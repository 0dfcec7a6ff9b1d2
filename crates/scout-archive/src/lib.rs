//! # scout-archive — Carrier Storage & Import Classification
//!
//! - [`CarrierName`]: the `team-match-timestamp.svg` naming scheme.
//! - [`CarrierStore`]: one SVG per record under `saved-matches`, with an
//!   `archive` subdirectory, bounded I/O, and partial-failure batches.
//! - [`classify_store`] / [`classify_payloads`]: partition stored carriers or
//!   scanned strings into compatible and incompatible codes against the
//!   active schema fingerprint.
//! - [`Selection`]: checked codes for a batch action, reset whenever the
//!   document set changes.
//!
//! ## Crate Policy
//!
//! - Malformed or foreign payloads are classified, never raised as errors.
//! - Storage errors are per operation; batches never abort on one failure.

pub mod classify;
pub mod error;
pub mod name;
pub mod selection;
pub mod store;

pub use classify::{
    classify_carrier, classify_carriers, classify_payload, classify_payloads, classify_store,
    Classification, CodeOrigin, CompatibleCode, IncompatibleCode, IncompatibleReason,
};
pub use error::ArchiveError;
pub use name::{CarrierName, CARRIER_EXTENSION, MATCH_FIELD, TEAM_FIELD, UNKNOWN};
pub use selection::Selection;
pub use store::{
    normalize_name, BatchFailure, BatchReport, CarrierStore, StoredCarrier, ARCHIVE_DIR,
    DEFAULT_IO_TIMEOUT, SAVED_DIR,
};
