//! # scout-state — Validation Engine & Form Sessions
//!
//! - [`ValidationState`] tracks per-field value, validity, and touched state
//!   for one form, plus the set of invalid required fields and the
//!   `submitted` flag that reveals errors on untouched fields.
//! - [`FormSession`] owns a validation state and the match record being
//!   filled in, bound to a schema fingerprint and an epoch. Edits carrying a
//!   stale epoch (issued before a reset or schema switch) are discarded.
//!
//! ## Crate Policy
//!
//! - A session has a single owner; nothing here is shared or locked.
//! - Open/close pairing is enforced with non-clonable [`FieldTicket`]s.

pub mod error;
pub mod session;
pub mod validation;

pub use error::SessionError;
pub use session::{FormSession, SessionEpoch, SessionPhase};
pub use validation::{FieldState, FieldTicket, ValidationState};
