//! Errors raised by the validation engine and form sessions.

use thiserror::Error;

use scout_core::{FieldId, FieldType};

use crate::session::SessionEpoch;

/// Errors from validation-state and session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The field is already registered with the validation state.
    #[error("field {0} is already open")]
    FieldAlreadyOpen(FieldId),

    /// The field is not registered with the validation state.
    #[error("field {0} is not open")]
    FieldNotOpen(FieldId),

    /// An edit was issued against an earlier session epoch.
    #[error("stale edit for epoch {given}, session is at epoch {current}")]
    StaleEpoch {
        /// Epoch carried by the edit.
        given: SessionEpoch,
        /// The session's current epoch.
        current: SessionEpoch,
    },

    /// Completion was requested while required fields are unanswered.
    #[error("required fields missing: {}", join_ids(.fields))]
    RequiredFieldsMissing {
        /// Invalid field ids in ascending order.
        fields: Vec<FieldId>,
    },

    /// The requested lifecycle transition is not valid from the current phase.
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition {
        /// Current phase.
        from: String,
        /// Attempted phase.
        to: String,
    },

    /// A value's type does not match the field's kind.
    #[error("field {field} expects a {expected} value")]
    TypeMismatch {
        /// The field being set.
        field: FieldId,
        /// The field's kind.
        expected: FieldType,
    },

    /// A counter operation targeted a field of another kind.
    #[error("field {0} is not a counter")]
    NotACounter(FieldId),
}

fn join_ids(ids: &[FieldId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
