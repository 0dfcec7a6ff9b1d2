//! # Field Validation Engine
//!
//! Holds the live state of every open field in one form: its current value,
//! whether that value satisfies the field's required rule, and whether the
//! user has touched it. The set of invalid fields is kept alongside so that
//! form-level validity is a constant-time check.
//!
//! ## Invariants
//!
//! - A field id is in the error set iff it is open and its current value is
//!   invalid under [`Field::is_invalid`].
//! - Every `open` is paired with exactly one `close`. The [`FieldTicket`]
//!   returned by `open` is not `Clone`, and `close` consumes it.
//! - An error is shown for a field iff it is invalid and either touched or
//!   the form has been submitted.

use std::collections::{BTreeMap, BTreeSet};

use scout_core::{Field, FieldId, FieldValue};

use crate::error::SessionError;

/// Proof that a field is open. Pass it back to [`ValidationState::close`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an open field must be closed with its ticket"]
pub struct FieldTicket {
    id: FieldId,
}

impl FieldTicket {
    /// The field this ticket was issued for.
    pub fn field_id(&self) -> FieldId {
        self.id
    }
}

/// Live state of one open field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    field: Field,
    value: FieldValue,
    valid: bool,
    touched: bool,
}

impl FieldState {
    /// The field definition.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The current value.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Whether the current value satisfies the required rule.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the value has been changed since the field was opened.
    pub fn is_touched(&self) -> bool {
        self.touched
    }
}

/// Validation state for one form.
#[derive(Debug, Default)]
pub struct ValidationState {
    fields: BTreeMap<FieldId, FieldState>,
    errors: BTreeSet<FieldId>,
    submitted: bool,
}

impl ValidationState {
    /// An empty state with nothing open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a field.
    ///
    /// The starting value is `restored` when given and of the field's type,
    /// otherwise the kind's initial value. The field is untouched, and
    /// enters the error set if the starting value is invalid.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::FieldAlreadyOpen` if the field is open.
    pub fn open(
        &mut self,
        field: &Field,
        restored: Option<FieldValue>,
    ) -> Result<FieldTicket, SessionError> {
        if self.fields.contains_key(&field.id) {
            return Err(SessionError::FieldAlreadyOpen(field.id));
        }
        let value = match restored {
            Some(value) if field.kind.accepts(&value) => value,
            Some(value) => {
                tracing::warn!(
                    field = %field.id,
                    expected = %field.field_type(),
                    %value,
                    "restored value has the wrong type, using initial value"
                );
                field.kind.initial_value()
            }
            None => field.kind.initial_value(),
        };
        let valid = !field.is_invalid(&value);
        if !valid {
            self.errors.insert(field.id);
        }
        self.fields.insert(
            field.id,
            FieldState {
                field: field.clone(),
                value,
                valid,
                touched: false,
            },
        );
        Ok(FieldTicket { id: field.id })
    }

    /// Store a new value for an open field, marking it touched.
    ///
    /// Returns whether the new value is valid.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::FieldNotOpen` if the field is not open, and
    /// `SessionError::TypeMismatch` if the value's type does not match the
    /// field's kind. A rejected value leaves the state unchanged.
    pub fn update(&mut self, id: FieldId, value: FieldValue) -> Result<bool, SessionError> {
        let state = self
            .fields
            .get_mut(&id)
            .ok_or(SessionError::FieldNotOpen(id))?;
        if !state.field.kind.accepts(&value) {
            return Err(SessionError::TypeMismatch {
                field: id,
                expected: state.field.field_type(),
            });
        }
        state.valid = !state.field.is_invalid(&value);
        state.value = value;
        state.touched = true;
        if state.valid {
            self.errors.remove(&id);
        } else {
            self.errors.insert(id);
        }
        Ok(state.valid)
    }

    /// Close a field, dropping its state and any error entry.
    pub fn close(&mut self, ticket: FieldTicket) -> Option<FieldState> {
        self.errors.remove(&ticket.id);
        self.fields.remove(&ticket.id)
    }

    /// Whether no open field is invalid.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Mark the form submitted, revealing errors on untouched fields.
    pub fn submit(&mut self) {
        self.submitted = true;
    }

    /// Whether the form has been submitted.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Whether an error should be displayed for a field.
    pub fn shows_error(&self, id: FieldId) -> bool {
        self.fields
            .get(&id)
            .is_some_and(|s| !s.valid && (s.touched || self.submitted))
    }

    /// Invalid field ids in ascending order.
    pub fn errors(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.errors.iter().copied()
    }

    /// The state of an open field.
    pub fn field(&self, id: FieldId) -> Option<&FieldState> {
        self.fields.get(&id)
    }

    /// Number of open fields.
    pub fn open_count(&self) -> usize {
        self.fields.len()
    }
}
