//! # Form Session
//!
//! One scouting pass over a form: a [`ValidationState`] plus the
//! [`MatchRecord`] being filled in, bound to the schema fingerprint in force
//! when the session was opened.
//!
//! ## States
//!
//! ```text
//! Scouting ──complete()──▶ Completed
//!    ▲                         │
//!    └────────reset()──────────┘
//! ```
//!
//! Every reset and schema switch advances the session [`SessionEpoch`].
//! Edits carry the epoch they were issued under; an edit from an earlier
//! epoch is discarded, so input queued before a reset can never leak into
//! the next record.

use serde::{Deserialize, Serialize};

use scout_core::{FieldId, FieldKind, FieldValue, MatchRecord, Schema};
use scout_crypto::SchemaFingerprint;

use crate::error::SessionError;
use crate::validation::{FieldTicket, ValidationState};

// ─── Epoch ───────────────────────────────────────────────────────────

/// Monotonic generation counter of a form session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionEpoch(u64);

impl SessionEpoch {
    /// The epoch a new session starts at.
    pub const INITIAL: SessionEpoch = SessionEpoch(1);

    /// The numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for SessionEpoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Phase ───────────────────────────────────────────────────────────

/// Lifecycle phase of a form session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Fields are editable.
    Scouting,
    /// The record has been frozen; only `reset` is accepted.
    Completed,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scouting => f.write_str("SCOUTING"),
            Self::Completed => f.write_str("COMPLETED"),
        }
    }
}

// ─── Session ─────────────────────────────────────────────────────────

/// A single-owner form session.
#[derive(Debug)]
pub struct FormSession {
    schema: Schema,
    fingerprint: SchemaFingerprint,
    epoch: SessionEpoch,
    phase: SessionPhase,
    validation: ValidationState,
    record: MatchRecord,
    tickets: Vec<FieldTicket>,
}

impl FormSession {
    /// Open a session over `schema`, restoring values from `restored`.
    ///
    /// Every field is opened in traversal order and its starting value is
    /// written into the record.
    pub fn open(
        schema: Schema,
        fingerprint: SchemaFingerprint,
        restored: Option<MatchRecord>,
    ) -> Self {
        let mut session = Self {
            schema,
            fingerprint,
            epoch: SessionEpoch::INITIAL,
            phase: SessionPhase::Scouting,
            validation: ValidationState::new(),
            record: MatchRecord::new(),
            tickets: Vec::new(),
        };
        session.open_fields(restored.as_ref());
        tracing::debug!(
            schema = %session.schema.name,
            fingerprint = session.fingerprint.short(),
            fields = session.tickets.len(),
            "form session opened"
        );
        session
    }

    fn open_fields(&mut self, restored: Option<&MatchRecord>) {
        for field in self.schema.fields() {
            let value = restored.and_then(|r| r.get(field.id)).cloned();
            match self.validation.open(field, value) {
                Ok(ticket) => {
                    if let Some(state) = self.validation.field(field.id) {
                        self.record.set(field.id, state.value().clone());
                    }
                    self.tickets.push(ticket);
                }
                // Unreachable for a validated schema: ids are unique.
                Err(e) => tracing::warn!(field = %field.id, error = %e, "field not opened"),
            }
        }
    }

    fn close_fields(&mut self) {
        for ticket in std::mem::take(&mut self.tickets) {
            self.validation.close(ticket);
        }
    }

    /// The current epoch. Edits must carry it.
    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The bound schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The bound schema fingerprint.
    pub fn fingerprint(&self) -> &SchemaFingerprint {
        &self.fingerprint
    }

    /// The record as currently filled in.
    pub fn record(&self) -> &MatchRecord {
        &self.record
    }

    /// The validation state.
    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    /// Whether an error should be displayed for a field.
    pub fn shows_error(&self, id: FieldId) -> bool {
        self.validation.shows_error(id)
    }

    fn check_epoch(&self, given: SessionEpoch) -> Result<(), SessionError> {
        if given != self.epoch {
            tracing::debug!(given = %given, current = %self.epoch, "stale edit discarded");
            return Err(SessionError::StaleEpoch {
                given,
                current: self.epoch,
            });
        }
        Ok(())
    }

    fn require_scouting(&self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Scouting {
            return Err(SessionError::InvalidTransition {
                from: self.phase.to_string(),
                to: SessionPhase::Scouting.to_string(),
            });
        }
        Ok(())
    }

    /// Set a field value.
    ///
    /// Returns whether the new value is valid.
    ///
    /// # Errors
    ///
    /// `StaleEpoch` if `epoch` is not current, `InvalidTransition` after
    /// completion, `FieldNotOpen` for an id outside the schema,
    /// `TypeMismatch` for a value of the wrong type.
    pub fn edit(
        &mut self,
        epoch: SessionEpoch,
        id: FieldId,
        value: impl Into<FieldValue>,
    ) -> Result<bool, SessionError> {
        self.check_epoch(epoch)?;
        self.require_scouting()?;
        let value = value.into();
        let valid = self.validation.update(id, value.clone())?;
        self.record.set(id, value);
        Ok(valid)
    }

    /// Step a counter up or down by one, clamped to its bounds.
    ///
    /// # Errors
    ///
    /// As [`edit`](Self::edit), plus `NotACounter` for other field kinds.
    pub fn counter_step(
        &mut self,
        epoch: SessionEpoch,
        id: FieldId,
        up: bool,
    ) -> Result<i64, SessionError> {
        self.check_epoch(epoch)?;
        let props = match self.schema.field(id).map(|f| &f.kind) {
            Some(FieldKind::Counter(props)) => props.clone(),
            Some(_) => return Err(SessionError::NotACounter(id)),
            None => return Err(SessionError::FieldNotOpen(id)),
        };
        let current = self
            .record
            .get(id)
            .and_then(FieldValue::as_int)
            .unwrap_or(props.default);
        let next = if up {
            props.increment(current)
        } else {
            props.decrement(current)
        };
        self.edit(epoch, id, next)?;
        Ok(next)
    }

    /// Submit the form.
    ///
    /// Marks the form submitted. If every required field is answered the
    /// session moves to `Completed` and a frozen copy of the record is
    /// returned; otherwise it stays `Scouting`.
    ///
    /// # Errors
    ///
    /// `RequiredFieldsMissing` listing invalid fields, or
    /// `InvalidTransition` if already completed.
    pub fn complete(&mut self) -> Result<MatchRecord, SessionError> {
        if self.phase == SessionPhase::Completed {
            return Err(SessionError::InvalidTransition {
                from: self.phase.to_string(),
                to: SessionPhase::Completed.to_string(),
            });
        }
        self.validation.submit();
        if !self.validation.is_valid() {
            let fields: Vec<FieldId> = self.validation.errors().collect();
            tracing::debug!(missing = fields.len(), "completion blocked");
            return Err(SessionError::RequiredFieldsMissing { fields });
        }
        self.phase = SessionPhase::Completed;
        tracing::info!(epoch = %self.epoch, fields = self.record.len(), "record completed");
        Ok(self.record.clone())
    }

    /// Start a fresh record.
    ///
    /// Closes every open field, clears the record and the submitted flag,
    /// advances the epoch, and reopens every field at its initial value.
    pub fn reset(&mut self) {
        self.close_fields();
        self.record.clear();
        self.validation = ValidationState::new();
        self.epoch = self.epoch.next();
        let from = self.phase;
        self.phase = SessionPhase::Scouting;
        self.open_fields(None);
        tracing::info!(from = %from, epoch = %self.epoch, "form session reset");
    }

    /// Rebind the session to another schema, discarding the current record.
    ///
    /// Advances the epoch like [`reset`](Self::reset).
    pub fn switch_schema(&mut self, schema: Schema, fingerprint: SchemaFingerprint) {
        self.schema = schema;
        self.fingerprint = fingerprint;
        self.reset();
    }

    /// End the session without completing it.
    pub fn abandon(mut self) {
        self.close_fields();
        tracing::debug!(epoch = %self.epoch, "form session abandoned");
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        self.close_fields();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::{CheckboxProps, CounterProps, DropdownProps, Field, Section, TextProps};

    fn schema() -> Schema {
        Schema::new(
            "Regional",
            vec![
                Section {
                    title: "Info".into(),
                    fields: vec![Field::new(
                        1,
                        "Team Number",
                        true,
                        FieldKind::Text(TextProps::default()),
                    )],
                },
                Section {
                    title: "Auto".into(),
                    fields: vec![
                        Field::new(2, "Leave", true, FieldKind::Checkbox(CheckboxProps::default())),
                        Field::new(
                            3,
                            "Pieces",
                            true,
                            FieldKind::Counter(CounterProps {
                                default: 0,
                                min: Some(0),
                                max: Some(2),
                            }),
                        ),
                        Field::new(
                            4,
                            "Start",
                            false,
                            FieldKind::Dropdown(DropdownProps {
                                options: vec!["Left".into(), "Right".into()],
                                default: None,
                                label: None,
                            }),
                        ),
                    ],
                },
            ],
        )
    }

    fn fp() -> SchemaFingerprint {
        scout_crypto::fingerprint(&schema()).unwrap()
    }

    #[test]
    fn open_writes_initial_values() {
        let session = FormSession::open(schema(), fp(), None);
        assert_eq!(session.record().get(FieldId(1)), Some(&FieldValue::Text(String::new())));
        assert_eq!(session.record().get(FieldId(2)), Some(&FieldValue::Bool(false)));
        assert_eq!(session.record().get(FieldId(3)), Some(&FieldValue::Int(0)));
        assert_eq!(session.validation().open_count(), 4);
        assert_eq!(session.phase(), SessionPhase::Scouting);
    }

    #[test]
    fn complete_blocked_then_succeeds() {
        let mut session = FormSession::open(schema(), fp(), None);
        let epoch = session.epoch();

        match session.complete() {
            Err(SessionError::RequiredFieldsMissing { fields }) => {
                assert_eq!(fields, vec![FieldId(1), FieldId(2), FieldId(3)]);
            }
            other => panic!("expected RequiredFieldsMissing, got {other:?}"),
        }
        assert!(session.shows_error(FieldId(2)));
        assert_eq!(session.phase(), SessionPhase::Scouting);

        session.edit(epoch, FieldId(1), "254").unwrap();
        session.edit(epoch, FieldId(2), true).unwrap();
        session.counter_step(epoch, FieldId(3), true).unwrap();

        let record = session.complete().unwrap();
        assert_eq!(record.get(FieldId(3)), Some(&FieldValue::Int(1)));
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn mistyped_restored_values_do_not_complete() {
        let restored: MatchRecord = [
            (FieldId(1), FieldValue::from("254")),
            (FieldId(2), FieldValue::Int(0)),
            (FieldId(3), FieldValue::from("0")),
        ]
        .into_iter()
        .collect();
        let mut session = FormSession::open(schema(), fp(), Some(restored));
        assert_eq!(session.record().get(FieldId(2)), Some(&FieldValue::Bool(false)));
        assert_eq!(session.record().get(FieldId(3)), Some(&FieldValue::Int(0)));
        match session.complete() {
            Err(SessionError::RequiredFieldsMissing { fields }) => {
                assert_eq!(fields, vec![FieldId(2), FieldId(3)]);
            }
            other => panic!("expected RequiredFieldsMissing, got {other:?}"),
        }

        let epoch = session.epoch();
        assert!(matches!(
            session.edit(epoch, FieldId(2), 1_i64),
            Err(SessionError::TypeMismatch { .. })
        ));
        assert_eq!(session.record().get(FieldId(2)), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn edits_after_completion_rejected() {
        let restored: MatchRecord = [
            (FieldId(1), FieldValue::from("118")),
            (FieldId(2), FieldValue::Bool(true)),
            (FieldId(3), FieldValue::Int(2)),
        ]
        .into_iter()
        .collect();
        let mut session = FormSession::open(schema(), fp(), Some(restored));
        let epoch = session.epoch();
        session.complete().unwrap();
        assert!(matches!(
            session.edit(epoch, FieldId(1), "9"),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            session.complete(),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn stale_epoch_edit_discarded() {
        let mut session = FormSession::open(schema(), fp(), None);
        let old = session.epoch();
        session.edit(old, FieldId(1), "254").unwrap();
        session.reset();

        assert_eq!(
            session.edit(old, FieldId(1), "999"),
            Err(SessionError::StaleEpoch {
                given: old,
                current: session.epoch(),
            })
        );
        assert_eq!(session.record().get(FieldId(1)), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn reset_clears_submitted_and_restores_defaults() {
        let mut session = FormSession::open(schema(), fp(), None);
        let _ = session.complete();
        assert!(session.validation().is_submitted());

        session.reset();
        assert!(!session.validation().is_submitted());
        assert!(!session.shows_error(FieldId(2)));
        assert_eq!(session.validation().open_count(), 4);
        assert!(session.epoch() > SessionEpoch::INITIAL);
    }

    #[test]
    fn counter_step_clamps() {
        let mut session = FormSession::open(schema(), fp(), None);
        let epoch = session.epoch();
        assert_eq!(session.counter_step(epoch, FieldId(3), false).unwrap(), 0);
        assert_eq!(session.counter_step(epoch, FieldId(3), true).unwrap(), 1);
        assert_eq!(session.counter_step(epoch, FieldId(3), true).unwrap(), 2);
        assert_eq!(session.counter_step(epoch, FieldId(3), true).unwrap(), 2);
        assert_eq!(
            session.counter_step(epoch, FieldId(2), true),
            Err(SessionError::NotACounter(FieldId(2)))
        );
    }

    #[test]
    fn switch_schema_bumps_epoch() {
        let mut session = FormSession::open(schema(), fp(), None);
        let old = session.epoch();
        let mut other = schema();
        other.sections.truncate(1);
        let other_fp = scout_crypto::fingerprint(&other).unwrap();
        session.switch_schema(other, other_fp.clone());

        assert_eq!(session.fingerprint(), &other_fp);
        assert_eq!(session.validation().open_count(), 1);
        assert!(session.edit(old, FieldId(1), "1").is_err());
    }

    #[test]
    fn unknown_field_edit_rejected() {
        let mut session = FormSession::open(schema(), fp(), None);
        let epoch = session.epoch();
        assert_eq!(
            session.edit(epoch, FieldId(42), true),
            Err(SessionError::FieldNotOpen(FieldId(42)))
        );
    }

    #[test]
    fn epoch_serializes_as_number() {
        assert_eq!(serde_json::to_string(&SessionEpoch::INITIAL).unwrap(), "1");
    }
}
