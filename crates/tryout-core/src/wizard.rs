//! The three-step registration wizard.
//!
//! `RegistrationWizard` owns the record while it is being edited, keeps the
//! derived validity of the pattern-checked fields up to date on every write,
//! gates movement between steps, and drives a single submission through a
//! `Registrar`.
//!
//! Steps are strictly linear: Player -> Parent -> Address. There is no step
//! before the first or after the last, and moving never wraps.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{Ack, RegistrationError, Registrar};
use crate::models::{parse_state, Field, FieldKind, Gender, GradeLevel, RegistrationPayload, RegistrationRecord};
use crate::validation::{is_non_empty, is_valid_email, is_valid_phone, is_valid_zip};

// ============================================================================
// Steps
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Player = 1,
    Parent = 2,
    Address = 3,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Player, Step::Parent, Step::Address];

    /// 1-based position of the step.
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Player => "Player",
            Step::Parent => "Parent",
            Step::Address => "Address",
        }
    }

    /// The following step, or the same step if this is the last one.
    pub fn next(&self) -> Self {
        match self {
            Step::Player => Step::Parent,
            Step::Parent => Step::Address,
            Step::Address => Step::Address,
        }
    }

    /// The preceding step, or the same step if this is the first one.
    pub fn prev(&self) -> Self {
        match self {
            Step::Player => Step::Player,
            Step::Parent => Step::Player,
            Step::Address => Step::Parent,
        }
    }

    pub fn is_last(&self) -> bool {
        matches!(self, Step::Address)
    }
}

// ============================================================================
// Derived Validity
// ============================================================================

/// Cached results of the pattern checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldValidity {
    pub email: bool,
    pub phone: bool,
    pub zip: bool,
    pub emergency_phone: bool,
}

impl FieldValidity {
    pub fn derive(record: &RegistrationRecord) -> Self {
        Self {
            email: is_valid_email(&record.email),
            phone: is_valid_phone(&record.phone),
            zip: is_valid_zip(&record.zip),
            emergency_phone: is_valid_phone(&record.emergency_contact_number),
        }
    }

    /// Recompute only the flag that depends on `field`.
    fn refresh(&mut self, field: Field, record: &RegistrationRecord) {
        match field {
            Field::Email => self.email = is_valid_email(&record.email),
            Field::Phone => self.phone = is_valid_phone(&record.phone),
            Field::Zip => self.zip = is_valid_zip(&record.zip),
            Field::EmergencyContactNumber => {
                self.emergency_phone = is_valid_phone(&record.emergency_contact_number)
            }
            _ => {}
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Problems caught locally, before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please complete all required fields before submitting.")]
    Incomplete { field: Field },

    #[error("\"{value}\" is not a valid option for {field}")]
    UnknownOption { field: Field, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A submission is already in progress")]
    InFlight,

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// What the confirmation view shows after an accepted registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub player_name: String,
    pub email: String,
    pub received_at: DateTime<Utc>,
}

impl Confirmation {
    /// Details of the payload that was sent, stamped with the time the
    /// backend acknowledged it.
    fn from_payload(payload: &RegistrationPayload, ack: &Ack) -> Self {
        Self {
            player_name: payload.player_full_name(),
            email: payload.email.clone(),
            received_at: ack.received_at,
        }
    }
}

// ============================================================================
// Wizard
// ============================================================================

#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    step: Step,
    record: RegistrationRecord,
    validity: FieldValidity,
    /// The payload of the request in flight, if any
    in_flight: Option<RegistrationPayload>,
    error: Option<String>,
    success: bool,
    error_focus_requested: bool,
    confirmation: Option<Confirmation>,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    /// A fresh wizard on step 1 with an empty record.
    pub fn new() -> Self {
        let record = RegistrationRecord::default();
        let validity = FieldValidity::derive(&record);
        Self {
            step: Step::Player,
            record,
            validity,
            in_flight: None,
            error: None,
            success: false,
            error_focus_requested: false,
            confirmation: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    pub fn validity(&self) -> FieldValidity {
        self.validity
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Set a field from its textual value. Choice fields accept their display
    /// label (case-insensitive) or an empty string to unset; anything else is
    /// rejected and the record is left unchanged.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), ValidationError> {
        let unknown = || ValidationError::UnknownOption {
            field,
            value: value.to_string(),
        };

        match field {
            Field::GradeLevel => {
                let grade = if is_non_empty(value) {
                    Some(value.parse::<GradeLevel>().map_err(|_| unknown())?)
                } else {
                    None
                };
                self.set_grade_level(grade);
            }
            Field::Gender => {
                let gender = if is_non_empty(value) {
                    Some(value.parse::<Gender>().map_err(|_| unknown())?)
                } else {
                    None
                };
                self.set_gender(gender);
            }
            Field::State => {
                let state = if is_non_empty(value) {
                    parse_state(value).ok_or_else(unknown)?
                } else {
                    ""
                };
                self.record.state = state.to_string();
            }
            _ => {
                if let Some(slot) = self.record.text_mut(field) {
                    *slot = value.to_string();
                }
                self.validity.refresh(field, &self.record);
            }
        }
        Ok(())
    }

    pub fn set_grade_level(&mut self, grade: Option<GradeLevel>) {
        self.record.grade_level = grade;
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.record.gender = gender;
    }

    // =========================================================================
    // Gating
    // =========================================================================

    /// Whether a single field currently satisfies its constraint.
    pub fn field_complete(&self, field: Field) -> bool {
        match field.kind() {
            FieldKind::Text | FieldKind::Choice => is_non_empty(self.record.value(field)),
            FieldKind::Email => self.validity.email,
            FieldKind::Zip => self.validity.zip,
            FieldKind::Phone => match field {
                Field::EmergencyContactNumber => self.validity.emergency_phone,
                _ => self.validity.phone,
            },
        }
    }

    /// The gating predicate of a step: every field on it is complete.
    ///
    /// - Player: first name, last name, grade and gender present
    /// - Parent: parent name present, email and phone valid
    /// - Address: street, town and state present, zip valid, emergency
    ///   contact name present and emergency phone valid
    pub fn step_ready(&self, step: Step) -> bool {
        Field::for_step(step).iter().all(|f| self.field_complete(*f))
    }

    /// Whether the Next control should be enabled.
    pub fn can_advance(&self) -> bool {
        !self.step.is_last() && self.step_ready(self.step)
    }

    /// Whether the Submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.in_flight.is_none() && self.is_complete()
    }

    /// All three gating predicates hold at once.
    pub fn is_complete(&self) -> bool {
        Step::ALL.iter().all(|s| self.step_ready(*s))
    }

    /// First field on `step` that blocks its gating predicate.
    pub fn first_incomplete_field(&self, step: Step) -> Option<Field> {
        Field::for_step(step)
            .iter()
            .copied()
            .find(|f| !self.field_complete(*f))
    }

    /// Inline hint for a pattern-checked field holding something invalid.
    /// Empty fields get no hint; the step simply isn't ready yet.
    pub fn field_error(&self, field: Field) -> Option<&'static str> {
        if !is_non_empty(self.record.value(field)) || self.field_complete(field) {
            return None;
        }
        match field.kind() {
            FieldKind::Email => Some("Enter a valid email address"),
            FieldKind::Phone => Some("Use the format (555) 555-5555"),
            FieldKind::Zip => Some("Zip code must be 5 digits"),
            FieldKind::Text | FieldKind::Choice => None,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move forward one step if the current step is ready. Returns whether
    /// the step changed.
    pub fn advance(&mut self) -> bool {
        if !self.step_ready(self.step) {
            debug!(step = self.step.number(), "Advance refused, step incomplete");
            return false;
        }
        let next = self.step.next();
        let moved = next != self.step;
        self.step = next;
        moved
    }

    /// Move back one step and clear any error. Returns whether the step changed.
    pub fn retreat(&mut self) -> bool {
        let prev = self.step.prev();
        let moved = prev != self.step;
        self.step = prev;
        self.error = None;
        moved
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Validate the whole record and freeze it into a payload, marking the
    /// submission in flight. The caller must hand the outcome of the request
    /// to `finish_submit`.
    pub fn begin_submit(&mut self) -> Result<RegistrationPayload, SubmitError> {
        if self.in_flight.is_some() {
            return Err(SubmitError::InFlight);
        }

        let missing = Step::ALL
            .iter()
            .find_map(|s| self.first_incomplete_field(*s));
        if let Some(field) = missing {
            return Err(self.fail_validation(ValidationError::Incomplete { field }));
        }

        let payload = match RegistrationPayload::from_record(&self.record) {
            Ok(payload) => payload,
            Err(field) => {
                return Err(self.fail_validation(ValidationError::Incomplete { field }));
            }
        };

        info!(step = self.step.number(), "Submitting registration");
        self.in_flight = Some(payload.clone());
        self.error = None;
        Ok(payload)
    }

    /// Apply the outcome of a registration request started by `begin_submit`.
    pub fn finish_submit(&mut self, result: Result<Ack, RegistrationError>) -> Result<Ack, SubmitError> {
        let sent = self.in_flight.take();

        match result {
            Ok(ack) => {
                info!(status = ack.status, "Registration complete");
                self.confirmation = sent.map(|payload| Confirmation::from_payload(&payload, &ack));
                self.record = RegistrationRecord::default();
                self.validity = FieldValidity::derive(&self.record);
                self.success = true;
                self.error = None;
                Ok(ack)
            }
            Err(e) => {
                warn!(error = %e, status = ?e.status(), "Registration failed");
                self.error = Some(e.to_string());
                self.error_focus_requested = true;
                Err(SubmitError::Registration(e))
            }
        }
    }

    /// Validate, send one registration request, and apply its outcome.
    pub async fn submit<R>(&mut self, registrar: &R) -> Result<Ack, SubmitError>
    where
        R: Registrar + ?Sized,
    {
        let payload = self.begin_submit()?;
        let result = registrar.register(&payload).await;
        self.finish_submit(result)
    }

    /// Consume the pending request to move focus to the error region.
    pub fn take_error_focus(&mut self) -> bool {
        std::mem::take(&mut self.error_focus_requested)
    }

    /// Start over with an empty record, e.g. to register another player.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn fail_validation(&mut self, err: ValidationError) -> SubmitError {
        debug!(error = %err, "Submission blocked by validation");
        self.error = Some(err.to_string());
        self.error_focus_requested = true;
        SubmitError::Validation(err)
    }
}

// ============================================================================
// Tests
// ============================================================================
