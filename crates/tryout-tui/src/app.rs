//! Application state for the tryout signup TUI.
//!
//! `App` wraps the core `RegistrationWizard` with everything the terminal
//! needs on top: which control has focus, overlays, a status line, and the
//! channel that brings the background submission result back to the event
//! loop.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use tryout_core::api::{Ack, ApiClient, RegistrationError, Registrar};
use tryout_core::models::{cycle_option, Field, FieldKind, Gender, GradeLevel, US_STATES};
use tryout_core::utils::{mask_phone, mask_zip};
use tryout_core::{Config, RegistrationWizard, Step, SubmitError};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the submission result channel.
/// Only one submission is ever in flight, so a small buffer is plenty.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Maximum length for free-text input.
/// Long enough for hyphenated names and street addresses.
const MAX_TEXT_LENGTH: usize = 80;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Which control on the form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(Field),
    Back,
    Next,
    Submit,
    /// The error announcement region
    Error,
}

type SubmitResult = Result<Ack, RegistrationError>;

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub registrar: Arc<dyn Registrar>,
    pub wizard: RegistrationWizard,

    // UI State
    pub state: AppState,
    pub focus: FormFocus,
    pub status_message: Option<String>,

    // Background submission channel
    submit_rx: mpsc::Receiver<SubmitResult>,
    submit_tx: mpsc::Sender<SubmitResult>,
}

impl App {
    /// Create a new application talking to the configured backend
    pub fn new(config: &Config) -> Result<Self> {
        debug!(url = %config.register_url(), "Registration endpoint configured");
        let api = ApiClient::new(config)?;
        Ok(Self::with_registrar(Arc::new(api)))
    }

    pub fn with_registrar(registrar: Arc<dyn Registrar>) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            registrar,
            wizard: RegistrationWizard::new(),
            state: AppState::Normal,
            focus: FormFocus::Field(Field::PlayerFirstName),
            status_message: None,
            submit_rx: rx,
            submit_tx: tx,
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Focusable controls on the current step, in tab order.
    pub fn focus_order(&self) -> Vec<FormFocus> {
        let step = self.wizard.step();
        let mut order: Vec<FormFocus> = Field::for_step(step)
            .iter()
            .map(|f| FormFocus::Field(*f))
            .collect();
        if step != Step::Player {
            order.push(FormFocus::Back);
        }
        order.push(if step.is_last() {
            FormFocus::Submit
        } else {
            FormFocus::Next
        });
        order
    }

    /// Move focus forward or backward, wrapping around
    pub fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let len = order.len();
        let next = match order.iter().position(|f| *f == self.focus) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.focus = order[next];
    }

    /// Focus the first field of the current step
    pub fn focus_first_field(&mut self) {
        let step = self.wizard.step();
        self.focus = FormFocus::Field(Field::for_step(step)[0]);
    }

    /// Leave the error region: go to whatever blocks the current step,
    /// or the step's primary button when nothing does.
    pub fn leave_error_focus(&mut self) {
        let step = self.wizard.step();
        self.focus = match self.wizard.first_incomplete_field(step) {
            Some(field) => FormFocus::Field(field),
            None if step.is_last() => FormFocus::Submit,
            None => FormFocus::Next,
        };
    }

    /// Honor a pending request from the wizard to focus the error region
    fn sync_error_focus(&mut self) {
        if self.wizard.take_error_focus() {
            self.focus = FormFocus::Error;
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Type a character into the focused field
    pub fn input_char(&mut self, c: char) {
        let FormFocus::Field(field) = self.focus else {
            return;
        };
        let current = self.wizard.record().value(field).to_string();

        let updated = match field.kind() {
            FieldKind::Text if can_add_char(current.chars().count(), MAX_TEXT_LENGTH, c) => {
                format!("{}{}", current, c)
            }
            FieldKind::Email if can_add_char(current.chars().count(), MAX_EMAIL_LENGTH, c) => {
                format!("{}{}", current, c)
            }
            FieldKind::Phone if c.is_ascii_digit() => mask_phone(&format!("{}{}", current, c)),
            FieldKind::Zip if c.is_ascii_digit() => mask_zip(&format!("{}{}", current, c)),
            FieldKind::Choice => {
                // Space steps through the options like a select box
                if c == ' ' {
                    self.cycle_choice(field, true);
                }
                return;
            }
            _ => return,
        };
        self.write_field(field, &updated);
    }

    /// Delete the last character (or digit, for masked fields) of the focused field
    pub fn backspace(&mut self) {
        let FormFocus::Field(field) = self.focus else {
            return;
        };
        let mut current = self.wizard.record().value(field).to_string();

        let updated = match field.kind() {
            FieldKind::Phone => {
                let mut digits: String = current.chars().filter(|c| c.is_ascii_digit()).collect();
                digits.pop();
                mask_phone(&digits)
            }
            FieldKind::Choice => String::new(),
            _ => {
                current.pop();
                current
            }
        };
        self.write_field(field, &updated);
    }

    /// Step a choice field through its options
    pub fn cycle_choice(&mut self, field: Field, forward: bool) {
        let record = self.wizard.record();
        match field {
            Field::GradeLevel => {
                let next = cycle_option(&GradeLevel::ALL, record.grade_level, forward);
                self.wizard.set_grade_level(next);
            }
            Field::Gender => {
                let next = cycle_option(&Gender::ALL, record.gender, forward);
                self.wizard.set_gender(next);
            }
            Field::State => {
                let current = US_STATES.iter().copied().find(|s| *s == record.state);
                if let Some(next) = cycle_option(&US_STATES, current, forward) {
                    self.write_field(field, next);
                }
            }
            _ => {}
        }
    }

    fn write_field(&mut self, field: Field, value: &str) {
        if let Err(e) = self.wizard.set_field(field, value) {
            warn!(error = %e, "Rejected field input");
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Activate the Next button
    pub fn next_step(&mut self) {
        if self.wizard.advance() {
            self.status_message = None;
            self.focus_first_field();
        } else {
            let step = self.wizard.step();
            self.status_message = Some("Complete the required fields to continue".to_string());
            if let Some(field) = self.wizard.first_incomplete_field(step) {
                self.focus = FormFocus::Field(field);
            }
        }
    }

    /// Activate the Back button
    pub fn previous_step(&mut self) {
        if self.wizard.retreat() {
            self.focus_first_field();
        }
        self.status_message = None;
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Validate and send the registration on a background task
    pub fn start_submit(&mut self) {
        match self.wizard.begin_submit() {
            Ok(payload) => {
                let registrar = Arc::clone(&self.registrar);
                let tx = self.submit_tx.clone();
                tokio::spawn(async move {
                    let result = registrar.register(&payload).await;
                    if tx.send(result).await.is_err() {
                        warn!("Submission finished after the app shut down");
                    }
                });
                self.status_message = Some("Submitting registration...".to_string());
            }
            Err(SubmitError::InFlight) => {
                debug!("Submit ignored, already in flight");
            }
            Err(e) => {
                debug!(error = %e, "Submit blocked");
                self.status_message = None;
                self.sync_error_focus();
            }
        }
    }

    /// Apply a finished submission, if one has arrived
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.submit_rx.try_recv() {
            self.apply_submit_result(result);
        }
    }

    fn apply_submit_result(&mut self, result: SubmitResult) {
        match self.wizard.finish_submit(result) {
            Ok(_) => {
                self.status_message = Some("Registration submitted".to_string());
            }
            Err(_) => {
                self.status_message = None;
                self.sync_error_focus();
            }
        }
    }

    /// Wait for the in-flight submission and apply it
    #[cfg(test)]
    pub async fn wait_for_submission(&mut self) {
        if let Some(result) = self.submit_rx.recv().await {
            self.apply_submit_result(result);
        }
    }

    /// Start a fresh registration from the confirmation view
    pub fn register_another(&mut self) {
        self.wizard.reset();
        self.status_message = None;
        self.focus_first_field();
    }
}

// ============================================================================
// Input validation helpers
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into a free-text field
pub fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod tests {
    use super::testing::FakeRegistrar;
    use super::*;

    fn app() -> App {
        App::with_registrar(Arc::new(FakeRegistrar::accepting()))
    }

    #[test]
    fn test_can_add_char() {
        assert!(can_add_char(0, 10, 'a'));
        assert!(can_add_char(9, 10, 'z'));
        assert!(!can_add_char(10, 10, 'a'));
        assert!(!can_add_char(0, 10, '\x00'));
        assert!(!can_add_char(0, 10, '\n'));
        assert!(!can_add_char(0, 10, '\t'));
    }

    #[test]
    fn test_focus_order_per_step() {
        let mut app = app();
        assert_eq!(
            app.focus_order(),
            vec![
                FormFocus::Field(Field::PlayerFirstName),
                FormFocus::Field(Field::PlayerLastName),
                FormFocus::Field(Field::GradeLevel),
                FormFocus::Field(Field::Gender),
                FormFocus::Next,
            ]
        );

        app.cycle_focus(false);
        assert_eq!(app.focus, FormFocus::Next);
        app.cycle_focus(true);
        assert_eq!(app.focus, FormFocus::Field(Field::PlayerFirstName));
    }

    #[test]
    fn test_phone_input_is_masked() {
        let mut app = app();
        app.focus = FormFocus::Field(Field::Phone);
        for c in "860x5551234".chars() {
            app.input_char(c);
        }
        assert_eq!(app.wizard.record().phone, "(860) 555-1234");
        assert!(app.wizard.validity().phone);

        app.backspace();
        assert_eq!(app.wizard.record().phone, "(860) 555-123");
        assert!(!app.wizard.validity().phone);
    }

    #[test]
    fn test_zip_input_keeps_five_digits() {
        let mut app = app();
        app.focus = FormFocus::Field(Field::Zip);
        for c in "0610a39".chars() {
            app.input_char(c);
        }
        assert_eq!(app.wizard.record().zip, "06103");
    }

    #[test]
    fn test_cycle_choices() {
        let mut app = app();
        app.cycle_choice(Field::GradeLevel, true);
        assert_eq!(app.wizard.record().grade_level, Some(GradeLevel::Fourth));

        app.cycle_choice(Field::Gender, false);
        assert_eq!(app.wizard.record().gender, Some(Gender::PreferNotToSay));

        app.cycle_choice(Field::State, true);
        assert_eq!(app.wizard.record().state, "AL");
        app.cycle_choice(Field::State, false);
        assert_eq!(app.wizard.record().state, "WY");
    }

    #[test]
    fn test_next_step_refused_focuses_missing_field() {
        let mut app = app();
        app.focus = FormFocus::Next;
        app.next_step();
        assert_eq!(app.wizard.step(), Step::Player);
        assert_eq!(app.focus, FormFocus::Field(Field::PlayerFirstName));
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_submit_incomplete_focuses_error_region() {
        let mut app = app();
        app.focus = FormFocus::Submit;
        app.start_submit();
        assert_eq!(app.focus, FormFocus::Error);
        assert!(app.wizard.error().is_some());

        app.leave_error_focus();
        assert_eq!(app.focus, FormFocus::Field(Field::PlayerFirstName));
    }
}
