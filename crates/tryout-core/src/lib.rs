//! Core library for the tryout signup form.
//!
//! This crate holds everything that is independent of how the form is drawn:
//!
//! - `models`: the registration record, its submission payload and option enums
//! - `validation`: pattern checks for email, phone and zip fields
//! - `wizard`: the three-step `RegistrationWizard` and its gating rules
//! - `api`: the HTTP client for the registration endpoint and its error taxonomy
//! - `config`: environment-driven configuration
//! - `utils`: input masking helpers

pub mod api;
pub mod config;
pub mod models;
pub mod utils;
pub mod validation;
pub mod wizard;

pub use api::{Ack, ApiClient, RegistrationError, Registrar};
pub use config::Config;
pub use models::{Field, FieldKind, Gender, GradeLevel, RegistrationPayload, RegistrationRecord};
pub use wizard::{Confirmation, RegistrationWizard, Step, SubmitError, ValidationError};
