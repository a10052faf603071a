//! Data models for the registration form.
//!
//! - `RegistrationRecord`: mutable form state while editing
//! - `RegistrationPayload`: the JSON snapshot sent to the backend
//! - `Field`, `FieldKind`: typed names for every form field
//! - `GradeLevel`, `Gender`, `US_STATES`: choice lists

pub mod options;
pub mod registration;

pub use options::{cycle_option, parse_state, Gender, GradeLevel, US_STATES};
pub use registration::{Field, FieldKind, RegistrationPayload, RegistrationRecord};
