//! REST client for the tryout registration backend.
//!
//! The backend exposes a single endpoint, `POST {base}/auth/register`, which
//! takes the JSON registration payload. `Registrar` is the seam the wizard
//! talks to; `ApiClient` is its HTTP implementation.

pub mod client;
pub mod error;
pub mod registrar;

pub use client::ApiClient;
pub use error::RegistrationError;
pub use registrar::{Ack, Registrar};
