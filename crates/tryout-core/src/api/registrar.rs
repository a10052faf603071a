use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::RegistrationPayload;

use super::RegistrationError;

/// Acknowledgement of an accepted registration. The body is opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct Ack {
    pub status: u16,
    pub body: Value,
    pub received_at: DateTime<Utc>,
}

impl Ack {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            received_at: Utc::now(),
        }
    }
}

/// The registration backend, as seen by the wizard.
#[async_trait]
pub trait Registrar: Send + Sync {
    async fn register(&self, payload: &RegistrationPayload) -> Result<Ack, RegistrationError>;
}
