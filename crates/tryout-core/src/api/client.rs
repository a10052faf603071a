//! HTTP client for the registration endpoint.
//!
//! One request per submission: no retries, and no timeout unless the config
//! sets one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::RegistrationPayload;

use super::{Ack, RegistrationError, Registrar};

/// API client for the registration backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    register_url: String,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            register_url: config.register_url(),
        })
    }

    pub fn register_url(&self) -> &str {
        &self.register_url
    }

    /// Parse an acknowledgement body. Anything that isn't JSON is kept as a string.
    fn parse_ack_body(text: String) -> Value {
        if text.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    }
}

#[async_trait]
impl Registrar for ApiClient {
    async fn register(&self, payload: &RegistrationPayload) -> Result<Ack, RegistrationError> {
        debug!(url = %self.register_url, "Sending registration request");

        let response = self
            .client
            .post(&self.register_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Registration request got no response");
                RegistrationError::from(e)
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status.is_success() {
            info!(status = status.as_u16(), "Registration accepted");
            debug!(body = %RegistrationError::truncate_body(&text), "Registration response body");
            Ok(Ack::new(status.as_u16(), Self::parse_ack_body(text)))
        } else {
            warn!(
                status = status.as_u16(),
                body = %RegistrationError::truncate_body(&text),
                "Registration rejected"
            );
            Err(RegistrationError::from_status(status, &text))
        }
    }
}
