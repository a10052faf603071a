use serde::Deserialize;
use thiserror::Error;

/// Shown when the server answers 409 without a message.
pub const DEFAULT_CONFLICT_MESSAGE: &str = "This player is already registered.";

/// Shown when the server answers 400 without a message.
pub const DEFAULT_BAD_REQUEST_MESSAGE: &str = "Invalid registration details.";

/// Shown for any other non-2xx status without a message.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Registration failed.";

/// Failure modes of a registration attempt. `Display` is the user-facing text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The request never got a response. The detail is for logs only.
    #[error("No Server Response")]
    NetworkUnavailable(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    UnknownServerError { status: u16, message: String },
}

/// Maximum length for error response bodies in log messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl RegistrationError {
    /// Truncate a response body to avoid logging excessive data
    pub fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Pull a non-empty `message` string out of a JSON error body.
    fn server_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }

    /// Classify a non-2xx response.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::server_message(body);
        match status.as_u16() {
            409 => RegistrationError::Conflict(
                message.unwrap_or_else(|| DEFAULT_CONFLICT_MESSAGE.to_string()),
            ),
            400 => RegistrationError::BadRequest(
                message.unwrap_or_else(|| DEFAULT_BAD_REQUEST_MESSAGE.to_string()),
            ),
            code => RegistrationError::UnknownServerError {
                status: code,
                message: message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            },
        }
    }

    /// HTTP status behind the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistrationError::NetworkUnavailable(_) => None,
            RegistrationError::Conflict(_) => Some(409),
            RegistrationError::BadRequest(_) => Some(400),
            RegistrationError::UnknownServerError { status, .. } => Some(*status),
        }
    }
}

impl From<reqwest::Error> for RegistrationError {
    fn from(err: reqwest::Error) -> Self {
        RegistrationError::NetworkUnavailable(err.to_string())
    }
}
