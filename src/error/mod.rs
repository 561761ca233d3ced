// Error types for gemrelay
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use thiserror::Error;

/// Fixed message returned when no API key is configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Server configuration error (API key not found)";

#[derive(Error, Debug)]
pub enum RelayError {
    /// Body was not JSON, or a prompt was missing or empty.
    #[error("Invalid request data: {0}")]
    InvalidInput(String),

    /// Body exceeded the configured limit before it could be read.
    #[error("Invalid request data: body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    /// The request never produced an HTTP response (DNS, connect, TLS, reset).
    #[error("Upstream transport error: {0}")]
    UpstreamTransport(String),

    /// Gemini answered with a non-success status. `body` is kept for logs only.
    #[error("Gemini API error: {status_text}")]
    UpstreamApi {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Gemini answered 2xx but no usable text could be extracted.
    #[error("Invalid AI response: {0}")]
    InvalidUpstreamResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Status code returned to the caller for this failure.
    ///
    /// Only input errors are client errors; everything else is the server's
    /// problem and maps to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short, caller-safe description placed in the `error` field.
    ///
    /// Upstream failures are prefixed so the caller can tell they happened
    /// while talking to the AI; raw upstream bodies never appear here.
    pub fn client_message(&self) -> String {
        match self {
            RelayError::UpstreamTransport(_)
            | RelayError::UpstreamApi { .. }
            | RelayError::InvalidUpstreamResponse(_) => {
                format!("Failed to reach the AI: {}", self)
            }
            _ => self.to_string(),
        }
    }

    /// Stable label used for metrics and structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InvalidInput(_) => "invalid_input",
            RelayError::PayloadTooLarge(_) => "payload_too_large",
            RelayError::MissingCredential => "missing_credential",
            RelayError::UpstreamTransport(_) => "upstream_transport",
            RelayError::UpstreamApi { .. } => "upstream_api",
            RelayError::InvalidUpstreamResponse(_) => "invalid_upstream_response",
            RelayError::Config(_) | RelayError::ConfigParsing(_) => "configuration",
            RelayError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_input_is_client_error() {
        assert_eq!(
            RelayError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::MissingCredential.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::UpstreamTransport("reset".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_api_message_hides_body() {
        let err = RelayError::UpstreamApi {
            status: 403,
            status_text: "Forbidden".into(),
            body: r#"{"error":{"message":"API key not valid"}}"#.into(),
        };
        let msg = err.client_message();
        assert_eq!(msg, "Failed to reach the AI: Gemini API error: Forbidden");
        assert!(!msg.contains("API key not valid"));
    }
}
