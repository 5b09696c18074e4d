//! Error types for the atpg client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, input validation and storage errors.
//! Every variant can be flattened into the `(status, message)` pair callers
//! render with [`Error::status`] and [`Error::message`].

use std::fmt;
use thiserror::Error;

/// Message surfaced when a credential could not be refreshed.
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// The unified error type for atpg operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, undecodable body).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors that could not be recovered by a refresh.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from the remote API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors (base URL, request path, body).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// The numeric status callers attach to this error.
    ///
    /// API errors keep the HTTP status of the response. Authentication
    /// failures map to 401. Transport failures map to 500 unless their text
    /// mentions `401`, in which case they map to 401.
    pub fn status(&self) -> u16 {
        match self {
            Error::Api(err) => err.status,
            Error::Auth(_) => 401,
            Error::InvalidInput(_) => 400,
            Error::Storage(_) => 500,
            Error::Transport(err) => {
                if err.to_string().contains("401") {
                    401
                } else {
                    500
                }
            }
        }
    }

    /// The human-readable message, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Api(err) => err.message.clone(),
            Error::Auth(err) => err.to_string(),
            Error::Transport(err) => err.to_string(),
            Error::InvalidInput(err) => err.to_string(),
            Error::Storage(err) => err.to_string(),
        }
    }

    /// Check if this error means the stored credential is no longer usable.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_)) || self.status() == 401
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Response body could not be decoded as JSON.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential was rejected and could not be refreshed.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// An operation needed a stored token and none was present.
    #[error("no stored token")]
    MissingToken,
}

/// A non-success response from the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Error code from the body's `error` field, if it carried one.
    pub code: Option<String>,
    /// Best-effort human-readable message.
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: message.into(),
        }
    }

    /// Build an error from a status and a (possibly empty) error body.
    ///
    /// The message is taken from the `error` field, then the `message`
    /// field, and falls back to `HTTP error! status: <code>`.
    pub fn from_body(status: u16, body: &serde_json::Value) -> Self {
        let error = body.get("error").and_then(|v| v.as_str());
        let message = body.get("message").and_then(|v| v.as_str());

        let text = error
            .or(message)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));

        Self {
            status,
            code: error.map(str::to_string),
            message: text,
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid request path.
    #[error("invalid path '{value}': {reason}")]
    Path { value: String, reason: String },

    /// Request body could not be serialized.
    #[error("invalid body: {message}")]
    Body { message: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Stored data could not be parsed.
    #[error("corrupt store: {message}")]
    Corrupt { message: String },

    /// A lock guarding the store was poisoned.
    #[error("store lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_prefers_error_field() {
        let err = ApiError::from_body(422, &json!({"error": "invalid a", "message": "other"}));
        assert_eq!(err.message, "invalid a");
        assert_eq!(err.code.as_deref(), Some("invalid a"));
    }

    #[test]
    fn api_error_falls_back_to_message_field() {
        let err = ApiError::from_body(404, &json!({"message": "not found"}));
        assert_eq!(err.message, "not found");
        assert!(err.code.is_none());
    }

    #[test]
    fn api_error_generic_message() {
        let err = ApiError::from_body(503, &json!({}));
        assert_eq!(err.message, "HTTP error! status: 503");
    }

    #[test]
    fn api_error_ignores_non_string_fields() {
        let err = ApiError::from_body(400, &json!({"error": {"nested": true}}));
        assert_eq!(err.message, "HTTP error! status: 400");
    }

    #[test]
    fn status_of_api_error_is_preserved() {
        let err = Error::from(ApiError::new(418, "teapot"));
        assert_eq!(err.status(), 418);
        assert_eq!(err.message(), "teapot");
    }

    #[test]
    fn authentication_failed_maps_to_401() {
        let err = Error::from(AuthError::AuthenticationFailed);
        assert_eq!(err.status(), 401);
        assert_eq!(err.message(), AUTHENTICATION_FAILED);
        assert!(err.is_auth_error());
    }

    #[test]
    fn transport_status_uses_401_text_heuristic() {
        let err = Error::from(TransportError::Http {
            message: "upstream said 401".to_string(),
        });
        assert_eq!(err.status(), 401);

        let err = Error::from(TransportError::Connection {
            message: "connection refused".to_string(),
        });
        assert_eq!(err.status(), 500);
    }
}
