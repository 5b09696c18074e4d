//! Conversions from reqwest failures and responses into core errors.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::trace;

use atpg_core::Error;
use atpg_core::error::{ApiError, TransportError};

/// Classify a reqwest failure by cause.
///
/// The URL is left out of the message so the `401` status heuristic only
/// sees the failure text.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let err = err.without_url();
    let message = error_chain(&err);

    let error = if err.is_timeout() {
        TransportError::Timeout { duration_ms: 0 }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else if err.is_decode() {
        TransportError::Decode { message }
    } else {
        TransportError::Http { message }
    };

    Error::Transport(error)
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Parse a success body as JSON. `204 No Content` yields `null`.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, Error> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }
    response.json::<Value>().await.map_err(transport_error)
}

/// Build an [`ApiError`] from a non-success response.
///
/// Bodies that are empty or not JSON are treated as `{}`.
pub(crate) async fn api_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .unwrap_or_else(|| Value::Object(Default::default()));
    trace!(status, "API error response");

    Error::Api(ApiError::from_body(status, &body))
}
