//! Fixed backend endpoints and their request/response types.

use serde::{Deserialize, Serialize};

/// Exchanges the current bearer token for a new one.
pub const REFRESH: &str = "/api/community/auth/refresh";

/// Password login.
pub const LOGIN: &str = "/api/community/auth/login";

/// Response from the refresh and login endpoints.
///
/// Both fields are optional on the wire; a response without `token` counts
/// as a failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// The token, if present and non-empty.
    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Request body for login.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_reads_camel_case() {
        let body: TokenResponse =
            serde_json::from_str(r#"{"token":"new","refreshToken":"r"}"#).unwrap();
        assert_eq!(body.token(), Some("new"));
        assert_eq!(body.refresh_token.as_deref(), Some("r"));
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let body: TokenResponse = serde_json::from_str(r#"{"token":""}"#).unwrap();
        assert!(body.token().is_none());

        let body: TokenResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(body.token().is_none());
    }
}
