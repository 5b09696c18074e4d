//! Request path type.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A request path relative to the API base URL.
///
/// Paths start with `/` and never encode a scheme or host; the client
/// always prefixes the configured base URL. A query string is allowed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiPath(String);

impl ApiPath {
    /// Create a new path, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();

        let reason = if !s.starts_with('/') {
            Some("must start with '/'")
        } else if s.starts_with("//") || s.contains("://") {
            Some("must be relative to the API base URL")
        } else if s.contains('#') {
            Some("must not carry a fragment")
        } else if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            Some("must not contain whitespace")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidInputError::Path {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()),
            None => Ok(Self(s.to_string())),
        }
    }

    /// Returns the path as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ApiPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_relative_paths() {
        assert!(ApiPath::new("/api/jobs").is_ok());
        assert!(ApiPath::new("/api/jobs?page=2&q=intern").is_ok());
    }

    #[test]
    fn rejects_paths_without_leading_slash() {
        assert!(ApiPath::new("api/jobs").is_err());
        assert!(ApiPath::new("").is_err());
    }

    #[test]
    fn rejects_absolute_urls() {
        assert!(ApiPath::new("https://evil.example/api").is_err());
        assert!(ApiPath::new("//evil.example/api").is_err());
        assert!(ApiPath::new("/redirect?to=https://evil.example").is_err());
    }

    #[test]
    fn rejects_whitespace() {
        assert!(ApiPath::new("/api/a b").is_err());
    }
}
