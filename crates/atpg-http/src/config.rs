//! Client configuration.

use std::time::Duration;

use atpg_core::error::InvalidInputError;
use atpg_core::{ApiUrl, Result};

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "ATPG_API_URL";

/// Environment variable holding the per-call deadline in seconds.
pub const TIMEOUT_ENV: &str = "ATPG_TIMEOUT";

/// Configuration for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub base_url: ApiUrl,
    /// Deadline for one logical call, covering the refresh and retry.
    pub timeout: Option<Duration>,
    /// Serialize refreshes and let concurrent callers reuse a fresh token.
    pub share_refresh: bool,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            timeout: None,
            share_refresh: false,
            user_agent: concat!("atpg/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Read the configuration from `ATPG_API_URL` and `ATPG_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_URL_ENV).map_err(|_| InvalidInputError::Other {
            message: format!("{} is not set", API_URL_ENV),
        })?;
        let timeout = std::env::var(TIMEOUT_ENV).ok();

        Self::from_parts(&base_url, timeout.as_deref())
    }

    fn from_parts(base_url: &str, timeout: Option<&str>) -> Result<Self> {
        let mut config = Self::new(ApiUrl::new(base_url)?);
        if let Some(secs) = timeout {
            let secs: u64 = secs.trim().parse().map_err(|_| InvalidInputError::Other {
                message: format!("{} must be a whole number of seconds", TIMEOUT_ENV),
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_shared_refresh(mut self, share: bool) -> Self {
        self.share_refresh = share;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
