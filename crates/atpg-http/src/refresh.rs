//! Bearer token refresh.

use tracing::{debug, info, instrument, warn};

use atpg_core::error::{AuthError, TransportError};
use atpg_core::{ApiPath, ApiRequest, BearerToken, Credential, Error, Result};

use crate::client::ApiClient;
use crate::endpoints::{REFRESH, TokenResponse};
use crate::transport::{api_error, transport_error};

impl ApiClient {
    /// Exchange the stored bearer token for a new one.
    ///
    /// Reads the current token, posts it to the refresh endpoint and
    /// persists the token in the response. A `refreshToken` in the response
    /// replaces the stored refresh token; otherwise the stored one is kept.
    ///
    /// Stored credentials are left untouched on failure.
    #[instrument(skip(self), fields(base = %self.config().base_url))]
    pub async fn refresh(&self) -> Result<()> {
        info!("Refreshing bearer token");

        let token = self.store().token()?.ok_or(AuthError::MissingToken)?;
        let request = ApiRequest::post(ApiPath::new(REFRESH)?);

        let response = self.send(&request, Some(&token)).await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: TokenResponse = response.json().await.map_err(transport_error)?;
        let new_token = body
            .token()
            .map(BearerToken::new)
            .ok_or(AuthError::AuthenticationFailed)?;

        match body.refresh_token {
            Some(refresh) => self
                .store()
                .save(&Credential::new(new_token.as_str(), Some(refresh)))?,
            None => self.store().set_token(&new_token)?,
        }

        debug!("Bearer token refreshed successfully");
        Ok(())
    }

    /// Refresh after `rejected` drew a `401`. Returns whether a usable token
    /// is now stored.
    ///
    /// With shared refresh enabled, refreshes are serialized and a caller
    /// that finds the stored token already replaced reuses it without a
    /// network round-trip. Without it, concurrent rejected calls each
    /// refresh on their own.
    pub(crate) async fn refresh_after_rejection(&self, rejected: &BearerToken) -> bool {
        let result = match self.refresh_lock() {
            Some(lock) => {
                let _guard = lock.lock().await;
                match self.store().token() {
                    Ok(Some(current)) if &current != rejected => {
                        debug!("Token already refreshed by a concurrent call");
                        Ok(())
                    }
                    _ => self.refresh().await,
                }
            }
            None => self.refresh().await,
        };

        match result {
            Ok(()) => true,
            Err(err) => {
                log_refresh_failure(&err);
                false
            }
        }
    }
}

fn log_refresh_failure(err: &Error) {
    match err {
        Error::Transport(TransportError::Connection { .. }) | Error::Storage(_) => {
            warn!(error = %err, "Token refresh failed")
        }
        _ => debug!(status = err.status(), error = %err, "Token refresh rejected"),
    }
}
