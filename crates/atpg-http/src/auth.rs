//! Creating and destroying the stored credential.

use tracing::{debug, info, instrument};

use atpg_core::error::AuthError;
use atpg_core::{ApiPath, ApiRequest, Credential, Result};

use crate::client::ApiClient;
use crate::endpoints::{LOGIN, LoginRequest, TokenResponse};
use crate::transport::{api_error, transport_error};

impl ApiClient {
    /// Log in with email and password and store the returned credential.
    ///
    /// The login request is sent without a bearer token and never triggers
    /// a refresh.
    ///
    /// # Errors
    ///
    /// Returns the API error for a non-success response, or
    /// `Authentication failed` if the response carries no token.
    #[instrument(skip(self, password), fields(base = %self.config().base_url))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential> {
        info!("Logging in");

        let request =
            ApiRequest::post(ApiPath::new(LOGIN)?).with_json(&LoginRequest { email, password })?;
        let response = self.send(&request, None).await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: TokenResponse = response.json().await.map_err(transport_error)?;
        let token = body.token().ok_or(AuthError::AuthenticationFailed)?;
        let credential = Credential::new(token, body.refresh_token.clone());

        self.store().save(&credential)?;
        debug!("Login succeeded, credential stored");
        Ok(credential)
    }

    /// Store a credential handed over by the OAuth callback.
    pub fn accept_callback(&self, token: &str, refresh_token: Option<&str>) -> Result<()> {
        let credential = Credential::new(token, refresh_token.map(str::to_string));
        self.store().save(&credential)?;
        debug!("OAuth callback credential stored");
        Ok(())
    }

    /// Forget the stored credential.
    pub fn logout(&self) -> Result<()> {
        info!("Logging out");
        self.store().clear()
    }

    /// Whether a bearer token is currently stored.
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store().token()?.is_some())
    }
}
