//! Authenticated HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use atpg_core::error::{AuthError, InvalidInputError, TransportError};
use atpg_core::{
    Api, ApiPath, ApiRequest, ApiUrl, BearerToken, CredentialStore, Error, Method, Result,
};

use crate::config::ClientConfig;
use crate::protocol::Call;
use crate::transport::{api_error, read_json, transport_error};

/// HTTP client for the remote API.
///
/// Every call reads the bearer token from the credential store, attaches it,
/// and on a `401` refreshes the token once and retries the request once.
/// Cheap to clone; clones share the connection pool, cookie jar and store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    store: CredentialStore,
    refresh_lock: Option<Mutex<()>>,
}

impl ApiClient {
    /// Create a client for the configured base URL backed by `store`.
    ///
    /// Cookies returned by the API are kept and sent back alongside the
    /// bearer header.
    pub fn new(config: ClientConfig, store: CredentialStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()
            .map_err(transport_error)?;

        let refresh_lock = config.share_refresh.then(|| Mutex::new(()));

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                store,
                refresh_lock,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn store(&self) -> &CredentialStore {
        &self.inner.store
    }

    pub(crate) fn refresh_lock(&self) -> Option<&Mutex<()>> {
        self.inner.refresh_lock.as_ref()
    }

    /// Upload a multipart form.
    ///
    /// The bearer token is attached when present, but a `401` is returned
    /// as-is: uploads never refresh or retry. `Content-Type` is left to
    /// reqwest so it can set the multipart boundary.
    #[instrument(skip(self, form), fields(base = %self.inner.config.base_url))]
    pub async fn upload_file(&self, path: &str, form: Form) -> Result<Value> {
        let path = ApiPath::new(path)?;
        debug!(%path, "Uploading file");

        let upload = async {
            let token = self.store().token()?;
            let mut headers = HeaderMap::new();
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
            if let Some(token) = &token {
                headers.insert(AUTHORIZATION, bearer_header(token)?);
            }

            let response = self
                .inner
                .http
                .post(self.inner.config.base_url.endpoint(&path))
                .headers(headers)
                .multipart(form)
                .send()
                .await
                .map_err(transport_error)?;

            trace!(status = %response.status(), "Upload response");
            if response.status().is_success() {
                read_json(response).await
            } else {
                Err(api_error(response).await)
            }
        };

        self.with_deadline(upload).await.map_err(report)
    }

    /// Send one request with the JSON headers and an optional bearer token.
    ///
    /// Extra headers on the request override the defaults; the
    /// `Authorization` header always reflects `token`.
    pub(crate) async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&BearerToken>,
    ) -> Result<reqwest::Response> {
        let url = self.inner.config.base_url.endpoint(request.path());
        trace!(method = %request.method(), %url, authorized = token.is_some(), "Sending request");

        let mut headers = json_headers();
        for (name, value) in request.headers() {
            let name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid_header(name, e))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| invalid_header(name.as_str(), e))?;
            headers.insert(name, value);
        }
        match token {
            Some(token) => {
                headers.insert(AUTHORIZATION, bearer_header(token)?);
            }
            None => {
                headers.remove(AUTHORIZATION);
            }
        }

        let mut builder = self
            .inner
            .http
            .request(to_reqwest(request.method()), &url)
            .headers(headers);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        builder.send().await.map_err(transport_error)
    }

    /// Drive one logical call through the request / refresh / retry phases.
    async fn run(&self, request: &ApiRequest) -> Result<Value> {
        let mut call = Call::Initial;

        loop {
            let from = call.phase();
            call = self.advance(request, call).await;
            let to = call.phase();

            debug_assert!(
                from.successors().contains(&to),
                "illegal transition {:?} -> {:?}",
                from,
                to
            );
            trace!(?from, ?to, "Call transition");

            match call {
                Call::Success(value) => return Ok(value),
                Call::Failed(err) => return Err(err),
                _ => {}
            }
        }
    }

    /// Perform the single transition out of `call`.
    async fn advance(&self, request: &ApiRequest, call: Call) -> Call {
        match call {
            Call::Initial => {
                let credential = match self.store().token() {
                    Ok(token) => token,
                    Err(err) => return Call::Failed(err),
                };
                match self.send(request, credential.as_ref()).await {
                    Ok(response) => Call::Sent {
                        response,
                        credential,
                    },
                    Err(err) => Call::Failed(err),
                }
            }

            Call::Sent {
                response,
                credential,
            } => {
                let status = response.status();
                if status.is_success() {
                    read_json(response).await.into()
                } else if status == StatusCode::UNAUTHORIZED {
                    match credential {
                        Some(rejected) => Call::Unauthorized { rejected },
                        None => Call::Failed(api_error(response).await),
                    }
                } else {
                    Call::Failed(api_error(response).await)
                }
            }

            Call::Unauthorized { rejected } => {
                info!(path = %request.path(), "Bearer token rejected, refreshing");
                Call::Refreshing { rejected }
            }

            Call::Refreshing { rejected } => {
                if !self.refresh_after_rejection(&rejected).await {
                    return Call::RefreshFailed;
                }
                let token = match self.store().token() {
                    Ok(token) => token,
                    Err(err) => return Call::Failed(err),
                };
                match self.send(request, token.as_ref()).await {
                    Ok(response) => Call::RetrySent(response),
                    Err(err) => Call::Failed(err),
                }
            }

            Call::RetrySent(response) => {
                if response.status().is_success() {
                    read_json(response).await.into()
                } else {
                    Call::Failed(api_error(response).await)
                }
            }

            Call::RefreshFailed => {
                if let Err(err) = self.store().clear() {
                    warn!(error = %err, "Failed to clear stored credential");
                }
                Call::Failed(AuthError::AuthenticationFailed.into())
            }

            terminal @ (Call::Success(_) | Call::Failed(_)) => terminal,
        }
    }

    /// Bound `fut` by the configured deadline, if any.
    async fn with_deadline<F>(&self, fut: F) -> Result<Value>
    where
        F: std::future::Future<Output = Result<Value>>,
    {
        match self.inner.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout {
                    duration_ms: limit.as_millis() as u64,
                }
                .into()),
            },
            None => fut.await,
        }
    }
}

#[async_trait]
impl Api for ApiClient {
    fn base_url(&self) -> &ApiUrl {
        &self.inner.config.base_url
    }

    fn credentials(&self) -> &CredentialStore {
        &self.inner.store
    }

    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    async fn request(&self, request: ApiRequest) -> Result<Value> {
        debug!("API request");
        self.with_deadline(self.run(&request))
            .await
            .map_err(report)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url)
            .field("share_refresh", &self.inner.config.share_refresh)
            .field("store", &self.inner.store)
            .finish()
    }
}

/// Log a failed call before handing it to the caller.
fn report(err: Error) -> Error {
    match &err {
        Error::Transport(_) | Error::Storage(_) => {
            warn!(status = err.status(), error = %err, "Request failed")
        }
        _ => debug!(status = err.status(), error = %err, "Request failed"),
    }
    err
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn bearer_header(token: &BearerToken) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&token.header_value()).map_err(|_| {
        TransportError::Http {
            message: "stored token is not a valid header value".to_string(),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}

fn invalid_header(name: &str, err: impl std::fmt::Display) -> Error {
    InvalidInputError::Other {
        message: format!("invalid header '{}': {}", name, err),
    }
    .into()
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Phase;
    use atpg_core::MemoryStore;

    fn client() -> ApiClient {
        let config = ClientConfig::new(ApiUrl::new("https://api.atpglobal.com").unwrap());
        ApiClient::new(config, CredentialStore::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn client_creation() {
        let client = client();
        assert_eq!(client.base_url().host(), Some("api.atpglobal.com"));
        assert!(client.refresh_lock().is_none());
    }

    #[test]
    fn shared_refresh_creates_lock() {
        let config = ClientConfig::new(ApiUrl::new("https://api.atpglobal.com").unwrap())
            .with_shared_refresh(true);
        let client = ApiClient::new(config, CredentialStore::new(MemoryStore::new())).unwrap();
        assert!(client.refresh_lock().is_some());
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let value = bearer_header(&BearerToken::new("abc")).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
    }

    #[test]
    fn bearer_header_rejects_newlines() {
        let err = bearer_header(&BearerToken::new("abc\ndef")).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn json_headers_present() {
        let headers = json_headers();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT], "application/json");
    }

    #[test]
    fn debug_hides_credentials() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn phases_match_calls() {
        assert_eq!(Call::Initial.phase(), Phase::Initial);
        assert_eq!(Call::RefreshFailed.phase(), Phase::RefreshFailed);
    }
}
