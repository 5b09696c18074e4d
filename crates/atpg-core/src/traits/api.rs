//! Authenticated API trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::request::ApiRequest;
use crate::store::CredentialStore;
use crate::types::{ApiPath, ApiUrl};
use crate::Result;

/// An authenticated JSON API.
///
/// Implementors provide [`Api::request`]; the verb helpers all funnel into
/// it with a fixed method and a JSON body.
#[async_trait]
pub trait Api: Send + Sync {
    /// Returns the base URL requests are sent to.
    fn base_url(&self) -> &ApiUrl;

    /// Returns the store the bearer credential is read from.
    fn credentials(&self) -> &CredentialStore;

    /// Execute one logical request and return the parsed JSON body.
    async fn request(&self, request: ApiRequest) -> Result<Value>;

    /// `GET path`.
    async fn get(&self, path: &str) -> Result<Value> {
        self.request(ApiRequest::get(ApiPath::new(path)?)).await
    }

    /// `POST path` with an optional JSON body.
    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value> {
        let request = ApiRequest::post(ApiPath::new(path)?);
        self.request(with_optional_body(request, body)).await
    }

    /// `PUT path` with an optional JSON body.
    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value> {
        let request = ApiRequest::put(ApiPath::new(path)?);
        self.request(with_optional_body(request, body)).await
    }

    /// `PATCH path` with an optional JSON body.
    async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value> {
        let request = ApiRequest::patch(ApiPath::new(path)?);
        self.request(with_optional_body(request, body)).await
    }

    /// `DELETE path`.
    async fn delete(&self, path: &str) -> Result<Value> {
        self.request(ApiRequest::delete(ApiPath::new(path)?)).await
    }
}

fn with_optional_body(request: ApiRequest, body: Option<Value>) -> ApiRequest {
    match body {
        Some(body) => request.with_body(body),
        None => request,
    }
}
