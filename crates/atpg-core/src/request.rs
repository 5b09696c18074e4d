//! Request value object.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::Result;
use crate::error::InvalidInputError;
use crate::types::ApiPath;

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API request: method, path, optional JSON body and extra headers.
///
/// Immutable once built. The client re-sends the same value when it
/// retries after a refresh, rebuilding only the `Authorization` header.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: ApiPath,
    body: Option<Value>,
    headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: ApiPath) -> Self {
        Self {
            method,
            path,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: ApiPath) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: ApiPath) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: ApiPath) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: ApiPath) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: ApiPath) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach any serializable body, encoded as JSON.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| InvalidInputError::Body {
            message: e.to_string(),
        })?;
        Ok(self.with_body(value))
    }

    /// Attach an extra header. Later headers with the same name win.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &ApiPath {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}
