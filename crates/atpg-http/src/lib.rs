//! atpg-http - Authenticated HTTP client for the ATP Global API.
//!
//! All calls flow through [`ApiClient`], which attaches the stored bearer
//! token, refreshes it once on a `401` and retries the request once.
//!
//! # Example
//!
//! ```no_run
//! use atpg_core::{Api, ApiUrl, CredentialStore, MemoryStore};
//! use atpg_http::{ApiClient, ClientConfig};
//!
//! # async fn example() -> Result<(), atpg_core::Error> {
//! let config = ClientConfig::new(ApiUrl::new("https://api.atpglobal.com")?);
//! let client = ApiClient::new(config, CredentialStore::new(MemoryStore::new()))?;
//!
//! client.login("intern@example.com", "secret").await?;
//! let jobs = client.get("/api/jobs").await?;
//! println!("{}", jobs);
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
pub mod endpoints;
mod protocol;
mod refresh;
mod transport;

pub use client::ApiClient;
pub use config::{API_URL_ENV, ClientConfig, TIMEOUT_ENV};
pub use protocol::Phase;

pub use reqwest::multipart;
