//! atpg-core - Core types and traits for the ATP Global API client.

pub mod error;
pub mod request;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

pub use error::Error;
pub use request::{ApiRequest, Method};
pub use store::{CredentialStore, KeyValueStore, MemoryStore, REFRESH_TOKEN_KEY, TOKEN_KEY};
pub use tokens::{BearerToken, Credential, RefreshToken};
pub use traits::Api;
pub use types::{ApiPath, ApiUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
