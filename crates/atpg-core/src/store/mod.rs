//! Credential storage.
//!
//! Credentials live in a persistent key/value store under two fixed keys.
//! The store is injected as a trait object so the HTTP client never reaches
//! for ambient global state.

mod memory;

use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::tokens::{BearerToken, Credential, RefreshToken};

pub use memory::MemoryStore;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "atpg.token";

/// Key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "atpg.refresh_token";

/// A persistent string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Typed access to the credential held in a [`KeyValueStore`].
///
/// Cheap to clone; clones share the same backing store.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: store }
    }

    /// The current bearer token, if one is stored.
    pub fn token(&self) -> Result<Option<BearerToken>> {
        Ok(self.inner.get(TOKEN_KEY)?.map(BearerToken::new))
    }

    /// The current refresh token, if one is stored.
    pub fn refresh_token(&self) -> Result<Option<RefreshToken>> {
        Ok(self.inner.get(REFRESH_TOKEN_KEY)?.map(RefreshToken::new))
    }

    /// The full credential, if a bearer token is stored.
    pub fn credential(&self) -> Result<Option<Credential>> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };
        Ok(Some(Credential {
            token,
            refresh_token: self.refresh_token()?,
        }))
    }

    /// Replace the bearer token, leaving the refresh token untouched.
    pub fn set_token(&self, token: &BearerToken) -> Result<()> {
        self.inner.set(TOKEN_KEY, token.as_str())
    }

    /// Persist a full credential.
    ///
    /// A credential without a refresh token removes any stale one.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        self.inner.set(TOKEN_KEY, credential.token.as_str())?;
        match &credential.refresh_token {
            Some(refresh) => self.inner.set(REFRESH_TOKEN_KEY, refresh.as_str()),
            None => self.inner.remove(REFRESH_TOKEN_KEY),
        }
    }

    /// Remove both keys.
    pub fn clear(&self) -> Result<()> {
        debug!("Clearing stored credential");
        self.inner.remove(TOKEN_KEY)?;
        self.inner.remove(REFRESH_TOKEN_KEY)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("values", &"[REDACTED]")
            .finish()
    }
}
