//! Client and store construction from global flags.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use tracing::debug;

use atpg_core::{ApiUrl, CredentialStore};
use atpg_file::FileStore;
use atpg_http::{ApiClient, ClientConfig};

use crate::cli::Cli;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    api_url: Option<String>,
    store: Option<PathBuf>,
    timeout: Option<u64>,
    share_refresh: bool,
}

impl Context {
    pub fn new(cli: &Cli) -> Self {
        Self {
            api_url: cli.api_url.clone(),
            store: cli.store.clone(),
            timeout: cli.timeout,
            share_refresh: cli.share_refresh,
        }
    }

    /// The configured API URL, if any.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// The credential store, without requiring an API URL.
    pub fn credentials(&self) -> Result<CredentialStore> {
        Ok(CredentialStore::new(self.file_store()?))
    }

    /// The file store holding the credential.
    pub fn file_store(&self) -> Result<FileStore> {
        match &self.store {
            Some(path) => Ok(FileStore::new(path)),
            None => FileStore::default_location().context("Could not determine store location"),
        }
    }

    /// A client for the configured API, backed by the file store.
    pub fn client(&self) -> Result<ApiClient> {
        let api_url = self
            .api_url
            .as_deref()
            .context("No API URL. Pass --api-url or set ATPG_API_URL.")?;
        let base_url = ApiUrl::new(api_url).context("Invalid API URL")?;

        let mut config = ClientConfig::new(base_url.clone()).with_shared_refresh(self.share_refresh);
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        let file = self.file_store()?;
        debug!(api = %base_url, store = %file.path().display(), "Building client");
        let store = CredentialStore::new(file);
        ApiClient::new(config, store).context("Failed to build HTTP client")
    }
}
