//! JSON file-backed key/value store.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use atpg_core::error::{Error, StorageError};
use atpg_core::{KeyValueStore, Result};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// File name used under the per-user data directory.
pub const DEFAULT_FILE_NAME: &str = "credentials.json";

fn map_io(err: std::io::Error) -> Error {
    Error::Storage(StorageError::Io {
        message: err.to_string(),
    })
}

/// On-disk document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredValues {
    values: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// A [`KeyValueStore`] persisted as a single JSON file.
///
/// Every mutation rewrites the whole document under an exclusive advisory
/// lock on a sibling `.lock` file. On Unix the file is readable by its owner
/// only.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the file at `path`.
    ///
    /// The file and its parent directory are created on the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a store in the per-user data directory.
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "atpg").ok_or_else(|| StorageError::Io {
            message: "could not determine data directory".to_string(),
        })?;
        Ok(Self::new(dirs.data_dir().join(DEFAULT_FILE_NAME)))
    }

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time of the last write, if the file exists and records one.
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read()?.updated_at)
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(map_io)?;
        }
        Ok(())
    }

    /// Run `f` while holding the exclusive lock.
    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.ensure_parent()?;
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(map_io)?;
        lock_file.lock_exclusive().map_err(map_io)?;

        let result = f();

        let unlocked = FileExt::unlock(&lock_file).map_err(map_io);
        let value = result?;
        unlocked?;
        Ok(value)
    }

    fn read(&self) -> Result<StoredValues> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredValues::default());
            }
            Err(err) => return Err(map_io(err)),
        };

        if json.trim().is_empty() {
            return Ok(StoredValues::default());
        }

        serde_json::from_str(&json).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                message: format!("{}: {}", self.path.display(), e),
            })
        })
    }

    fn write(&self, mut stored: StoredValues) -> Result<()> {
        stored.updated_at = Some(Utc::now());
        let json = serde_json::to_string_pretty(&stored).map_err(|e| StorageError::Corrupt {
            message: e.to_string(),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&tmp)
                .map_err(map_io)?;

            #[cfg(unix)]
            {
                let mut perms = file.metadata().map_err(map_io)?.permissions();
                perms.set_mode(0o600);
                fs::set_permissions(&tmp, perms).map_err(map_io)?;
            }

            file.write_all(json.as_bytes()).map_err(map_io)?;
            file.sync_all().map_err(map_io)?;
        }
        fs::rename(&tmp, &self.path).map_err(map_io)?;

        trace!(path = %self.path.display(), keys = stored.values.len(), "Wrote store");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.values.get(key).cloned())
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_lock(|| {
            let mut stored = self.read()?;
            stored.values.insert(key.to_string(), value.to_string());
            self.write(stored)
        })?;
        debug!("Stored value");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove(&self, key: &str) -> Result<()> {
        self.with_lock(|| {
            let mut stored = self.read()?;
            if stored.values.remove(key).is_none() {
                return Ok(());
            }
            self.write(stored)?;
            debug!("Removed value");
            Ok(())
        })
    }
}
