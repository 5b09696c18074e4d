//! atpg-file - Filesystem-backed credential storage for the atpg client.

mod store;

pub use store::{DEFAULT_FILE_NAME, FileStore};
