//! File store tests.

use std::sync::Arc;

use atpg_core::{Credential, CredentialStore, KeyValueStore, REFRESH_TOKEN_KEY, TOKEN_KEY};
use atpg_file::FileStore;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> FileStore {
    FileStore::new(dir.path().join("nested").join("credentials.json"))
}

#[test]
fn test_set_creates_file_and_parent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.set(TOKEN_KEY, "abc").unwrap();

    assert!(store.path().exists());
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    assert!(store.updated_at().unwrap().is_some());
}

#[test]
fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    store_in(&dir).set(TOKEN_KEY, "abc").unwrap();

    let reopened = store_in(&dir);
    assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
}

#[test]
fn test_credential_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let credentials = CredentialStore::new(store_in(&dir));

    credentials
        .save(&Credential::new("abc", Some("def".to_string())))
        .unwrap();
    let loaded = credentials.credential().unwrap().unwrap();
    assert_eq!(loaded.token.as_str(), "abc");
    assert_eq!(loaded.refresh_token.unwrap().as_str(), "def");

    credentials.clear().unwrap();
    let file = store_in(&dir);
    assert!(file.get(TOKEN_KEY).unwrap().is_none());
    assert!(file.get(REFRESH_TOKEN_KEY).unwrap().is_none());
}

#[test]
fn test_clear_keeps_other_keys() {
    let dir = TempDir::new().unwrap();
    let file = store_in(&dir);
    file.set("portal.locale", "vi").unwrap();

    let credentials = CredentialStore::new(file.clone());
    credentials.save(&Credential::new("abc", None)).unwrap();
    credentials.clear().unwrap();

    assert_eq!(file.get("portal.locale").unwrap().as_deref(), Some("vi"));
}

#[test]
fn test_corrupt_file_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = FileStore::new(&path).get(TOKEN_KEY).unwrap_err();
    assert!(matches!(err, atpg_core::Error::Storage(_)));
    assert_eq!(err.status(), 500);
}

#[test]
fn test_concurrent_writers_do_not_lose_keys() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(store_in(&dir));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                store.set(&format!("key-{}", i), "v").unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..8 {
        assert_eq!(
            store.get(&format!("key-{}", i)).unwrap().as_deref(),
            Some("v")
        );
    }
}

#[cfg(unix)]
#[test]
fn test_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.set(TOKEN_KEY, "abc").unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
