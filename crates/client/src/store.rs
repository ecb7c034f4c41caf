//! Durable local persistence store.
//!
//! A synchronous key-value store over a data directory, one JSON document
//! per key. The store is a mirror of in-memory state, not an authority, so
//! it is infallible by contract: a missing or corrupt document degrades to
//! the type's default, and a failed write is logged and swallowed. Writes go
//! through a temp file and rename so a crash never leaves a half-written
//! document behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Well-known store keys.
pub mod keys {
    /// Cart entries for this device.
    pub const CART: &str = "cart";
    /// The authenticated user, if any.
    pub const USER: &str = "user";
    /// Favorites snapshot for the authenticated user.
    pub const FAVORITES: &str = "favorites";
    /// Last successfully fetched catalog.
    pub const CATALOG: &str = "catalog";
    /// Locally recorded order history.
    pub const ORDERS: &str = "orders";
}

/// File-backed key-value store for client state.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    #[must_use]
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let root = data_dir.into();
        if let Err(e) = fs::create_dir_all(&root) {
            warn!(path = %root.display(), error = %e, "Failed to create data directory");
        }
        Self { root }
    }

    /// Load the value for `key`, or the type's default if the document is
    /// missing or unreadable.
    #[must_use]
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key).unwrap_or_default()
    }

    /// Load the value for `key`, or `None` if the document is missing or
    /// unreadable. Corrupt documents are logged, never propagated.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read store document");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Corrupt store document, falling back to default");
                None
            }
        }
    }

    /// Persist `value` under `key`, immediately durable.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_vec_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize store document");
                return;
            }
        };

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let result = fs::write(&tmp, &json).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = result {
            warn!(key, error = %e, "Failed to write store document");
            let _ = fs::remove_file(&tmp);
        }
    }

    /// Remove the document for `key`, if present.
    pub fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(key, error = %e, "Failed to remove store document");
        }
    }

    /// Path of the document backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());
        (dir, store)
    }

    #[test]
    fn test_missing_key_defaults() {
        let (_dir, store) = temp_store();
        let value: Vec<String> = store.load("nothing");
        assert!(value.is_empty());
        assert!(store.get::<Vec<String>>("nothing").is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (_dir, store) = temp_store();
        store.save(keys::CART, &vec![1, 2, 3]);
        assert_eq!(store.load::<Vec<i32>>(keys::CART), vec![1, 2, 3]);
    }

    #[test]
    fn test_corrupt_document_degrades_to_default() {
        let (_dir, store) = temp_store();
        fs::write(store.path_for(keys::CART), b"{not json").unwrap();
        assert_eq!(store.load::<Vec<i32>>(keys::CART), Vec::<i32>::new());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let (_dir, store) = temp_store();
        store.save(keys::USER, &"alice");
        store.save(keys::USER, &"bob");
        assert_eq!(store.get::<String>(keys::USER).unwrap(), "bob");
    }

    #[test]
    fn test_remove() {
        let (_dir, store) = temp_store();
        store.save(keys::FAVORITES, &vec![7]);
        store.remove(keys::FAVORITES);
        assert!(store.get::<Vec<i32>>(keys::FAVORITES).is_none());
        // Removing twice is fine.
        store.remove(keys::FAVORITES);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (dir, store) = temp_store();
        store.save(keys::CATALOG, &vec!["a", "b"]);
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
