//! File-backed key-value store.
//!
//! All keys live in one JSON object on disk:
//!
//! ```text
//! {
//!   "blogPosts": "[{\"id\":1710000000000, ...}]",
//!   "comments_1710000000000": "[...]"
//! }
//! ```
//!
//! Values stay opaque strings, exactly as the browser would hold them. Every
//! mutation rewrites the whole file through a temporary file in the same
//! directory followed by a rename, so a crash leaves either the old or the
//! new contents.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// Key-value store persisted as a single JSON file.
pub struct FileKeyValueStore {
    path: PathBuf,
    items: RwLock<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store; the file (and its parent
    /// directories) is created on the first write. A file that is not a JSON
    /// object of strings is reported as [`StoreError::Corrupt`].
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
                key: path.display().to_string(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = items.len(), "opened file store");
        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, String>>> {
        self.items
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, String>>> {
        self.items
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let json = serde_json::to_vec_pretty(items)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), bytes = json.len(), "flushed file store");
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut items = self.write()?;
        let previous = items.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&items) {
            // Keep memory in step with disk.
            match previous {
                Some(old) => items.insert(key.to_string(), old),
                None => items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<bool> {
        let mut items = self.write()?;
        let Some(previous) = items.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.flush(&items) {
            items.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn contains_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read()?.contains_key(key))
    }
}

impl std::fmt::Debug for FileKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKeyValueStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path().join("blog.json")).unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(!dir.path().join("blog.json").exists());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.json");
        {
            let store = FileKeyValueStore::open(&path).unwrap();
            store.set_item("blogPosts", "[]").unwrap();
            store.set_item("comments_1", "[1]").unwrap();
        }
        let store = FileKeyValueStore::open(&path).unwrap();
        assert_eq!(store.get_item("blogPosts").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.keys().unwrap(), vec!["blogPosts", "comments_1"]);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("blog.json");
        let store = FileKeyValueStore::open(&path).unwrap();
        store.set_item("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.json");
        let store = FileKeyValueStore::open(&path).unwrap();
        store.set_item("k", "v").unwrap();
        assert!(store.remove_item("k").unwrap());
        assert!(!store.remove_item("k").unwrap());

        let reopened = FileKeyValueStore::open(&path).unwrap();
        assert!(reopened.get_item("k").unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.json");
        fs::write(&path, "not json").unwrap();
        let err = FileKeyValueStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn blank_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.json");
        fs::write(&path, "\n").unwrap();
        let store = FileKeyValueStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
