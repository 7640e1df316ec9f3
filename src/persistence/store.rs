//! String-keyed persistent stores.
//!
//! The engine never touches storage directly; [`GameSession`] talks to a
//! [`KeyValueStore`] it was handed. Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: a hash map, for tests and hosts that persist elsewhere
//! - [`FileStore`]: a JSON object on disk, rewritten on every `flush`
//!
//! Writes are visible to `get` immediately; only `flush` is required to make
//! them durable.
//!
//! [`GameSession`]: crate::session::GameSession

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::error::StoreError;

/// A string-keyed key/value store.
pub trait KeyValueStore {
    /// Is a value stored under `key`?
    fn has(&self, key: &str) -> bool;

    /// The value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String);

    /// Remove `key`. Removing a missing key is a no-op.
    fn delete(&mut self, key: &str);

    /// Make every write so far durable.
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
    flushes: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `flush` has been called.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.flushes += 1;
        Ok(())
    }
}

/// Store backed by a single JSON file.
///
/// The whole map is loaded on [`open`](Self::open) and written back on
/// `flush` if anything changed. The file is replaced atomically via a
/// sibling temporary file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    dirty: bool,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is discarded with a warning and replaced on the next flush.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    log::warn!("Discarding unreadable store {}: {}", path.display(), err);
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        log::debug!("Opened store {} with {} keys", path.display(), entries.len());
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Are there writes not yet flushed?
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl KeyValueStore for FileStore {
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        if self.entries.get(key) != Some(&value) {
            self.entries.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    fn delete(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let text = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;

        self.dirty = false;
        log::debug!("Flushed {} keys to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("match-pairs-store-{}-{}", std::process::id(), name))
            .join("store.json")
    }

    #[test]
    fn test_memory_store_contract() {
        let mut store = MemoryStore::new();
        assert!(!store.has("a"));
        assert_eq!(store.get("a"), None);

        store.set("a", "1".to_string());
        assert!(store.has("a"));
        assert_eq!(store.get("a").as_deref(), Some("1"));

        store.set("a", "2".to_string());
        assert_eq!(store.get("a").as_deref(), Some("2"));

        store.delete("a");
        store.delete("a");
        assert!(!store.has("a"));

        store.flush().unwrap();
        assert_eq!(store.flushes(), 1);
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let path = scratch_path("persist");
        let _ = fs::remove_file(&path);

        let mut store = FileStore::open(&path).unwrap();
        assert!(!store.has("SaveData"));
        store.set("SaveData", "{}".to_string());
        store.set("MaxUnlockedLevel", "3".to_string());
        assert!(store.is_dirty());
        store.flush().unwrap();
        assert!(!store.is_dirty());

        let mut reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("MaxUnlockedLevel").as_deref(), Some("3"));
        reopened.delete("SaveData");
        reopened.flush().unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert!(!reopened.has("SaveData"));
        assert!(reopened.has("MaxUnlockedLevel"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_discards_garbage() {
        let path = scratch_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(!store.has("SaveData"));
        assert!(!store.is_dirty());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_unchanged_set_is_clean() {
        let path = scratch_path("clean");
        let _ = fs::remove_file(&path);

        let mut store = FileStore::open(&path).unwrap();
        store.set("k", "v".to_string());
        store.flush().unwrap();
        store.set("k", "v".to_string());
        assert!(!store.is_dirty());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
