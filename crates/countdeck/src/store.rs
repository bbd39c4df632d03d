//! Key-value persistence used by the countdown and the slideshow.
//!
//! Both controllers only ever talk to [`Store`]. The desktop app uses a
//! [`FileStore`]; tests and `--ephemeral` mode use a [`MemoryStore`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::StoreError;

const APP_DIR: &str = "countdeck";
const FILENAME: &str = "store.json";

/// Byte quota used when none is configured.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

pub trait Store {
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value. On `QuotaExceeded` the previous value is kept.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str);
}

impl<T: Store + ?Sized> Store for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

/// Total size of the entries if `key` were set to `value`.
fn size_with(entries: &BTreeMap<String, String>, key: &str, value: &str) -> usize {
    let others: usize = entries
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
    others + key.len() + value.len()
}

fn check_quota(
    entries: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<(), StoreError> {
    if let Some(quota) = quota {
        let needed = size_with(entries, key, value);
        if needed > quota {
            return Err(StoreError::QuotaExceeded { needed, quota });
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_quota(&self.entries, key, value, self.quota)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// A JSON object on disk, loaded at open and rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    quota: usize,
}

impl FileStore {
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
    }

    /// Open the store at `path`. A missing file opens empty, and so does a
    /// corrupt one (with a warning), so startup never fails on bad data.
    pub fn open(path: &Path, quota: usize) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable store {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read store {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        tracing::debug!(
            "Opened store {} with {} key(s)",
            path.display(),
            entries.len()
        );
        Self {
            path: path.to_path_buf(),
            entries,
            quota,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_quota(&self.entries, key, value, Some(self.quota))?;
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_none() {
            return;
        }
        if let Err(e) = self.flush(&self.entries) {
            tracing::warn!("Failed to remove {key} from {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("targetDate"), None);
        store.set("targetDate", "2030-01-01T00:00:00").unwrap();
        assert_eq!(store.get("targetDate").as_deref(), Some("2030-01-01T00:00:00"));
        store.remove("targetDate");
        assert_eq!(store.get("targetDate"), None);
    }

    #[test]
    fn test_memory_store_quota_keeps_previous_value() {
        let mut store = MemoryStore::with_quota(20);
        store.set("k", "short").unwrap();
        let err = store.set("k", "a value that is far too long").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { quota: 20, .. }));
        assert_eq!(store.get("k").as_deref(), Some("short"));
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let mut store = MemoryStore::with_quota(10);
        store.set("k", "123456789").unwrap();
        // Replacing a value must not count the old one.
        store.set("k", "987654321").unwrap();
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path, DEFAULT_QUOTA_BYTES);
        store.set("targetDate", "2029-05-01T12:00:00").unwrap();
        store.set("slideshowImages", "[]").unwrap();
        store.remove("slideshowImages");

        let reopened = FileStore::open(&path, DEFAULT_QUOTA_BYTES);
        assert_eq!(
            reopened.get("targetDate").as_deref(),
            Some("2029-05-01T12:00:00")
        );
        assert_eq!(reopened.get("slideshowImages"), None);
    }

    #[test]
    fn test_file_store_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path, DEFAULT_QUOTA_BYTES);
        assert_eq!(store.get("targetDate"), None);
    }

    #[test]
    fn test_file_store_quota_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path, 16);
        let err = store.set("slideshowImages", "too big for sixteen").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_failed_write_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path, DEFAULT_QUOTA_BYTES);
        store.set("targetDate", "2029-05-01T12:00:00").unwrap();
        store.set("slideshowImages", "[]").unwrap();

        // A directory where the file should be makes every write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = store.set("targetDate", "2030-01-01T00:00:00").unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(
            store.get("targetDate").as_deref(),
            Some("2029-05-01T12:00:00")
        );

        store.remove("slideshowImages");
        assert_eq!(store.get("slideshowImages"), None);
        assert!(path.is_dir());
    }
}
