//! Durable key/value blobs for rehydrating application state.
//!
//! Keys are namespaced by the caller (the app store uses `persist:<key>`);
//! values are opaque strings, normally JSON.

use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait PersistStorage: Send + Sync + 'static {
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&self, key: &str, blob: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per key inside a directory. Writes go through a temporary file
/// and a rename so a crash never leaves a half-written blob behind.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tracing::debug!(dir = ?dir, "initializing file storage");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `persist:root` is stored as `persist_root.json`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl PersistStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            tracing::debug!(path = ?path, "no persisted blob");
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, blob)?;
        std::fs::rename(&tmp_path, &path)?;
        tracing::trace!(path = ?path, bytes = blob.len(), "blob saved");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, blob: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.into(), blob.into());
        }
        storage
    }
}

impl PersistStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| crate::DashboardError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| crate::DashboardError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| crate::DashboardError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested")).unwrap();

        assert_eq!(storage.load("persist:root").unwrap(), None);
        storage.save("persist:root", r#"{"a":1}"#).unwrap();
        assert_eq!(
            storage.load("persist:root").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
        assert!(storage.path_for("persist:root").ends_with("persist_root.json"));
        assert!(!storage.path_for("persist:root").with_extension("tmp").exists());

        storage.remove("persist:root").unwrap();
        assert_eq!(storage.load("persist:root").unwrap(), None);
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::with_entry("k", "v");
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("v"));
        storage.save("k", "w").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("w"));
        storage.remove("k").unwrap();
        assert_eq!(storage.load("k").unwrap(), None);
    }
}
