//! JSON file-based key/value store.
//!
//! The file is a single JSON object mapping keys to strings, the same shape a
//! browser's `localStorage` would hold. Writes go to a temporary file that is
//! then renamed over the target, so a crash never leaves a half-written file.
//!
//! # File Format
//!
//! ```json
//! {
//!   "darkMode": "true",
//!   "favorites": "[{\"cca3\":\"KEN\",\"name\":\"Kenya\",...}]",
//!   "isAuthenticated": "false",
//!   "recentSearches": "[]",
//!   "user": "null"
//! }
//! ```

use crate::domain::error::{CountryscopeError, Result};
use crate::storage::backend::KeyValueStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File-backed [`KeyValueStore`].
///
/// The whole map is kept in memory and rewritten on every change. A change
/// only reaches the in-memory map after the file write succeeded, so a failed
/// write leaves both the file and the map as they were.
///
/// # Thread Safety
///
/// `Send` but not `Sync`; owned by the background worker.
pub struct JsonStore {
    file_path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonStore {
    /// Opens the store at `file_path`, creating parent directories.
    ///
    /// A missing file starts empty. An unreadable or malformed file is logged
    /// and also starts empty; the next write replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the parent directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use countryscope::storage::{JsonStore, KeyValueStore};
    /// use std::path::PathBuf;
    ///
    /// let mut store = JsonStore::open(PathBuf::from("/tmp/session.json"))?;
    /// store.set("darkMode", "true".to_string())?;
    /// # Ok::<(), countryscope::CountryscopeError>(())
    /// ```
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let values = if file_path.exists() {
            Self::load_from_file(&file_path).unwrap_or_else(|e| {
                tracing::warn!(error = %e, path = ?file_path, "discarding unreadable store");
                BTreeMap::new()
            })
        } else {
            tracing::debug!("initializing new empty store");
            BTreeMap::new()
        };

        tracing::debug!(keys = values.len(), "store opened");

        Ok(Self {
            file_path,
            values,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<BTreeMap<String, String>> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| CountryscopeError::Storage(format!("failed to parse JSON: {e}")))
    }

    fn save_to_file(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| CountryscopeError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let _span = tracing::debug_span!("json_set", key = %key).entered();
        self.set_all(vec![(key, value)])
    }

    fn set_all(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        let _span = tracing::debug_span!("json_set_all", count = entries.len()).entered();
        let mut candidate = self.values.clone();
        for (key, value) in entries {
            candidate.insert(key.to_string(), value);
        }
        self.save_to_file(&candidate)?;
        self.values = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        {
            let mut store = JsonStore::open(path.clone()).unwrap();
            store
                .set_all(vec![("darkMode", "true".into()), ("user", "null".into())])
                .unwrap();
        }

        let store = JsonStore::open(path.clone()).unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("true"));
        assert_eq!(store.get("user").unwrap().as_deref(), Some("null"));
        assert_eq!(store.get("favorites").unwrap(), None);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn malformed_file_starts_empty_and_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut store = JsonStore::open(path.clone()).unwrap();
        assert_eq!(store.get("darkMode").unwrap(), None);

        store.set("darkMode", "false".into()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.get("darkMode").map(String::as_str), Some("false"));
    }

    #[test]
    fn failed_write_leaves_file_and_map_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let blocker = path.with_extension("tmp");

        {
            let mut store = JsonStore::open(path.clone()).unwrap();
            store.set("darkMode", "false".into()).unwrap();

            std::fs::create_dir(&blocker).unwrap();
            assert!(store
                .set_all(vec![("darkMode", "true".into()), ("user", "null".into())])
                .is_err());
            std::fs::remove_dir(&blocker).unwrap();

            assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("false"));
            assert_eq!(store.get("user").unwrap(), None);
        }

        let store = JsonStore::open(path).unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("false"));
        assert_eq!(store.get("user").unwrap(), None);
    }
}
