//! In-memory key/value store.

use crate::domain::error::{CountryscopeError, Result};
use crate::storage::backend::KeyValueStore;
use std::collections::BTreeMap;

/// Volatile [`KeyValueStore`] backed by a map.
///
/// Used as the injectable backend in tests, and by the worker when the data
/// directory cannot be opened.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw values.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            fail_writes: false,
        }
    }

    /// Makes every subsequent write fail, to exercise error paths.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        if self.fail_writes {
            return Err(CountryscopeError::Storage(format!(
                "write rejected for key {key}"
            )));
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn set_all(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        if self.fail_writes {
            return Err(CountryscopeError::Storage("write rejected".to_string()));
        }
        for (key, value) in entries {
            self.values.insert(key.to_string(), value);
        }
        Ok(())
    }
}
