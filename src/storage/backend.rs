//! Storage backend abstraction.
//!
//! This module defines the [`KeyValueStore`] trait, a string-keyed,
//! string-valued store in the spirit of browser `localStorage`. The session
//! store encodes each field as JSON on top of it, so backends never see domain
//! types.

use crate::domain::error::Result;

/// Abstraction over durable key/value backends.
///
/// # Implementations
///
/// - [`crate::storage::JsonStore`]: JSON file with atomic writes (default)
/// - [`crate::storage::MemoryStore`]: in-memory map for tests and fallbacks
pub trait KeyValueStore: Send {
    /// Returns the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a single value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Stores several values as one write.
    ///
    /// The default implementation calls [`KeyValueStore::set`] per entry;
    /// file-backed stores override it to write once.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails. Entries before the failing one may
    /// already be stored.
    fn set_all(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}
