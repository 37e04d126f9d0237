//! Error types for the countryscope plugin.
//!
//! This module defines the centralized error type [`CountryscopeError`] and a type
//! alias [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate.

use thiserror::Error;

/// The main error type for countryscope operations.
///
/// Covers local persistence, remote country lookups, worker communication and
/// login validation. Variants wrapping external errors convert automatically
/// through `#[from]`.
///
/// # Examples
///
/// ```
/// use countryscope::CountryscopeError;
///
/// fn read_storage() -> Result<(), CountryscopeError> {
///     Err(CountryscopeError::Storage("Failed to read file".to_string()))
/// }
///
/// assert!(read_storage().is_err());
/// ```
#[derive(Debug, Error)]
pub enum CountryscopeError {
    /// Reading from or writing to the durable key/value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme file could not be read or parsed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The country API answered with a non-success status.
    ///
    /// Transport failures reported by the host also land here.
    #[error("HTTP error: status {status}")]
    Http {
        /// HTTP status code of the response.
        status: u16,
    },

    /// The country API found no country for the query.
    ///
    /// Callers that search treat this as a valid empty result.
    #[error("No countries matched the query")]
    NotFound,

    /// A JSON body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// User input was rejected before any state changed.
    #[error("{0}")]
    Validation(String),
}

impl CountryscopeError {
    /// Returns `true` if the error means "nothing matched" rather than a failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// A specialized `Result` type for countryscope operations.
pub type Result<T> = std::result::Result<T, CountryscopeError>;
