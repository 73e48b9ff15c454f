//! Error types for the Registrar plugin.
//!
//! [`RegistrarError`] collects every failure the host can run into, from
//! storage and worker communication to table misconfiguration. Empty and
//! loading tables are states, never errors.

use crate::table::TableError;
use thiserror::Error;

/// The main error type for Registrar operations.
///
/// # Examples
///
/// ```
/// use registrar::domain::RegistrarError;
///
/// fn load() -> Result<(), RegistrarError> {
///     Err(RegistrarError::Storage("collection is corrupt".to_string()))
/// }
/// assert_eq!(load().unwrap_err().to_string(), "Storage error: collection is corrupt");
/// ```
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// Reading or writing the record store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A theme file could not be read or parsed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// A message to or from the background worker could not be handled.
    #[error("Worker communication error: {0}")]
    Worker(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A table was configured or driven incorrectly.
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

impl From<serde_json::Error> for RegistrarError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// A specialized `Result` type for Registrar operations.
pub type Result<T> = std::result::Result<T, RegistrarError>;
