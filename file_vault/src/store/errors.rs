//! Store error types.

use thiserror::Error;

/// Errors produced by the store layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// I/O error creating the database directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted value could not be interpreted
    #[error("Corrupt stored value: {0}")]
    CorruptValue(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
