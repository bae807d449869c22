//! Error types for the storage layer.

use sealfield_model::FieldError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A field rejected a value on the way in or out, including decryption failures.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Record not found.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The model declares no field with this name.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The schema failed its configuration checks.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
