//! Error types for newsdesk.

use thiserror::Error;

/// Common error type for newsdesk.
#[derive(Error, Debug)]
pub enum NewsdeskError {
    /// Database error.
    ///
    /// Generic wrapper for errors coming out of the storage layer.
    /// Errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feed retrieval or parse error.
    #[error("feed error: {0}")]
    Feed(String),

    /// Validation error for input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Cache serialization error.
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for NewsdeskError {
    fn from(e: sqlx::Error) -> Self {
        NewsdeskError::Database(e.to_string())
    }
}

/// Result type alias for newsdesk operations.
pub type Result<T> = std::result::Result<T, NewsdeskError>;
