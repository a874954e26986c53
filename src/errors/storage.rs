//! Storage error types
//!
//! Errors raised while mapping a series name to its CSV file and while
//! reading or writing that file. An absent file is not an error: it loads
//! as an empty series.

use thiserror::Error;

/// Series storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Series name does not map to a file inside the storage root
    #[error("Invalid series name: '{0}'")]
    InvalidName(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing/writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Stored value that cannot be coerced to its column type
    #[error("Malformed series file: {0}")]
    Malformed(String),
}

impl StorageError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(self, StorageError::InvalidName(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::InvalidName(_) => "INVALID_NAME",
            StorageError::Io(_) => "IO_ERROR",
            StorageError::Csv(_) => "CSV_ERROR",
            StorageError::Malformed(_) => "MALFORMED_DATA",
        }
    }
}
