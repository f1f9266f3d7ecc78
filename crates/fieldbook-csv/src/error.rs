//! CSV import error types

use thiserror::Error;

/// Result type for import operations
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Errors that can occur while importing a CSV file
#[derive(Debug, Error)]
pub enum ImportError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Schema construction error (e.g. duplicate header names)
    #[error("Schema error: {0}")]
    Schema(#[from] fieldbook_core::SchemaError),
}
