//! Error type for the fieldbook facade

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by table operations.
///
/// Wraps the per-crate errors at the facade boundary so callers handle one
/// type. Formula compile failures are recoverable: the owning field is saved
/// non-evaluable and the error is returned for the caller to surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Schema or value error
    #[error("Schema error: {0}")]
    Schema(#[from] fieldbook_core::SchemaError),

    /// Formula compile error
    #[error("Formula error: {0}")]
    Formula(#[from] fieldbook_formula::FormulaError),

    /// CSV import error
    #[error("Import error: {0}")]
    Import(#[from] fieldbook_csv::ImportError),

    /// Document (de)serialization error
    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
