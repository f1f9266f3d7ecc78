//! Error types for fieldbook-core

use thiserror::Error;

/// Result type alias using [`SchemaError`]
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised by schema edits and value checks.
///
/// Every mutation validates before it touches state, so a returned error
/// always leaves the prior schema intact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Field name is empty
    #[error("Field name cannot be empty")]
    EmptyFieldName,

    /// Field name already used in the same table
    #[error("Duplicate field name: {0}")]
    DuplicateFieldName(String),

    /// No field with the given name
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Select field with no legal values
    #[error("Select field '{0}' has an empty options list")]
    EmptyOptions(String),

    /// Formula operations on a field that is not computed
    #[error("Field '{0}' is not a computed field")]
    NotCalc(String),

    /// Direct edit of a computed slot
    #[error("Computed field '{0}' cannot be edited directly")]
    CalcFieldReadOnly(String),

    /// Constraint that makes no sense for the field
    #[error("Invalid constraint on field '{field}': {reason}")]
    InvalidConstraint { field: String, reason: String },

    /// Value rejected by the field's type or constraints
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Column index past the end of the field list
    #[error("Column index {0} out of bounds (count: {1})")]
    ColumnOutOfBounds(usize, usize),
}

impl SchemaError {
    /// Create an [`SchemaError::InvalidValue`] with a message
    pub fn invalid_value<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        SchemaError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
