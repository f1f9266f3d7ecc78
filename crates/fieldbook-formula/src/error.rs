//! Formula error types

use thiserror::Error;

/// Result type for formula compilation
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors reported when a formula fails to compile.
///
/// Compilation errors are local and recoverable: the owning field is still
/// saved, flagged non-evaluable (every evaluation yields null) until the
/// formula is corrected. Evaluation itself never errors — missing inputs and
/// division by zero are defined null outcomes, not failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Operand does not name any field of the table
    #[error("Unknown field reference: {0}")]
    UnknownField(String),

    /// Operand names a computed field (including the field being defined);
    /// chained derivation is not supported
    #[error("Formula cannot reference computed field: {0}")]
    CalcReference(String),

    /// Parentheses do not balance
    #[error("Unbalanced parentheses")]
    UnbalancedParens,

    /// Operands and operators do not strictly alternate
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// Source text contains no tokens
    #[error("Formula is empty")]
    EmptyFormula,
}
