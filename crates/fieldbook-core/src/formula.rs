//! Compiled formula representation
//!
//! A computed field's formula is stored as a validated token sequence, never
//! as raw source text. Compilation (tokenizing and validating the source
//! against a table's field set) lives in the `fieldbook-formula` crate; this
//! module only defines the data the schema carries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The operator alphabet of the formula language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    OpenParen,
    CloseParen,
}

impl FormulaOp {
    /// Map an operator character to its token, if it is one.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(FormulaOp::Add),
            '-' => Some(FormulaOp::Subtract),
            '*' => Some(FormulaOp::Multiply),
            '/' => Some(FormulaOp::Divide),
            '(' => Some(FormulaOp::OpenParen),
            ')' => Some(FormulaOp::CloseParen),
            _ => None,
        }
    }

    /// The source character for this operator
    pub fn symbol(self) -> char {
        match self {
            FormulaOp::Add => '+',
            FormulaOp::Subtract => '-',
            FormulaOp::Multiply => '*',
            FormulaOp::Divide => '/',
            FormulaOp::OpenParen => '(',
            FormulaOp::CloseParen => ')',
        }
    }

    /// True for the four arithmetic operators (not parentheses)
    pub fn is_binary(self) -> bool {
        !matches!(self, FormulaOp::OpenParen | FormulaOp::CloseParen)
    }
}

/// One token of a compiled formula: a field reference or an operator.
///
/// Serializes as a bare string (`"price"`, `"*"`, `"("`), so a compiled
/// formula persists as a JSON array of strings. Operand text can never
/// collide with an operator: the tokenizer splits on operator characters, so
/// no field reference consists of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FormulaToken {
    /// Reference to a sibling field, resolved by name at evaluation time
    Field(String),
    /// Operator or parenthesis
    Op(FormulaOp),
}

impl From<FormulaToken> for String {
    fn from(token: FormulaToken) -> String {
        match token {
            FormulaToken::Field(name) => name,
            FormulaToken::Op(op) => op.symbol().to_string(),
        }
    }
}

impl TryFrom<String> for FormulaToken {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        if s.is_empty() {
            return Err("formula token cannot be empty".to_string());
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(FormulaOp::from_char(c)
                .map(FormulaToken::Op)
                .unwrap_or(FormulaToken::Field(s))),
            _ => Ok(FormulaToken::Field(s)),
        }
    }
}

/// A validated formula in token form.
///
/// Invariant (enforced by the compiler, tolerated defensively by the
/// evaluator): substituting row values for the operand tokens yields a
/// well-formed infix arithmetic expression with balanced parentheses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledFormula {
    tokens: Vec<FormulaToken>,
}

impl CompiledFormula {
    /// Wrap an already-validated token sequence.
    ///
    /// Callers other than the compiler should treat this as an escape hatch:
    /// the evaluator degrades to null on malformed input rather than
    /// panicking, but nothing else checks the invariant.
    pub fn from_tokens(tokens: Vec<FormulaToken>) -> Self {
        Self { tokens }
    }

    /// The token sequence
    pub fn tokens(&self) -> &[FormulaToken] {
        &self.tokens
    }

    /// Reconstruct the source text the tokens came from
    pub fn source(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                FormulaToken::Field(name) => out.push_str(name),
                FormulaToken::Op(op) => out.push(op.symbol()),
            }
        }
        out
    }

    /// Iterate the field names this formula reads
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            FormulaToken::Field(name) => Some(name.as_str()),
            FormulaToken::Op(_) => None,
        })
    }

    /// Check whether this formula reads the given field
    pub fn references_field(&self, name: &str) -> bool {
        self.references().any(|r| r == name)
    }

    /// Re-point every reference to `old` at `new` (used when a field is
    /// renamed)
    pub fn rename_field(&mut self, old: &str, new: &str) {
        for token in &mut self.tokens {
            if let FormulaToken::Field(name) = token {
                if name == old {
                    *name = new.to_string();
                }
            }
        }
    }
}

impl fmt::Display for CompiledFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn formula(tokens: &[&str]) -> CompiledFormula {
        CompiledFormula::from_tokens(
            tokens
                .iter()
                .map(|s| FormulaToken::try_from(s.to_string()).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_token_classification() {
        assert_eq!(
            FormulaToken::try_from("+".to_string()).unwrap(),
            FormulaToken::Op(FormulaOp::Add)
        );
        assert_eq!(
            FormulaToken::try_from("price".to_string()).unwrap(),
            FormulaToken::Field("price".to_string())
        );
        assert!(FormulaToken::try_from(String::new()).is_err());
    }

    #[test]
    fn test_source_round_trip() {
        let f = formula(&["(", "price", "+", "tax", ")", "*", "qty"]);
        assert_eq!(f.source(), "(price+tax)*qty");
        assert_eq!(f.to_string(), f.source());
    }

    #[test]
    fn test_serde_as_string_array() {
        let f = formula(&["price", "*", "qty"]);
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, r#"["price","*","qty"]"#);
        let back: CompiledFormula = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn test_references_and_rename() {
        let mut f = formula(&["price", "*", "qty"]);
        assert_eq!(f.references().collect::<Vec<_>>(), vec!["price", "qty"]);
        assert!(f.references_field("qty"));

        f.rename_field("qty", "count");
        assert_eq!(f.source(), "price*count");
        assert!(!f.references_field("qty"));
    }
}
