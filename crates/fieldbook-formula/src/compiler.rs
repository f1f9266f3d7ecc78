//! Formula compiler
//!
//! Turns raw formula source into a validated [`CompiledFormula`]: tokenize on
//! the operator characters, check every operand against the table's field
//! set, then check the expression shape. Runs once at schema-edit time so
//! evaluation never has to re-parse text.

use fieldbook_core::{CompiledFormula, FormulaOp, FormulaToken, TableSchema};

use crate::error::{FormulaError, FormulaResult};

/// Split formula source into tokens.
///
/// Any maximal run of non-operator characters is one operand token, kept
/// verbatim — whitespace is not trimmed, so an operand only resolves if it
/// matches a field name exactly.
pub fn tokenize(source: &str) -> Vec<FormulaToken> {
    let mut tokens = Vec::new();
    let mut operand = String::new();

    for c in source.chars() {
        match FormulaOp::from_char(c) {
            Some(op) => {
                if !operand.is_empty() {
                    tokens.push(FormulaToken::Field(std::mem::take(&mut operand)));
                }
                tokens.push(FormulaToken::Op(op));
            }
            None => operand.push(c),
        }
    }
    if !operand.is_empty() {
        tokens.push(FormulaToken::Field(operand));
    }

    tokens
}

/// Compile formula source against the enclosing table's schema.
///
/// Rejects operands that are not non-computed fields of the table (a
/// computed field referencing another computed field, or itself, would need
/// a dependency order the single-pass evaluator does not have), unbalanced
/// parentheses, and any token adjacency that breaks strict operand/operator
/// alternation.
pub fn compile(source: &str, schema: &TableSchema) -> FormulaResult<CompiledFormula> {
    let tokens = tokenize(source);
    if tokens.is_empty() {
        return Err(FormulaError::EmptyFormula);
    }

    validate_operands(&tokens, schema)?;
    validate_shape(&tokens)?;

    Ok(CompiledFormula::from_tokens(tokens))
}

fn validate_operands(tokens: &[FormulaToken], schema: &TableSchema) -> FormulaResult<()> {
    for token in tokens {
        if let FormulaToken::Field(name) = token {
            match schema.field_by_name(name) {
                None => return Err(FormulaError::UnknownField(name.clone())),
                Some(field) if field.is_calc() => {
                    return Err(FormulaError::CalcReference(name.clone()))
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

/// Check paren balance and strict operand/operator alternation.
///
/// Walks the tokens tracking whether the next token must start a value
/// (an operand or `(`) or continue one (a binary operator or `)`).
fn validate_shape(tokens: &[FormulaToken]) -> FormulaResult<()> {
    let mut depth = 0usize;
    let mut expect_operand = true;

    for token in tokens {
        match token {
            FormulaToken::Field(name) => {
                if !expect_operand {
                    return Err(FormulaError::MalformedExpression(format!(
                        "operand '{}' follows another operand",
                        name
                    )));
                }
                expect_operand = false;
            }
            FormulaToken::Op(FormulaOp::OpenParen) => {
                if !expect_operand {
                    return Err(FormulaError::MalformedExpression(
                        "'(' follows an operand".to_string(),
                    ));
                }
                depth += 1;
            }
            FormulaToken::Op(FormulaOp::CloseParen) => {
                if expect_operand {
                    // Covers both "()" and an operator directly before ')'
                    return Err(FormulaError::MalformedExpression(
                        "')' follows an operator or empty group".to_string(),
                    ));
                }
                if depth == 0 {
                    return Err(FormulaError::UnbalancedParens);
                }
                depth -= 1;
            }
            FormulaToken::Op(op) => {
                if expect_operand {
                    return Err(FormulaError::MalformedExpression(format!(
                        "operator '{}' has no left operand",
                        op.symbol()
                    )));
                }
                expect_operand = true;
            }
        }
    }

    if depth != 0 {
        return Err(FormulaError::UnbalancedParens);
    }
    if expect_operand {
        return Err(FormulaError::MalformedExpression(
            "expression ends with an operator".to_string(),
        ));
    }

    Ok(())
}
