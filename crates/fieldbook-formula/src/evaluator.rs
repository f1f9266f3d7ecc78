//! Row evaluator
//!
//! Recursive descent over a compiled token sequence with the usual two
//! precedence levels (`*` `/` bind tighter than `+` `-`), left-to-right
//! associativity, and parentheses. Operands resolve against one row's values
//! through the schema's name→index map.
//!
//! There is no error channel: null (`None`) is the defined outcome for a
//! missing or non-numeric dependency, division by zero, a non-finite result,
//! or a token sequence that somehow escaped the compiler malformed. A
//! computed cell degrades to blank; it never takes the sheet down with it.

use fieldbook_core::{CellValue, CompiledFormula, FormulaOp, FormulaToken, TableSchema};

/// Evaluate a compiled formula against one row's values.
///
/// Pure function of its inputs: re-evaluating with the same row yields the
/// same result, and no state outside the row is read.
pub fn evaluate(
    formula: &CompiledFormula,
    schema: &TableSchema,
    row: &[CellValue],
) -> Option<f64> {
    let mut cursor = Cursor {
        tokens: formula.tokens(),
        pos: 0,
        schema,
        row,
    };
    let value = cursor.expression()?;
    // Trailing tokens mean the sequence was not a single expression
    if cursor.pos != cursor.tokens.len() {
        return None;
    }
    value.is_finite().then_some(value)
}

struct Cursor<'a> {
    tokens: &'a [FormulaToken],
    pos: usize,
    schema: &'a TableSchema,
    row: &'a [CellValue],
}

impl<'a> Cursor<'a> {
    fn peek_op(&self) -> Option<FormulaOp> {
        match self.tokens.get(self.pos) {
            Some(FormulaToken::Op(op)) => Some(*op),
            _ => None,
        }
    }

    /// expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Option<f64> {
        let mut left = self.term()?;
        loop {
            match self.peek_op() {
                Some(FormulaOp::Add) => {
                    self.pos += 1;
                    left += self.term()?;
                }
                Some(FormulaOp::Subtract) => {
                    self.pos += 1;
                    left -= self.term()?;
                }
                _ => return Some(left),
            }
        }
    }

    /// term := primary (('*' | '/') primary)*
    fn term(&mut self) -> Option<f64> {
        let mut left = self.primary()?;
        loop {
            match self.peek_op() {
                Some(FormulaOp::Multiply) => {
                    self.pos += 1;
                    left *= self.primary()?;
                }
                Some(FormulaOp::Divide) => {
                    self.pos += 1;
                    let right = self.primary()?;
                    if right == 0.0 {
                        return None;
                    }
                    left /= right;
                }
                _ => return Some(left),
            }
        }
    }

    /// primary := field | '(' expression ')'
    fn primary(&mut self) -> Option<f64> {
        match self.tokens.get(self.pos)? {
            FormulaToken::Field(name) => {
                self.pos += 1;
                self.resolve(name)
            }
            FormulaToken::Op(FormulaOp::OpenParen) => {
                self.pos += 1;
                let value = self.expression()?;
                match self.tokens.get(self.pos) {
                    Some(FormulaToken::Op(FormulaOp::CloseParen)) => {
                        self.pos += 1;
                        Some(value)
                    }
                    _ => None,
                }
            }
            FormulaToken::Op(_) => None,
        }
    }

    /// Look up an operand's current value in the row.
    fn resolve(&self, name: &str) -> Option<f64> {
        let col = self.schema.index_of(name)?;
        self.row.get(col)?.as_number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use fieldbook_core::{FieldSchema, FieldType};
    use pretty_assertions::assert_eq;

    fn schema() -> TableSchema {
        let mut schema = TableSchema::new("t");
        for name in ["a", "b", "c"] {
            schema
                .add_field(FieldSchema::new(name, FieldType::Number))
                .unwrap();
        }
        schema
    }

    fn eval(source: &str, row: &[CellValue]) -> Option<f64> {
        let schema = schema();
        let formula = compile(source, &schema).unwrap();
        evaluate(&formula, &schema, row)
    }

    fn nums(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|n| CellValue::Number(*n)).collect()
    }

    #[test]
    fn test_precedence() {
        // a+b*c with a=1, b=2, c=3
        assert_eq!(eval("a+b*c", &nums(&[1.0, 2.0, 3.0])), Some(7.0));
        assert_eq!(eval("(a+b)*c", &nums(&[1.0, 2.0, 3.0])), Some(9.0));
        assert_eq!(eval("a-b+c", &nums(&[10.0, 4.0, 1.0])), Some(7.0));
    }

    #[test]
    fn test_left_associative_division() {
        assert_eq!(eval("a/b/c", &nums(&[8.0, 2.0, 2.0])), Some(2.0));
    }

    #[test]
    fn test_division_by_zero_is_null() {
        assert_eq!(eval("a/b", &nums(&[4.0, 0.0])), None);
        // Even deep inside a larger expression
        assert_eq!(eval("c+a/(b-b)", &nums(&[4.0, 1.0, 2.0])), None);
    }

    #[test]
    fn test_missing_dependency_is_null() {
        let row = vec![CellValue::Number(1.0), CellValue::Empty];
        assert_eq!(eval("a+b", &row), None);
        // Short row (cells never populated) behaves the same
        assert_eq!(eval("a+c", &nums(&[1.0])), None);
    }

    #[test]
    fn test_non_numeric_dependency_is_null() {
        let row = vec![CellValue::Number(1.0), CellValue::Text("oops".into())];
        assert_eq!(eval("a+b", &row), None);
    }

    #[test]
    fn test_numeric_text_and_booleans_coerce() {
        let row = vec![CellValue::Text("4".into()), CellValue::Boolean(true)];
        assert_eq!(eval("a+b", &row), Some(5.0));
    }

    #[test]
    fn test_overflow_is_null() {
        assert_eq!(eval("a*b", &nums(&[f64::MAX, 2.0])), None);
    }

    #[test]
    fn test_idempotent() {
        let schema = schema();
        let formula = compile("a*b-c", &schema).unwrap();
        let row = nums(&[3.0, 4.0, 5.0]);
        let first = evaluate(&formula, &schema, &row);
        let second = evaluate(&formula, &schema, &row);
        assert_eq!(first, Some(7.0));
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_tokens_degrade_to_null() {
        use fieldbook_core::CompiledFormula;
        use fieldbook_core::FormulaToken;

        // Hand-built garbage the compiler would never emit
        let garbage = CompiledFormula::from_tokens(vec![
            FormulaToken::Field("a".to_string()),
            FormulaToken::Field("b".to_string()),
        ]);
        assert_eq!(evaluate(&garbage, &schema(), &nums(&[1.0, 2.0])), None);

        let empty = CompiledFormula::from_tokens(Vec::new());
        assert_eq!(evaluate(&empty, &schema(), &nums(&[1.0])), None);
    }
}
