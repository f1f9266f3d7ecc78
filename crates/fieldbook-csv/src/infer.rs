//! Column type inference
//!
//! Import-time typing uses a single signal: a column whose every non-empty
//! value parses as a number is numeric, anything else is text. Dates,
//! booleans, emails, and select lists are indistinguishable from free text
//! on samples alone, so they are never inferred — the user can retype the
//! column afterwards.

use fieldbook_core::FieldType;

/// Decide a column's field type from its sampled raw values.
///
/// `Number` iff every non-empty value parses as `f64`; otherwise `Text`
/// (with no length constraint inferred). A column with no values at all is
/// `Text`. Pure function.
pub fn infer_column_type<S: AsRef<str>>(values: &[S]) -> FieldType {
    let mut saw_number = false;
    for value in values {
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        if value.parse::<f64>().is_err() {
            return FieldType::Text;
        }
        saw_number = true;
    }
    if saw_number {
        FieldType::Number
    } else {
        FieldType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_numeric_infers_number() {
        assert_eq!(infer_column_type(&["1", "2", "3"]), FieldType::Number);
        assert_eq!(infer_column_type(&["1.5", "-2", "3e4"]), FieldType::Number);
    }

    #[test]
    fn test_mixed_infers_text() {
        assert_eq!(infer_column_type(&["1", "a", "3"]), FieldType::Text);
    }

    #[test]
    fn test_empty_column_infers_text() {
        assert_eq!(infer_column_type::<&str>(&[]), FieldType::Text);
        // A column of only blanks has no numeric evidence either
        assert_eq!(infer_column_type(&["", ""]), FieldType::Text);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        assert_eq!(infer_column_type(&["1", "", "3"]), FieldType::Number);
    }
}
