//! Field schema definition and per-type value checks

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::formula::CompiledFormula;
use crate::value::CellValue;

/// Email shape check: local part, `@`, dotted domain
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Date fields store ISO dates (`2024-03-01`)
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The closed set of column types a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text, optionally length-limited
    Text,
    /// Floating-point numbers
    Number,
    /// ISO-8601 date
    Date,
    /// true/false
    Boolean,
    /// Email address
    Email,
    /// One value from a fixed option list
    Select,
    /// Computed from a formula over sibling fields; never edited directly
    Calc,
}

impl FieldType {
    /// Short name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Email => "email",
            FieldType::Select => "select",
            FieldType::Calc => "calc",
        }
    }
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Text
    }
}

/// Split raw comma-separated option text into the option list.
///
/// Each piece is trimmed of surrounding whitespace; pieces that trim to
/// nothing are dropped.
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Schema for a single column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Field name, unique within its table (formulas reference it verbatim)
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Maximum character count; meaningful only for `Text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Legal values; non-empty exactly when the type is `Select`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Compiled formula; present only for `Calc` fields whose latest source
    /// compiled cleanly. `None` on a `Calc` field means non-evaluable: every
    /// evaluation yields null until the formula is corrected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<CompiledFormula>,
}

impl FieldSchema {
    /// Create a field with no constraints
    pub fn new<S: Into<String>>(name: S, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            max_length: None,
            options: Vec::new(),
            formula: None,
        }
    }

    /// Builder-style max length (Text fields)
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Builder-style option list (Select fields)
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// True for computed fields
    pub fn is_calc(&self) -> bool {
        self.field_type == FieldType::Calc
    }

    /// Check the field definition itself (name and constraints).
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyFieldName);
        }
        if self.field_type == FieldType::Select && self.options.is_empty() {
            return Err(SchemaError::EmptyOptions(self.name.clone()));
        }
        if let Some(0) = self.max_length {
            return Err(SchemaError::InvalidConstraint {
                field: self.name.clone(),
                reason: "max length must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Drop constraints that do not apply to the current type.
    ///
    /// Called after a type change so a field cannot carry, say, a stale
    /// formula once it is no longer computed.
    pub fn clear_stale_constraints(&mut self) {
        if self.field_type != FieldType::Text {
            self.max_length = None;
        }
        if self.field_type != FieldType::Select {
            self.options.clear();
        }
        if self.field_type != FieldType::Calc {
            self.formula = None;
        }
    }

    /// Parse user-entered text into this field's value shape.
    ///
    /// Empty text clears the cell. Computed fields reject any input.
    pub fn parse_value(&self, raw: &str) -> Result<CellValue> {
        if self.is_calc() {
            return Err(SchemaError::CalcFieldReadOnly(self.name.clone()));
        }
        if raw.is_empty() {
            return Ok(CellValue::Empty);
        }

        let value = match self.field_type {
            FieldType::Number => {
                let n: f64 = raw.trim().parse().map_err(|_| {
                    SchemaError::invalid_value(&self.name, format!("'{}' is not a number", raw))
                })?;
                CellValue::Number(n)
            }
            FieldType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => CellValue::Boolean(true),
                "false" => CellValue::Boolean(false),
                _ => {
                    return Err(SchemaError::invalid_value(
                        &self.name,
                        format!("'{}' is not true or false", raw),
                    ))
                }
            },
            _ => CellValue::Text(raw.to_string()),
        };

        self.validate_value(&value)?;
        Ok(value)
    }

    /// Check a cell value against this field's type and constraints.
    ///
    /// Empty is always legal: blank cells are allowed in every column.
    pub fn validate_value(&self, value: &CellValue) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }

        match self.field_type {
            FieldType::Text => {
                let text = self.expect_text(value)?;
                if let Some(max) = self.max_length {
                    if text.chars().count() > max {
                        return Err(SchemaError::invalid_value(
                            &self.name,
                            format!("longer than {} characters", max),
                        ));
                    }
                }
            }
            FieldType::Number => {
                if !matches!(value, CellValue::Number(_)) {
                    return Err(self.type_mismatch(value));
                }
            }
            FieldType::Boolean => {
                if !matches!(value, CellValue::Boolean(_)) {
                    return Err(self.type_mismatch(value));
                }
            }
            FieldType::Date => {
                let text = self.expect_text(value)?;
                if NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).is_err() {
                    return Err(SchemaError::invalid_value(
                        &self.name,
                        format!("'{}' is not a YYYY-MM-DD date", text),
                    ));
                }
            }
            FieldType::Email => {
                let text = self.expect_text(value)?;
                if !EMAIL_RE.is_match(text.trim()) {
                    return Err(SchemaError::invalid_value(
                        &self.name,
                        format!("'{}' is not an email address", text),
                    ));
                }
            }
            FieldType::Select => {
                let text = self.expect_text(value)?;
                if !self.options.iter().any(|o| o == text) {
                    return Err(SchemaError::invalid_value(
                        &self.name,
                        format!("'{}' is not one of the options", text),
                    ));
                }
            }
            FieldType::Calc => {
                // Cached evaluator output; numeric by construction
                if !matches!(value, CellValue::Number(_)) {
                    return Err(self.type_mismatch(value));
                }
            }
        }

        Ok(())
    }

    fn expect_text<'v>(&self, value: &'v CellValue) -> Result<&'v str> {
        value.as_text().ok_or_else(|| self.type_mismatch(value))
    }

    fn type_mismatch(&self, value: &CellValue) -> SchemaError {
        SchemaError::invalid_value(
            &self.name,
            format!(
                "expected {} value, got {}",
                self.field_type.name(),
                value.type_name()
            ),
        )
    }
}
