//! Table: schema + sheet with edit orchestration
//!
//! A [`Table`] pairs one [`TableSchema`] with its [`Sheet`] and keeps the two
//! consistent: column surgery stays in lock-step with the field list, and
//! every edit to a row recomputes that row's computed fields. It models the
//! single active edit session — there is no concurrent-writer handling here.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use fieldbook_core::{CellValue, FieldSchema, FieldType, SchemaError, Sheet, TableSchema};
use fieldbook_csv::{CsvImporter, ImportOptions};
use fieldbook_formula::{compile, evaluate};

use crate::error::Result;

/// One user-defined table: its schema and its grid of values.
///
/// Serializes as the flat document the persistence collaborator stores:
/// `{"tableName": ..., "numRows": ..., "fields": [...], "sheet": [[...]]}`.
/// Deserializing directly is possible but skips invariant repair — use
/// [`Table::from_json`](crate::Table::from_json) or
/// [`Table::load`](crate::Table::load), which normalize row widths and
/// recompute every computed slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(flatten)]
    schema: TableSchema,
    #[serde(default)]
    sheet: Sheet,
}

impl Table {
    /// Create an empty table around a schema
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            sheet: Sheet::new(),
        }
    }

    /// Pair a schema with an existing sheet, normalizing row widths and
    /// computing every computed slot.
    pub fn with_sheet(schema: TableSchema, mut sheet: Sheet) -> Self {
        sheet.normalize(schema.field_count());
        let mut table = Self { schema, sheet };
        table.recalculate();
        table
    }

    /// Import a CSV file into a new table named after the file stem.
    pub fn import_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (schema, sheet) = CsvImporter::import_file(path, &ImportOptions::default())?;
        Ok(Self::with_sheet(schema, sheet))
    }

    /// Import CSV data from a reader into a new table.
    pub fn import_csv<R: Read>(
        reader: R,
        table_name: &str,
        options: &ImportOptions,
    ) -> Result<Self> {
        let (schema, sheet) = CsvImporter::import(reader, table_name, options)?;
        Ok(Self::with_sheet(schema, sheet))
    }

    /// The table's schema
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// The table's sheet
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Set the table name
    pub fn set_table_name<S: Into<String>>(&mut self, name: S) {
        self.schema.set_table_name(name);
    }

    /// Set the number of rows the display renders
    pub fn set_declared_rows(&mut self, rows: usize) {
        self.schema.set_declared_rows(rows);
    }

    // === Cell edits ===

    /// Enter user text into a cell, then recompute the row's computed fields.
    ///
    /// The text is parsed and checked against the field's type and
    /// constraints; empty text clears the cell. Computed slots are read-only
    /// ([`SchemaError::CalcFieldReadOnly`]). On error nothing changes.
    pub fn set_value(&mut self, row: usize, col: usize, raw: &str) -> Result<()> {
        let field = self
            .schema
            .field(col)
            .ok_or(SchemaError::ColumnOutOfBounds(col, self.schema.field_count()))?;
        let value = field.parse_value(raw)?;
        self.sheet
            .set_value(row, col, self.schema.field_count(), value);
        self.recompute_row(row);
        Ok(())
    }

    /// Get a cell's stored value (cached output for computed fields)
    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        self.sheet.value(row, col)
    }

    /// The value to render for a cell: the raw value for regular fields, the
    /// evaluator's cached output for computed fields, empty for null and for
    /// rows beyond the populated sheet.
    pub fn display_value(&self, row: usize, col: usize) -> String {
        self.sheet.value(row, col).to_string()
    }

    // === Schema edits (sheet kept in lock-step) ===

    /// Append a field; every row gains an empty slot.
    pub fn add_field(&mut self, field: FieldSchema) -> Result<usize> {
        let has_formula = field.formula.is_some();
        let position = self.schema.add_field(field)?;
        self.sheet.insert_column(position);
        if has_formula {
            self.recalculate();
        }
        Ok(position)
    }

    /// Remove a field and its column of values.
    ///
    /// Computed fields whose formulas referenced it degrade to non-evaluable;
    /// their cached slots clear on the recompute.
    pub fn remove_field(&mut self, name: &str) -> Result<()> {
        let position = self.schema.remove_field(name)?;
        self.sheet.remove_column(position);
        self.recalculate();
        Ok(())
    }

    /// Move a field (and its column of values) to a new position.
    pub fn move_field(&mut self, from: usize, to: usize) -> Result<()> {
        self.schema.move_field(from, to)?;
        self.sheet.move_column(from, to);
        Ok(())
    }

    /// Rename a field, re-pointing formulas that referenced it.
    pub fn rename_field(&mut self, old: &str, new: &str) -> Result<()> {
        self.schema.rename_field(old, new)?;
        Ok(())
    }

    /// Change a field's type. Stale constraints drop with it; a field leaving
    /// `Calc` keeps its cached numbers as ordinary (now editable) values.
    pub fn set_field_type(&mut self, name: &str, field_type: FieldType) -> Result<()> {
        self.schema.set_field_type(name, field_type)?;
        self.recalculate();
        Ok(())
    }

    /// Set a select field's options from raw comma-separated text.
    pub fn set_options(&mut self, name: &str, raw: &str) -> Result<()> {
        self.schema.set_options(name, raw)?;
        Ok(())
    }

    /// Set or clear a text field's maximum length.
    pub fn set_max_length(&mut self, name: &str, max_length: Option<usize>) -> Result<()> {
        self.schema.set_max_length(name, max_length)?;
        Ok(())
    }

    /// Compile formula source for a computed field and store the result.
    ///
    /// On compile failure the field is still saved — with no formula, so it
    /// evaluates to null everywhere — and the error is returned for the
    /// caller to surface next to the field editor.
    pub fn set_formula(&mut self, name: &str, source: &str) -> Result<()> {
        // Reject non-calc targets before compiling against the schema
        let field = self
            .schema
            .field_by_name(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        if !field.is_calc() {
            return Err(SchemaError::NotCalc(name.to_string()).into());
        }

        match compile(source, &self.schema) {
            Ok(formula) => {
                self.schema.set_formula(name, Some(formula))?;
                self.recalculate();
                Ok(())
            }
            Err(e) => {
                self.schema.set_formula(name, None)?;
                self.recalculate();
                Err(e.into())
            }
        }
    }

    // === Recomputation ===

    /// Recompute every computed slot of one row.
    ///
    /// Deliberately recomputes all of the row's computed fields, not just
    /// the ones that reference the edited column: evaluation is pure and
    /// row-local, so the over-approximation costs microseconds.
    pub fn recompute_row(&mut self, row: usize) {
        if self.sheet.row(row).is_none() {
            return;
        }
        let updates: Vec<(usize, CellValue)> = self
            .schema
            .calc_fields()
            .map(|(col, field)| {
                let result = match (&field.formula, self.sheet.row(row)) {
                    (Some(formula), Some(values)) => evaluate(formula, &self.schema, values),
                    _ => None,
                };
                (col, result.map(CellValue::Number).unwrap_or(CellValue::Empty))
            })
            .collect();
        let columns = self.schema.field_count();
        for (col, value) in updates {
            self.sheet.set_value(row, col, columns, value);
        }
    }

    /// Recompute every computed slot of every populated row.
    ///
    /// Rows are independent (formulas cannot cross rows), so order does not
    /// matter.
    pub fn recalculate(&mut self) {
        for row in 0..self.sheet.row_count() {
            self.recompute_row(row);
        }
    }

    /// Normalize row widths and recompute; used after deserializing a
    /// document so cached computed slots can never be stale.
    pub(crate) fn restore(&mut self) {
        self.sheet.normalize(self.schema.field_count());
        self.recalculate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn orders() -> Table {
        let mut schema = TableSchema::new("orders");
        schema
            .add_field(FieldSchema::new("price", FieldType::Number))
            .unwrap();
        schema
            .add_field(FieldSchema::new("qty", FieldType::Number))
            .unwrap();
        schema
            .add_field(FieldSchema::new("total", FieldType::Calc))
            .unwrap();
        let mut table = Table::new(schema);
        table.set_formula("total", "price*qty").unwrap();
        table
    }

    #[test]
    fn test_edit_recomputes_row() {
        let mut table = orders();
        table.set_value(0, 0, "10").unwrap();
        // qty still missing: total stays null
        assert_eq!(table.value(0, 2), &CellValue::Empty);

        table.set_value(0, 1, "3").unwrap();
        assert_eq!(table.value(0, 2), &CellValue::Number(30.0));

        table.set_value(0, 1, "5").unwrap();
        assert_eq!(table.value(0, 2), &CellValue::Number(50.0));
        // The edited column's neighbor is untouched
        assert_eq!(table.value(0, 0), &CellValue::Number(10.0));
    }

    #[test]
    fn test_calc_slot_is_read_only() {
        let mut table = orders();
        let err = table.set_value(0, 2, "99").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Schema(SchemaError::CalcFieldReadOnly(_))
        ));
    }

    #[test]
    fn test_rows_are_independent() {
        let mut table = orders();
        table.set_value(0, 0, "10").unwrap();
        table.set_value(0, 1, "3").unwrap();
        table.set_value(1, 0, "7").unwrap();
        table.set_value(1, 1, "2").unwrap();

        table.set_value(1, 1, "4").unwrap();
        assert_eq!(table.value(0, 2), &CellValue::Number(30.0));
        assert_eq!(table.value(1, 2), &CellValue::Number(28.0));
    }

    #[test]
    fn test_failed_compile_saves_field_non_evaluable() {
        let mut table = orders();
        table.set_value(0, 0, "10").unwrap();
        table.set_value(0, 1, "3").unwrap();
        assert_eq!(table.value(0, 2), &CellValue::Number(30.0));

        // Bad source: the field survives but its slots go null
        assert!(table.set_formula("total", "price*oops").is_err());
        assert!(table.schema.field_by_name("total").unwrap().formula.is_none());
        assert_eq!(table.value(0, 2), &CellValue::Empty);

        // Correcting the formula brings the value back
        table.set_formula("total", "price+qty").unwrap();
        assert_eq!(table.value(0, 2), &CellValue::Number(13.0));
    }

    #[test]
    fn test_remove_dependency_degrades_to_null() {
        let mut table = orders();
        table.set_value(0, 0, "10").unwrap();
        table.set_value(0, 1, "3").unwrap();

        table.remove_field("qty").unwrap();
        assert_eq!(table.schema.field_count(), 2);
        // total moved left one column and is now null
        assert_eq!(table.value(0, 1), &CellValue::Empty);
        assert_eq!(table.value(0, 0), &CellValue::Number(10.0));
    }

    #[test]
    fn test_move_field_keeps_values_aligned() {
        let mut table = orders();
        table.set_value(0, 0, "10").unwrap();
        table.set_value(0, 1, "3").unwrap();

        table.move_field(0, 1).unwrap();
        assert_eq!(table.schema.index_of("price"), Some(1));
        assert_eq!(table.value(0, 1), &CellValue::Number(10.0));
        assert_eq!(table.value(0, 0), &CellValue::Number(3.0));
        // Formula still resolves by name after the shuffle
        table.set_value(0, 0, "4").unwrap();
        assert_eq!(table.value(0, 2), &CellValue::Number(40.0));
    }

    #[test]
    fn test_retype_away_from_calc_unlocks_slot() {
        let mut table = orders();
        table.set_value(0, 0, "10").unwrap();
        table.set_value(0, 1, "3").unwrap();

        table.set_field_type("total", FieldType::Number).unwrap();
        // Cached 30 is now an ordinary editable number
        assert_eq!(table.value(0, 2), &CellValue::Number(30.0));
        table.set_value(0, 2, "99").unwrap();
        assert_eq!(table.value(0, 2), &CellValue::Number(99.0));
    }

    #[test]
    fn test_display_values() {
        let mut table = orders();
        table.set_table_name("renamed");
        table.set_declared_rows(5);
        table.set_value(0, 0, "10").unwrap();
        table.set_value(0, 1, "3").unwrap();

        assert_eq!(table.display_value(0, 2), "30");
        // Unpopulated declared rows render empty
        assert_eq!(table.display_value(4, 0), "");
        assert_eq!(table.schema().table_name(), "renamed");
    }

    #[test]
    fn test_validation_blocks_bad_values() {
        let mut schema = TableSchema::new("people");
        schema
            .add_field(FieldSchema::new("email", FieldType::Email))
            .unwrap();
        let mut table = Table::new(schema);

        assert!(table.set_value(0, 0, "not-an-email").is_err());
        assert!(table.set_value(0, 0, "a@example.com").is_ok());
        // Clearing is always allowed
        assert!(table.set_value(0, 0, "").is_ok());
        assert_eq!(table.value(0, 0), &CellValue::Empty);
    }
}
