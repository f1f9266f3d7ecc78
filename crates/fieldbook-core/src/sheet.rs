//! Sheet: the per-table grid of row values

use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// The in-memory grid of rows for one table.
///
/// Every row holds exactly one slot per field, addressed by column index.
/// Reads outside the populated region return [`CellValue::Empty`]; writes
/// grow the grid on demand. Column surgery (insert/remove/move) must be kept
/// in lock-step with the owning schema's field list — the facade `Table`
/// does that pairing.
///
/// Serializes as a bare array of row arrays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheet {
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from raw rows, padding or truncating every row to
    /// `columns` slots.
    pub fn from_rows(rows: Vec<Vec<CellValue>>, columns: usize) -> Self {
        let mut sheet = Self { rows };
        sheet.normalize(columns);
        sheet
    }

    /// Number of populated rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get one row's values, if populated
    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Iterate populated rows in order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Get a cell value; out-of-range reads are empty, not errors
    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&CellValue::Empty)
    }

    /// Set a cell value, growing the grid as needed.
    ///
    /// `columns` is the owning schema's field count; rows created to fill
    /// the gap get that many empty slots.
    pub fn set_value(&mut self, row: usize, col: usize, columns: usize, value: CellValue) {
        let width = columns.max(col + 1);
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, || vec![CellValue::Empty; width]);
        }
        let slots = &mut self.rows[row];
        if slots.len() < width {
            slots.resize(width, CellValue::Empty);
        }
        slots[col] = value;
    }

    /// Pad or truncate every row to exactly `columns` slots
    pub fn normalize(&mut self, columns: usize) {
        for row in &mut self.rows {
            row.resize(columns, CellValue::Empty);
        }
    }

    /// Insert an empty column at `col` in every row
    pub fn insert_column(&mut self, col: usize) {
        for row in &mut self.rows {
            let at = col.min(row.len());
            row.insert(at, CellValue::Empty);
        }
    }

    /// Remove the column at `col` from every row
    pub fn remove_column(&mut self, col: usize) {
        for row in &mut self.rows {
            if col < row.len() {
                row.remove(col);
            }
        }
    }

    /// Move a column from one position to another in every row
    pub fn move_column(&mut self, from: usize, to: usize) {
        for row in &mut self.rows {
            if from < row.len() && to < row.len() {
                let value = row.remove(from);
                row.insert(to, value);
            }
        }
    }

    /// Drop all rows
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_value_grows_grid() {
        let mut sheet = Sheet::new();
        sheet.set_value(2, 1, 3, CellValue::Number(7.0));

        assert_eq!(sheet.row_count(), 3);
        // Gap rows are fully empty and full width
        assert_eq!(sheet.row(0).unwrap().len(), 3);
        assert_eq!(sheet.value(0, 0), &CellValue::Empty);
        assert_eq!(sheet.value(2, 1), &CellValue::Number(7.0));
    }

    #[test]
    fn test_out_of_range_reads_are_empty() {
        let sheet = Sheet::from_rows(vec![vec![CellValue::Number(1.0)]], 1);
        assert_eq!(sheet.value(0, 5), &CellValue::Empty);
        assert_eq!(sheet.value(9, 0), &CellValue::Empty);
    }

    #[test]
    fn test_from_rows_normalizes_width() {
        let sheet = Sheet::from_rows(
            vec![
                vec![CellValue::Number(1.0)],
                vec![
                    CellValue::Number(2.0),
                    CellValue::Number(3.0),
                    CellValue::Number(4.0),
                ],
            ],
            2,
        );
        assert_eq!(sheet.row(0).unwrap().len(), 2);
        assert_eq!(sheet.row(1).unwrap().len(), 2);
        assert_eq!(sheet.value(0, 1), &CellValue::Empty);
    }

    #[test]
    fn test_column_surgery() {
        let mut sheet = Sheet::from_rows(
            vec![vec![CellValue::Number(1.0), CellValue::Number(2.0)]],
            2,
        );

        sheet.insert_column(1);
        assert_eq!(
            sheet.row(0).unwrap(),
            &[
                CellValue::Number(1.0),
                CellValue::Empty,
                CellValue::Number(2.0)
            ]
        );

        sheet.move_column(2, 0);
        assert_eq!(
            sheet.row(0).unwrap(),
            &[
                CellValue::Number(2.0),
                CellValue::Number(1.0),
                CellValue::Empty
            ]
        );

        sheet.remove_column(1);
        assert_eq!(
            sheet.row(0).unwrap(),
            &[CellValue::Number(2.0), CellValue::Empty]
        );
    }

    #[test]
    fn test_serde_transparent_rows() {
        let sheet = Sheet::from_rows(
            vec![vec![CellValue::Number(10.0), CellValue::Text("x".into())]],
            2,
        );
        let json = serde_json::to_string(&sheet).unwrap();
        assert_eq!(json, r#"[[10.0,"x"]]"#);
        let back: Sheet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sheet);
    }
}
