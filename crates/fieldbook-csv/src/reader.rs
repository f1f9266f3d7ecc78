//! CSV importer

use std::fs::File;
use std::io::Read;
use std::path::Path;

use fieldbook_core::{CellValue, FieldSchema, FieldType, Sheet, TableSchema};

use crate::error::ImportResult;
use crate::infer::infer_column_type;
use crate::options::ImportOptions;

/// CSV import entry point.
///
/// Produces a [`TableSchema`] (one field per header, types inferred per
/// column) and a [`Sheet`] of the imported values coerced to those types.
/// The facade crate wraps the pair into an editable table.
pub struct CsvImporter;

impl CsvImporter {
    /// Import a CSV file; the table is named after the file stem.
    pub fn import_file<P: AsRef<Path>>(
        path: P,
        options: &ImportOptions,
    ) -> ImportResult<(TableSchema, Sheet)> {
        let path = path.as_ref();
        let table_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("imported");
        let file = File::open(path)?;
        Self::import(file, table_name, options)
    }

    /// Import CSV data from a reader.
    ///
    /// The first record names the columns. Ragged records are tolerated:
    /// short rows pad with empty cells, extra cells beyond the header are
    /// dropped.
    pub fn import<R: Read>(
        reader: R,
        table_name: &str,
        options: &ImportOptions,
    ) -> ImportResult<(TableSchema, Sheet)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

        let mut records: Vec<Vec<String>> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            records.push(record.iter().map(str::to_string).collect());
        }

        let mut fields = Vec::with_capacity(headers.len());
        for (col, name) in headers.iter().enumerate() {
            let column: Vec<&str> = records
                .iter()
                .map(|r| r.get(col).map(String::as_str).unwrap_or(""))
                .collect();
            fields.push(FieldSchema::new(name, infer_column_type(&column)));
        }

        let schema = TableSchema::with_fields(table_name, fields, records.len())?;

        let rows = records
            .iter()
            .map(|record| {
                schema
                    .fields()
                    .iter()
                    .enumerate()
                    .map(|(col, field)| {
                        let raw = record.get(col).map(String::as_str).unwrap_or("");
                        coerce(raw, field.field_type)
                    })
                    .collect()
            })
            .collect();
        let sheet = Sheet::from_rows(rows, schema.field_count());

        Ok((schema, sheet))
    }
}

/// Coerce one raw cell to the column's inferred type.
fn coerce(raw: &str, field_type: FieldType) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }
    match field_type {
        FieldType::Number => match raw.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            // Inference guarantees this parses; keep the text if it does not
            Err(_) => CellValue::Text(raw.to_string()),
        },
        _ => CellValue::Text(raw.to_string()),
    }
}
