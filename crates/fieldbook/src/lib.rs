//! # fieldbook
//!
//! A Rust library for user-defined tables: arbitrary per-table schemas,
//! computed fields driven by arithmetic formulas over sibling fields, and
//! CSV import with column type inference.
//!
//! ## Features
//!
//! - Dynamic schemas: text, number, date, boolean, email, select, and
//!   computed columns with per-type constraints
//! - A compiled formula language (`+ - * /` and parentheses over field
//!   names) evaluated by a real expression walker — no string splicing, no
//!   interpreter
//! - CSV import that infers numeric vs. text columns from the data
//! - JSON document persistence that recomputes derived values on load
//!
//! ## Example
//!
//! ```rust
//! use fieldbook::prelude::*;
//!
//! let mut schema = TableSchema::new("orders");
//! schema.add_field(FieldSchema::new("price", FieldType::Number)).unwrap();
//! schema.add_field(FieldSchema::new("qty", FieldType::Number)).unwrap();
//! schema.add_field(FieldSchema::new("total", FieldType::Calc)).unwrap();
//!
//! let mut table = Table::new(schema);
//! table.set_formula("total", "price*qty").unwrap();
//!
//! table.set_value(0, 0, "10").unwrap();
//! table.set_value(0, 1, "3").unwrap();
//! assert_eq!(table.display_value(0, 2), "30");
//! ```

pub mod document;
pub mod error;
pub mod prelude;
pub mod table;

pub use error::{Error, Result};
pub use table::Table;

// Re-export core types
pub use fieldbook_core::{
    parse_options, CellValue, CompiledFormula, FieldSchema, FieldType, FormulaOp, FormulaToken,
    SchemaError, Sheet, TableSchema,
};

// Re-export formula types
pub use fieldbook_formula::{compile, evaluate, tokenize, FormulaError, FormulaResult};

// Re-export I/O types
pub use fieldbook_csv::{infer_column_type, CsvImporter, ImportError, ImportOptions};
