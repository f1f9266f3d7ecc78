//! # fieldbook-core
//!
//! Core data structures for the fieldbook dynamic-table library.
//!
//! This crate provides the fundamental types used throughout fieldbook:
//! - [`CellValue`] - Raw values stored in table cells
//! - [`FieldType`] and [`FieldSchema`] - Per-column type and constraints
//! - [`TableSchema`] - The ordered field list for one table
//! - [`Sheet`] - The per-table grid of row values
//! - [`CompiledFormula`] - The validated token form of a computed-field formula
//!
//! ## Example
//!
//! ```rust
//! use fieldbook_core::{FieldSchema, FieldType, TableSchema};
//!
//! let mut schema = TableSchema::new("inventory");
//! schema.add_field(FieldSchema::new("price", FieldType::Number)).unwrap();
//! schema.add_field(FieldSchema::new("qty", FieldType::Number)).unwrap();
//!
//! assert_eq!(schema.index_of("qty"), Some(1));
//! ```

pub mod error;
pub mod field;
pub mod formula;
pub mod schema;
pub mod sheet;
pub mod value;

// Re-exports for convenience
pub use error::{Result, SchemaError};
pub use field::{parse_options, FieldSchema, FieldType};
pub use formula::{CompiledFormula, FormulaOp, FormulaToken};
pub use schema::TableSchema;
pub use sheet::Sheet;
pub use value::CellValue;
