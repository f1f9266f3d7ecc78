//! # fieldbook-formula
//!
//! Formula compiler and row evaluator for fieldbook computed fields.
//!
//! This crate provides:
//! - Formula compilation (source text → validated token sequence)
//! - Row evaluation (token sequence + row values → number or null)
//!
//! The formula language is deliberately small: field names combined with
//! `+ - * /` and parentheses, nothing else. Evaluation is a real expression
//! walk over tagged tokens — operand values are never spliced into text and
//! handed to an interpreter, so user-controlled cell contents cannot execute
//! anything.
//!
//! ## Example
//!
//! ```rust
//! use fieldbook_core::{CellValue, FieldSchema, FieldType, TableSchema};
//! use fieldbook_formula::{compile, evaluate};
//!
//! let mut schema = TableSchema::new("orders");
//! schema.add_field(FieldSchema::new("price", FieldType::Number)).unwrap();
//! schema.add_field(FieldSchema::new("qty", FieldType::Number)).unwrap();
//!
//! let formula = compile("price*qty", &schema).unwrap();
//! let row = vec![CellValue::Number(10.0), CellValue::Number(3.0)];
//! assert_eq!(evaluate(&formula, &schema, &row), Some(30.0));
//! ```

pub mod compiler;
pub mod error;
pub mod evaluator;

pub use compiler::{compile, tokenize};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::evaluate;
