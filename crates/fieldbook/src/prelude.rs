//! Prelude module - common imports for fieldbook users
//!
//! ```rust
//! use fieldbook::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellValue,
    // Formula types
    CompiledFormula,
    // I/O types
    CsvImporter,

    // Error types
    Error,
    // Field/schema types
    FieldSchema,
    FieldType,
    FormulaError,

    ImportOptions,
    Result,
    SchemaError,
    Sheet,
    // Main types
    Table,
    TableSchema,
};
