//! Document persistence
//!
//! A table round-trips through an opaque JSON document: the schema (with
//! formulas in compiled token form), the declared row count, and the raw row
//! values. Computed slots are serialized as cached values but are never
//! trusted on the way back in — loading recomputes every one of them, so a
//! document edited by hand (or written by an older build) cannot leave stale
//! derived values behind.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::table::Table;

impl Table {
    /// Serialize to the JSON document form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from the JSON document form, normalizing row widths and
    /// recomputing every computed slot.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut table: Table = serde_json::from_str(json)?;
        table.restore();
        Ok(table)
    }

    /// Save the table to a file as a JSON document.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load a table from a JSON document file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
