//! Table-level schema: the ordered field list

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::field::{parse_options, FieldSchema, FieldType};
use crate::formula::CompiledFormula;

/// Schema for one table: name, ordered fields, and the declared row count.
///
/// Field order is significant — it defines column position and the indexing
/// of every row's value array. A name→index map is kept alongside the field
/// list (and rebuilt on every mutation) so formula operands resolve in O(1).
///
/// All mutating operations validate first; on error the schema is unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TableSchemaDoc")]
pub struct TableSchema {
    table_name: String,

    /// Rows the display renders, independent of how many rows hold data
    #[serde(rename = "numRows")]
    declared_rows: usize,

    fields: Vec<FieldSchema>,

    #[serde(skip)]
    index: AHashMap<String, usize>,
}

/// Wire shape of a schema; deserialization funnels through this so the
/// name→index map is always rebuilt and name invariants re-checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableSchemaDoc {
    #[serde(default)]
    table_name: String,
    #[serde(rename = "numRows", default)]
    declared_rows: usize,
    #[serde(default)]
    fields: Vec<FieldSchema>,
}

impl TryFrom<TableSchemaDoc> for TableSchema {
    type Error = SchemaError;

    fn try_from(doc: TableSchemaDoc) -> Result<TableSchema> {
        TableSchema::with_fields(doc.table_name, doc.fields, doc.declared_rows)
    }
}

impl TableSchema {
    /// Create an empty schema
    pub fn new<S: Into<String>>(table_name: S) -> Self {
        Self {
            table_name: table_name.into(),
            declared_rows: 0,
            fields: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Create a schema from a full field list.
    ///
    /// Rejects empty or duplicate field names; other per-field constraints
    /// are checked when fields are edited, so a document saved mid-edit
    /// (e.g. a select field whose options are not entered yet) still loads.
    pub fn with_fields<S: Into<String>>(
        table_name: S,
        fields: Vec<FieldSchema>,
        declared_rows: usize,
    ) -> Result<Self> {
        let mut index = AHashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if index.insert(field.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateFieldName(field.name.clone()));
            }
        }
        Ok(Self {
            table_name: table_name.into(),
            declared_rows,
            fields,
            index,
        })
    }

    // === Accessors ===

    /// Get the table name
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Set the table name
    pub fn set_table_name<S: Into<String>>(&mut self, name: S) {
        self.table_name = name.into();
    }

    /// Number of rows the display renders
    pub fn declared_rows(&self) -> usize {
        self.declared_rows
    }

    /// Set the declared row count
    pub fn set_declared_rows(&mut self, rows: usize) {
        self.declared_rows = rows;
    }

    /// The ordered field list
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Number of fields (columns)
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Get a field by column index
    pub fn field(&self, index: usize) -> Option<&FieldSchema> {
        self.fields.get(index)
    }

    /// Get a field by name
    pub fn field_by_name(&self, name: &str) -> Option<&FieldSchema> {
        self.index_of(name).map(|i| &self.fields[i])
    }

    /// Column index of a field name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterate the computed fields with their column indices
    pub fn calc_fields(&self) -> impl Iterator<Item = (usize, &FieldSchema)> {
        self.fields.iter().enumerate().filter(|(_, f)| f.is_calc())
    }

    // === Field mutations ===

    /// Append a field; returns its column index.
    pub fn add_field(&mut self, field: FieldSchema) -> Result<usize> {
        field.validate()?;
        if self.index.contains_key(&field.name) {
            return Err(SchemaError::DuplicateFieldName(field.name));
        }
        let position = self.fields.len();
        self.index.insert(field.name.clone(), position);
        self.fields.push(field);
        Ok(position)
    }

    /// Remove a field by name; returns the column index it occupied.
    ///
    /// Any computed field whose formula referenced the removed field loses
    /// its formula and degrades to non-evaluable, the same state as a failed
    /// compile.
    pub fn remove_field(&mut self, name: &str) -> Result<usize> {
        let position = self
            .index_of(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        self.fields.remove(position);
        for field in &mut self.fields {
            if field
                .formula
                .as_ref()
                .is_some_and(|f| f.references_field(name))
            {
                field.formula = None;
            }
        }
        self.rebuild_index();
        Ok(position)
    }

    /// Move a field from one column position to another.
    pub fn move_field(&mut self, from: usize, to: usize) -> Result<()> {
        let count = self.fields.len();
        if from >= count {
            return Err(SchemaError::ColumnOutOfBounds(from, count));
        }
        if to >= count {
            return Err(SchemaError::ColumnOutOfBounds(to, count));
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        self.rebuild_index();
        Ok(())
    }

    /// Rename a field, re-pointing every compiled formula that referenced it.
    ///
    /// Fails if the new name is empty or already names another field.
    pub fn rename_field(&mut self, old: &str, new: &str) -> Result<()> {
        if new.is_empty() {
            return Err(SchemaError::EmptyFieldName);
        }
        let position = self
            .index_of(old)
            .ok_or_else(|| SchemaError::UnknownField(old.to_string()))?;
        if new == old {
            return Ok(());
        }
        if self.index.contains_key(new) {
            return Err(SchemaError::DuplicateFieldName(new.to_string()));
        }
        self.fields[position].name = new.to_string();
        for field in &mut self.fields {
            if let Some(formula) = field.formula.as_mut() {
                formula.rename_field(old, new);
            }
        }
        self.rebuild_index();
        Ok(())
    }

    /// Change a field's type, discarding constraints that no longer apply
    /// (options when leaving `Select`, the formula when leaving `Calc`, the
    /// max length when leaving `Text`).
    pub fn set_field_type(&mut self, name: &str, field_type: FieldType) -> Result<()> {
        let field = self.field_mut(name)?;
        field.field_type = field_type;
        field.clear_stale_constraints();
        Ok(())
    }

    /// Set a select field's options from raw comma-separated text.
    pub fn set_options(&mut self, name: &str, raw: &str) -> Result<()> {
        let options = parse_options(raw);
        let field = self.field_mut(name)?;
        if field.field_type != FieldType::Select {
            return Err(SchemaError::InvalidConstraint {
                field: field.name.clone(),
                reason: "options apply only to select fields".to_string(),
            });
        }
        if options.is_empty() {
            return Err(SchemaError::EmptyOptions(field.name.clone()));
        }
        field.options = options;
        Ok(())
    }

    /// Set or clear a text field's maximum length.
    pub fn set_max_length(&mut self, name: &str, max_length: Option<usize>) -> Result<()> {
        let field = self.field_mut(name)?;
        if field.field_type != FieldType::Text {
            return Err(SchemaError::InvalidConstraint {
                field: field.name.clone(),
                reason: "max length applies only to text fields".to_string(),
            });
        }
        if max_length == Some(0) {
            return Err(SchemaError::InvalidConstraint {
                field: field.name.clone(),
                reason: "max length must be positive".to_string(),
            });
        }
        field.max_length = max_length;
        Ok(())
    }

    /// Store (or clear) a computed field's compiled formula.
    ///
    /// The compiler in `fieldbook-formula` produces the `CompiledFormula`;
    /// storing `None` marks the field non-evaluable.
    pub fn set_formula(&mut self, name: &str, formula: Option<CompiledFormula>) -> Result<()> {
        let field = self.field_mut(name)?;
        if !field.is_calc() {
            return Err(SchemaError::NotCalc(field.name.clone()));
        }
        field.formula = formula;
        Ok(())
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut FieldSchema> {
        let position = self
            .index_of(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        Ok(&mut self.fields[position])
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, field) in self.fields.iter().enumerate() {
            self.index.insert(field.name.clone(), i);
        }
    }
}
