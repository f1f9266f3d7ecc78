//! Tests for CSV import into an editable table

use fieldbook::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Write;

const ORDERS_CSV: &str = "\
item,price,qty
widget,10,3
gadget,7,2
";

#[test]
fn test_import_builds_schema_and_sheet() {
    let table =
        Table::import_csv(ORDERS_CSV.as_bytes(), "orders", &ImportOptions::default()).unwrap();

    let schema = table.schema();
    assert_eq!(schema.table_name(), "orders");
    assert_eq!(schema.declared_rows(), 2);
    assert_eq!(schema.field(0).unwrap().field_type, FieldType::Text);
    assert_eq!(schema.field(1).unwrap().field_type, FieldType::Number);
    assert_eq!(schema.field(2).unwrap().field_type, FieldType::Number);

    assert_eq!(table.value(0, 0), &CellValue::Text("widget".into()));
    assert_eq!(table.value(1, 2), &CellValue::Number(2.0));
}

#[test]
fn test_import_then_add_calc_field() {
    let mut table =
        Table::import_csv(ORDERS_CSV.as_bytes(), "orders", &ImportOptions::default()).unwrap();

    table
        .add_field(FieldSchema::new("total", FieldType::Calc))
        .unwrap();
    table.set_formula("total", "price*qty").unwrap();

    assert_eq!(table.value(0, 3), &CellValue::Number(30.0));
    assert_eq!(table.value(1, 3), &CellValue::Number(14.0));

    // Editing an imported cell keeps the derived column live
    table.set_value(1, 2, "5").unwrap();
    assert_eq!(table.value(1, 3), &CellValue::Number(35.0));
}

#[test]
fn test_import_file_names_table_after_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"sku,count\nA-1,4\n").unwrap();
    drop(file);

    let table = Table::import_csv_file(&path).unwrap();
    assert_eq!(table.schema().table_name(), "inventory");
    assert_eq!(table.schema().field(1).unwrap().field_type, FieldType::Number);
    assert_eq!(table.value(0, 1), &CellValue::Number(4.0));
}

#[test]
fn test_mixed_column_imports_as_text() {
    let csv = "id\n1\ntwo\n3\n";
    let table = Table::import_csv(csv.as_bytes(), "t", &ImportOptions::default()).unwrap();
    assert_eq!(table.schema().field(0).unwrap().field_type, FieldType::Text);
    assert_eq!(table.value(0, 0), &CellValue::Text("1".into()));
}
