// Test the document model: inference, column operations and sorting

use json_grid_wasm::coerce::{flatten, infer_schema, parse_list_input, unflatten};
use json_grid_wasm::models::{CellValue, Document, Row, SortDirection, TypeTag};
use json_grid_wasm::EditorError;
use serde_json::json;

fn rows(value: serde_json::Value) -> Vec<Row> {
    serde_json::from_value(value).expect("test rows should deserialize")
}

fn row(value: serde_json::Value) -> Row {
    serde_json::from_value(value).expect("test row should deserialize")
}

fn column_values(doc: &Document, column: &str) -> Vec<CellValue> {
    (0..doc.row_count())
        .map(|i| doc.cell(i, column).cloned().unwrap_or_default())
        .collect()
}

#[test]
fn test_infer_schema_from_first_values() {
    let schema = infer_schema(&rows(json!([{"a": 1, "b": "x"}, {"a": 2, "b": "y"}])));
    assert_eq!(schema.get("a"), Some(&TypeTag::Number));
    assert_eq!(schema.get("b"), Some(&TypeTag::Text));
}

#[test]
fn test_infer_schema_skips_nulls() {
    let schema = infer_schema(&rows(json!([{"a": null}, {"a": [1, 2]}])));
    assert_eq!(schema.get("a"), Some(&TypeTag::List));
}

#[test]
fn test_parse_list_input() {
    assert_eq!(
        parse_list_input("1, true, hello"),
        vec![CellValue::Number(1.0), CellValue::Boolean(true), CellValue::Text("hello".into())]
    );
}

#[test]
fn test_flatten_and_unflatten() {
    assert_eq!(flatten(&row(json!({"address": {"city": "X"}})), ""), row(json!({"address.city": "X"})));
    assert_eq!(unflatten(&row(json!({"address.city": "X"}))), row(json!({"address": {"city": "X"}})));
}

#[test]
fn test_delete_column() {
    let mut doc = Document::from_rows(rows(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}])), 100);
    assert!(doc.delete_column("b"));

    assert_eq!(doc.rows(), rows(json!([{"a": 1}, {"a": 3}])).as_slice());
    assert_eq!(doc.columns(), &["a".to_string()]);
    assert!(doc.schema().get("b").is_none());
}

#[test]
fn test_rename_does_not_create_keys() {
    let mut doc = Document::from_rows(rows(json!([{"x": 1}, {"z": 2}])), 100);
    assert_eq!(doc.rename_column("x", "y"), Ok(true));

    assert_eq!(doc.rows(), rows(json!([{"y": 1}, {"z": 2}])).as_slice());
    assert_eq!(doc.columns(), &["y".to_string(), "z".to_string()]);
    assert_eq!(doc.column_type("y"), TypeTag::Number);
}

#[test]
fn test_add_column_validation() {
    let mut doc = Document::from_rows(rows(json!([{"a": 1}])), 100);

    for bad in ["", "has space", "a"] {
        assert!(
            matches!(doc.add_column(bad, TypeTag::Text, CellValue::Null), Err(EditorError::Validation(_))),
            "column name {:?} should be rejected",
            bad
        );
    }
    assert_eq!(doc.columns(), &["a".to_string()], "failed adds must not change the columns");
}

#[test]
fn test_add_column_fills_default() {
    let mut doc = Document::from_rows(rows(json!([{"a": 1}, {"a": 2}])), 100);
    doc.add_column("done", TypeTag::Auto, CellValue::Boolean(false)).unwrap();

    assert_eq!(doc.column_type("done"), TypeTag::Boolean);
    assert_eq!(column_values(&doc, "done"), vec![CellValue::Boolean(false); 2]);
}

#[test]
fn test_reorder_must_be_permutation() {
    let mut doc = Document::from_rows(rows(json!([{"a": 1, "b": 2}])), 100);
    assert!(doc.reorder_columns(vec!["b".into()]).is_err());
    assert!(doc.reorder_columns(vec!["b".into(), "b".into()]).is_err());

    doc.reorder_columns(vec!["b".into(), "a".into()]).unwrap();
    assert_eq!(doc.columns(), &["b".to_string(), "a".to_string()]);
}

#[test]
fn test_sort_puts_nulls_last() {
    let data = rows(json!([{"n": "b"}, {"n": null}, {"n": "a"}]));
    let expected_asc = vec![CellValue::from("a"), CellValue::from("b"), CellValue::Null];
    let expected_desc = vec![CellValue::from("b"), CellValue::from("a"), CellValue::Null];

    let mut doc = Document::from_rows(data.clone(), 100);
    doc.sort("n", SortDirection::Ascending).unwrap();
    assert_eq!(column_values(&doc, "n"), expected_asc);

    let mut doc = Document::from_rows(data, 100);
    doc.sort("n", SortDirection::Descending).unwrap();
    assert_eq!(column_values(&doc, "n"), expected_desc);
}

#[test]
fn test_sort_is_stable() {
    let mut doc = Document::from_rows(
        rows(json!([{"k": "B", "i": 0}, {"k": "a", "i": 1}, {"k": "b", "i": 2}])),
        100,
    );
    doc.sort("k", SortDirection::Ascending).unwrap();
    assert_eq!(
        column_values(&doc, "i"),
        vec![CellValue::Number(1.0), CellValue::Number(0.0), CellValue::Number(2.0)]
    );
}

#[test]
fn test_column_changes_are_not_undone() {
    let mut doc = Document::from_rows(rows(json!([{"a": 1}])), 100);
    doc.add_column("b", TypeTag::Text, CellValue::Null).unwrap();
    doc.undo();

    assert_eq!(doc.rows(), rows(json!([{"a": 1}])).as_slice(), "row data reverts");
    assert_eq!(doc.columns(), &["a".to_string(), "b".to_string()], "the column set does not");
}

#[test]
fn test_added_row_with_new_keys_is_visible() {
    let mut doc = Document::from_rows(rows(json!([{"a": 1}])), 100);
    doc.add_row(row(json!({"a": 2, "tags": [1, 2]})));

    assert_eq!(doc.columns(), &["a".to_string(), "tags".to_string()]);
    assert_eq!(doc.column_type("tags"), TypeTag::List);
    assert_eq!(column_values(&doc, "tags"), vec![CellValue::Null, CellValue::from(json!([1, 2]))]);
}
