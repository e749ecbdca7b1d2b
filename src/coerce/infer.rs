//! Schema inference
//!
//! A column's type comes from the first row where it holds a non-null value.

use crate::models::schema::{Schema, TypeTag};
use crate::models::value::{CellValue, Row};

/// Classify a single sample value
pub fn infer_type(sample: &CellValue) -> TypeTag {
    match sample {
        CellValue::List(_) => TypeTag::List,
        CellValue::Object(_) => TypeTag::Object,
        CellValue::Boolean(_) => TypeTag::Boolean,
        CellValue::Number(_) => TypeTag::Number,
        CellValue::Text(_) | CellValue::Null => TypeTag::Text,
    }
}

/// Union of all row keys, in order of first appearance
pub fn infer_columns(rows: &[Row]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Infer a type for every column discovered in `rows`
pub fn infer_schema(rows: &[Row]) -> Schema {
    let columns = infer_columns(rows);
    infer_schema_for(&columns, rows)
}

/// Infer a type for each of `columns`; columns never holding a non-null
/// value default to text.
pub fn infer_schema_for(columns: &[String], rows: &[Row]) -> Schema {
    columns
        .iter()
        .map(|column| {
            let tag = rows
                .iter()
                .filter_map(|row| row.get(column))
                .find(|value| !value.is_null())
                .map_or(TypeTag::Text, infer_type);
            (column.clone(), tag)
        })
        .collect()
}
