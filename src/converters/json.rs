//! JSON import and export
//!
//! Import accepts text whose top-level value is an array of objects; file
//! upload, paste and drag-drop all share this path. Export writes
//! pretty-printed JSON with two-space indentation.
//!
//! The two export paths differ on purpose and are kept explicit:
//! "export to file" unflattens dotted keys into nested objects, while
//! "copy to clipboard" writes the rows exactly as they are held.

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::unflatten;
use crate::error::{EditorError, Result};
use crate::models::value::{CellValue, Row};

/// Where imported text came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportSource {
    File,
    Clipboard,
    Drop,
}

/// Row shape written on export
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportShape {
    /// Dotted keys rebuilt into nested objects (file export)
    Unflattened,
    /// Rows as held (clipboard copy)
    Raw,
}

/// Parse import text into rows. Anything but an array of objects is a
/// ParseError.
pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_str(text)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(EditorError::Parse(format!(
                "expected an array at the top level, found {}",
                describe(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match CellValue::from(item) {
            CellValue::Object(row) => Ok(row),
            other => Err(EditorError::Parse(format!(
                "item {} is not an object ({})",
                index,
                describe(&Value::from(other))
            ))),
        })
        .collect()
}

/// Turn the result of a platform read into rows. A failed clipboard read is
/// a permission problem; a failed file or drop read is a parse problem.
pub fn read_import(source: ImportSource, read: std::result::Result<String, String>) -> Result<Vec<Row>> {
    let text = read.map_err(|reason| match source {
        ImportSource::Clipboard => EditorError::Permission(reason),
        ImportSource::File | ImportSource::Drop => {
            EditorError::Parse(format!("could not read the file: {}", reason))
        }
    })?;

    let rows = parse_rows(&text)?;
    info!("imported {} rows from {:?}", rows.len(), source);
    Ok(rows)
}

/// Serialize rows as pretty-printed JSON
pub fn serialize_rows(rows: &[Row], shape: ExportShape) -> Result<String> {
    let text = match shape {
        ExportShape::Raw => serde_json::to_string_pretty(rows)?,
        ExportShape::Unflattened => {
            let nested: Vec<Row> = rows.iter().map(unflatten).collect();
            serde_json::to_string_pretty(&nested)?
        }
    };
    Ok(text)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
