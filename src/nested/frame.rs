//! One editable grid: a document plus its focus state
//!
//! The root frame edits the imported rows. Nested frames edit a single
//! cell's object or list value as a grid of its own:
//!
//! - `Records`: a list whose elements are all objects; one row per element
//! - `Items`: any other list; one row per element in a single `value` column
//! - `Entries`: a plain object; one row per property in `key`/`value` columns

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::models::document::Document;
use crate::models::value::{CellValue, Row};
use crate::navigation::Navigator;

pub const KEY_COLUMN: &str = "key";
pub const VALUE_COLUMN: &str = "value";
const NEW_KEY_PREFIX: &str = "newKey";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NestedKind {
    Records,
    Items,
    Entries,
}

/// The parent cell a nested frame writes back to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NestedOrigin {
    pub row: usize,
    pub column: String,
    pub kind: NestedKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub document: Document,
    pub navigator: Navigator,
    pub origin: Option<NestedOrigin>,
}

impl Frame {
    pub fn root(document: Document) -> Self {
        let mut navigator = Navigator::new();
        navigator.sync(&document);
        Self {
            document,
            navigator,
            origin: None,
        }
    }

    /// Build a frame editing `value`, which lives at (`row`, `column`) of the
    /// parent frame
    pub fn nested(value: &CellValue, row: usize, column: &str, history_limit: usize) -> Result<Self> {
        let (kind, document) = match value {
            CellValue::List(items) if !items.is_empty() && items.iter().all(is_object) => {
                let rows = items
                    .iter()
                    .filter_map(|item| match item {
                        CellValue::Object(row) => Some(row.clone()),
                        _ => None,
                    })
                    .collect();
                (NestedKind::Records, Document::from_rows(rows, history_limit))
            }
            CellValue::List(items) => {
                let rows = items
                    .iter()
                    .map(|item| Row::from([(VALUE_COLUMN.to_string(), item.clone())]))
                    .collect();
                let columns = vec![VALUE_COLUMN.to_string()];
                (NestedKind::Items, Document::with_columns(columns, rows, history_limit))
            }
            CellValue::Object(object) => {
                let rows = object
                    .iter()
                    .map(|(key, value)| {
                        Row::from([
                            (KEY_COLUMN.to_string(), CellValue::Text(key.clone())),
                            (VALUE_COLUMN.to_string(), value.clone()),
                        ])
                    })
                    .collect();
                let columns = vec![KEY_COLUMN.to_string(), VALUE_COLUMN.to_string()];
                (NestedKind::Entries, Document::with_columns(columns, rows, history_limit))
            }
            _ => {
                return Err(EditorError::NotNested(format!(
                    "Cell ({}, {}) does not hold an object or list",
                    row, column
                )))
            }
        };

        let mut navigator = Navigator::new();
        navigator.sync(&document);
        Ok(Self {
            document,
            navigator,
            origin: Some(NestedOrigin {
                row,
                column: column.to_string(),
                kind,
            }),
        })
    }

    pub fn kind(&self) -> Option<NestedKind> {
        self.origin.as_ref().map(|o| o.kind)
    }

    /// Items and Entries grids have a fixed column layout
    pub fn has_fixed_columns(&self) -> bool {
        matches!(self.kind(), Some(NestedKind::Items | NestedKind::Entries))
    }

    /// Fail unless columns may be added, renamed, deleted or reordered here
    pub fn check_columns_editable(&self) -> Result<()> {
        if self.has_fixed_columns() {
            return Err(EditorError::Validation(
                "Columns of this nested editor cannot be changed".to_string(),
            ));
        }
        Ok(())
    }

    /// Rebuild the nested value from the frame's current rows. The root frame
    /// yields its rows as a list of objects.
    pub fn to_value(&self) -> CellValue {
        let rows = self.document.rows();
        match self.kind() {
            None | Some(NestedKind::Records) => {
                CellValue::List(rows.iter().cloned().map(CellValue::Object).collect())
            }
            Some(NestedKind::Items) => CellValue::List(
                rows.iter()
                    .map(|row| row.get(VALUE_COLUMN).cloned().unwrap_or_default())
                    .collect(),
            ),
            Some(NestedKind::Entries) => CellValue::Object(
                rows.iter()
                    .map(|row| {
                        let key = row.get(KEY_COLUMN).map(CellValue::display_text).unwrap_or_default();
                        let value = row.get(VALUE_COLUMN).cloned().unwrap_or_default();
                        (key, value)
                    })
                    .collect(),
            ),
        }
    }

    /// The row appended by "add row": nulls, or a fresh unique key for
    /// object entries
    pub fn blank_row(&self) -> Row {
        if self.kind() != Some(NestedKind::Entries) {
            return self.document.blank_row();
        }

        let taken: Vec<String> = self
            .document
            .rows()
            .iter()
            .filter_map(|row| row.get(KEY_COLUMN).map(CellValue::display_text))
            .collect();
        let key = (1..)
            .map(|n| {
                if n == 1 {
                    NEW_KEY_PREFIX.to_string()
                } else {
                    format!("{}{}", NEW_KEY_PREFIX, n)
                }
            })
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_default();

        Row::from([
            (KEY_COLUMN.to_string(), CellValue::Text(key)),
            (VALUE_COLUMN.to_string(), CellValue::Null),
        ])
    }

    /// Check a cell write before it is applied. Object keys must stay
    /// non-empty and unique.
    pub fn validate_write(&self, row: usize, column: &str, value: &CellValue) -> Result<()> {
        if self.kind() != Some(NestedKind::Entries) || column != KEY_COLUMN {
            return Ok(());
        }

        let key = value.display_text();
        if key.is_empty() {
            return Err(EditorError::Validation("Key cannot be empty".to_string()));
        }

        let duplicate = self
            .document
            .rows()
            .iter()
            .enumerate()
            .any(|(i, r)| i != row && r.get(KEY_COLUMN).map(CellValue::display_text).as_deref() == Some(key.as_str()));
        if duplicate {
            return Err(EditorError::Validation(format!("Key '{}' already exists", key)));
        }

        Ok(())
    }

    /// Check a whole row before it is appended. Object entries need a
    /// non-empty, unused key; list items hold exactly a `value`.
    pub fn validate_row(&self, row: &Row) -> Result<()> {
        match self.kind() {
            Some(NestedKind::Entries) => {
                let extra = row.keys().find(|k| *k != KEY_COLUMN && *k != VALUE_COLUMN);
                if let Some(extra) = extra {
                    return Err(EditorError::Validation(format!(
                        "Object entries only have '{}' and '{}', not '{}'",
                        KEY_COLUMN, VALUE_COLUMN, extra
                    )));
                }
                let key = row.get(KEY_COLUMN).cloned().unwrap_or_default();
                self.validate_write(self.document.row_count(), KEY_COLUMN, &key)
            }
            Some(NestedKind::Items) => {
                if row.len() != 1 || !row.contains_key(VALUE_COLUMN) {
                    return Err(EditorError::Validation(format!(
                        "List items hold exactly one '{}'",
                        VALUE_COLUMN
                    )));
                }
                Ok(())
            }
            None | Some(NestedKind::Records) => Ok(()),
        }
    }
}

fn is_object(value: &CellValue) -> bool {
    matches!(value, CellValue::Object(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(v: serde_json::Value) -> CellValue {
        CellValue::from(v)
    }

    #[test]
    fn test_list_of_objects_opens_as_records() {
        let frame = Frame::nested(&value(json!([{"a": 1}, {"b": 2}])), 0, "items", 100).unwrap();
        assert_eq!(frame.kind(), Some(NestedKind::Records));
        assert_eq!(frame.document.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(frame.to_value(), value(json!([{"a": 1}, {"b": 2}])));
    }

    #[test]
    fn test_mixed_list_opens_as_items() {
        let original = value(json!([1, {"a": 1}, [2]]));
        let frame = Frame::nested(&original, 0, "mixed", 100).unwrap();
        assert_eq!(frame.kind(), Some(NestedKind::Items));
        assert_eq!(frame.document.row_count(), 3);
        assert_eq!(frame.to_value(), original);
    }

    #[test]
    fn test_object_opens_as_key_value_entries() {
        let original = value(json!({"city": "X", "zip": 123}));
        let frame = Frame::nested(&original, 2, "address", 100).unwrap();

        assert_eq!(frame.kind(), Some(NestedKind::Entries));
        assert_eq!(frame.document.columns(), &["key".to_string(), "value".to_string()]);
        assert_eq!(frame.document.cell(1, "key"), Some(&CellValue::Text("zip".into())));
        assert_eq!(frame.to_value(), original);
    }

    #[test]
    fn test_renaming_key_keeps_position() {
        let mut frame = Frame::nested(&value(json!({"a": 1, "b": 2, "c": 3})), 0, "o", 100).unwrap();
        frame.document.update_cell(1, "key", "beta".into()).unwrap();
        assert_eq!(frame.to_value(), value(json!({"a": 1, "beta": 2, "c": 3})));

        match frame.to_value() {
            CellValue::Object(row) => {
                let keys: Vec<&str> = row.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["a", "beta", "c"]);
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_key_validation() {
        let frame = Frame::nested(&value(json!({"a": 1, "b": 2})), 0, "o", 100).unwrap();
        assert!(frame.validate_write(0, "key", &"b".into()).is_err());
        assert!(frame.validate_write(0, "key", &"".into()).is_err());
        assert!(frame.validate_write(0, "key", &"a".into()).is_ok());
        assert!(frame.validate_write(0, "value", &"".into()).is_ok());
    }

    #[test]
    fn test_blank_entry_gets_unique_key() {
        let mut frame = Frame::nested(&value(json!({"newKey": 1})), 0, "o", 100).unwrap();
        let row = frame.blank_row();
        assert_eq!(row.get("key"), Some(&CellValue::Text("newKey2".into())));
        frame.document.add_row(row);
        assert_eq!(frame.to_value(), value(json!({"newKey": 1, "newKey2": null})));
    }

    #[test]
    fn test_row_validation_by_kind() {
        let entries = Frame::nested(&value(json!({"a": 1})), 0, "o", 100).unwrap();
        let row = |v: serde_json::Value| -> Row { serde_json::from_value(v).unwrap() };
        assert!(entries.validate_row(&row(json!({"key": "b", "value": 2}))).is_ok());
        assert!(entries.validate_row(&row(json!({"key": "a", "value": 2}))).is_err());
        assert!(entries.validate_row(&row(json!({"value": 2}))).is_err());
        assert!(entries.validate_row(&row(json!({"key": "c", "other": 1}))).is_err());

        let items = Frame::nested(&value(json!([1, [2]])), 0, "l", 100).unwrap();
        assert!(items.validate_row(&row(json!({"value": 3}))).is_ok());
        assert!(items.validate_row(&row(json!({}))).is_err());
        assert!(items.validate_row(&row(json!({"value": 3, "x": 1}))).is_err());

        let records = Frame::nested(&value(json!([{"a": 1}])), 0, "r", 100).unwrap();
        assert!(records.validate_row(&row(json!({"z": 1}))).is_ok());
    }

    #[test]
    fn test_fixed_columns() {
        let entries = Frame::nested(&value(json!({})), 0, "o", 100).unwrap();
        assert!(entries.check_columns_editable().is_err());

        let records = Frame::nested(&value(json!([{"a": 1}])), 0, "o", 100).unwrap();
        assert!(records.check_columns_editable().is_ok());
    }

    #[test]
    fn test_primitive_cannot_be_opened() {
        assert!(matches!(
            Frame::nested(&CellValue::Number(1.0), 0, "n", 100),
            Err(EditorError::NotNested(_))
        ));
    }
}
