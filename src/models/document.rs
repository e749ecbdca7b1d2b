//! Document model
//!
//! A document is an ordered column set, a schema with one type per column,
//! and the rows themselves. Rows live inside a [`History`], so every row
//! change is one undo step. The column set and schema are kept alongside
//! and are not part of undo: undoing a column operation restores the row
//! data only.

use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::coerce::{infer_columns, infer_schema_for, infer_type};
use crate::error::{EditorError, Result};
use crate::models::schema::{validate_column_name, Schema, TypeTag};
use crate::models::value::{CellValue, Row};
use crate::undo::History;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    columns: Vec<String>,
    schema: Schema,
    history: History<Vec<Row>>,
}

impl Document {
    /// Create an empty document
    pub fn new(history_limit: usize) -> Self {
        Self {
            columns: Vec::new(),
            schema: Schema::new(),
            history: History::new(Vec::new(), history_limit),
        }
    }

    /// Create a document from rows, inferring columns and schema
    pub fn from_rows(rows: Vec<Row>, history_limit: usize) -> Self {
        let mut document = Self::new(history_limit);
        document.replace_rows(rows);
        document
    }

    /// Create a document with an explicit column set; the schema is still
    /// inferred from the rows.
    pub fn with_columns(columns: Vec<String>, rows: Vec<Row>, history_limit: usize) -> Self {
        let schema = infer_schema_for(&columns, &rows);
        Self {
            columns,
            schema,
            history: History::new(rows, history_limit),
        }
    }

    /// Swap in a whole new dataset. Columns and schema are re-derived and the
    /// undo history starts over from this baseline.
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.columns = infer_columns(&rows);
        self.schema = infer_schema_for(&self.columns, &rows);
        self.history.reset(rows);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        self.history.present()
    }

    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Type of a column; unknown columns are text
    pub fn column_type(&self, name: &str) -> TypeTag {
        self.schema.get(name).copied().unwrap_or_default()
    }

    /// Value at (row, column); `None` when the row lacks the key
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.rows().get(row).and_then(|r| r.get(column))
    }

    pub fn history(&self) -> &History<Vec<Row>> {
        &self.history
    }

    // ------------------------------------------------------------------
    // Column operations
    // ------------------------------------------------------------------

    /// Append a column and give every existing row `default` for it.
    ///
    /// `TypeTag::Auto` resolves to the type of `default` (text for null).
    pub fn add_column(&mut self, name: &str, tag: TypeTag, default: CellValue) -> Result<()> {
        validate_column_name(name, &self.columns, None)?;

        let tag = match tag {
            TypeTag::Auto if default.is_null() => TypeTag::Text,
            TypeTag::Auto => infer_type(&default),
            other => other,
        };

        self.columns.push(name.to_string());
        self.schema.insert(name.to_string(), tag);
        self.history.update(|rows| {
            rows.iter()
                .map(|row| {
                    let mut row = row.clone();
                    row.insert(name.to_string(), default.clone());
                    row
                })
                .collect()
        });

        debug!("added column '{}' ({})", name, tag.as_str());
        Ok(())
    }

    /// Remove a column from the column set, the schema and every row.
    /// Returns false when nothing changed.
    pub fn delete_column(&mut self, name: &str) -> bool {
        let had_column = self.column_index(name).is_some();
        self.columns.retain(|c| c != name);
        self.schema.shift_remove(name);

        let rows_changed = self.history.update(|rows| {
            rows.iter()
                .map(|row| {
                    let mut row = row.clone();
                    row.shift_remove(name);
                    row
                })
                .collect()
        });

        debug!("deleted column '{}'", name);
        had_column || rows_changed
    }

    /// Rename a column everywhere, keeping each row's key position. Rows
    /// without the old key do not gain the new one.
    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<bool> {
        let index = self
            .column_index(old)
            .ok_or_else(|| EditorError::ColumnNotFound(old.to_string()))?;
        validate_column_name(new, &self.columns, Some(old))?;

        if old == new {
            return Ok(false);
        }

        self.columns[index] = new.to_string();
        let tag = self.schema.shift_remove(old).unwrap_or_default();
        self.schema.insert(new.to_string(), tag);
        self.history
            .update(|rows| rows.iter().map(|row| rename_key(row, old, new)).collect());

        debug!("renamed column '{}' -> '{}'", old, new);
        Ok(true)
    }

    /// Replace the column order. `order` must be a permutation of the
    /// current column set.
    pub fn reorder_columns(&mut self, order: Vec<String>) -> Result<()> {
        let is_permutation = order.len() == self.columns.len()
            && self.columns.iter().all(|c| order.iter().filter(|o| *o == c).count() == 1);
        if !is_permutation {
            return Err(EditorError::Validation(format!(
                "Column order [{}] does not match the existing columns [{}]",
                order.join(", "),
                self.columns.join(", ")
            )));
        }

        self.columns = order;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Row operations
    // ------------------------------------------------------------------

    /// Write one cell. Returns false (and records no undo step) when the
    /// value is unchanged; a missing key counts as null.
    pub fn update_cell(&mut self, row: usize, column: &str, value: CellValue) -> Result<bool> {
        self.check_row(row)?;
        if self.column_index(column).is_none() {
            return Err(EditorError::ColumnNotFound(column.to_string()));
        }

        let unchanged = match self.cell(row, column) {
            Some(existing) => *existing == value,
            None => value.is_null(),
        };
        if unchanged {
            return Ok(false);
        }

        let mut rows = self.rows().to_vec();
        rows[row].insert(column.to_string(), value);
        Ok(self.history.set(rows))
    }

    /// Remove a row; later rows shift down by one
    pub fn delete_row(&mut self, row: usize) -> Result<Row> {
        self.check_row(row)?;

        let mut rows = self.rows().to_vec();
        let removed = rows.remove(row);
        self.history.set(rows);

        debug!("deleted row {}", row);
        Ok(removed)
    }

    /// Append a row. Keys the column set does not know yet become new
    /// columns, in the order they appear in the row.
    pub fn add_row(&mut self, row: Row) {
        for (key, value) in &row {
            if self.column_index(key).is_none() {
                self.columns.push(key.clone());
                self.schema.insert(key.clone(), infer_type(value));
            }
        }

        let mut rows = self.rows().to_vec();
        rows.push(row);
        self.history.set(rows);
    }

    /// A row holding null for every column
    pub fn blank_row(&self) -> Row {
        self.columns
            .iter()
            .map(|c| (c.clone(), CellValue::Null))
            .collect()
    }

    /// Stable sort by the lowercased text of a column. Null and missing
    /// values go last in both directions.
    pub fn sort(&mut self, column: &str, direction: SortDirection) -> Result<bool> {
        if self.column_index(column).is_none() {
            return Err(EditorError::ColumnNotFound(column.to_string()));
        }

        let mut rows = self.rows().to_vec();
        rows.sort_by(|a, b| {
            let (ka, kb) = (sort_key(a.get(column)), sort_key(b.get(column)));
            match (ka, kb) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => match direction {
                    SortDirection::Ascending => x.cmp(&y),
                    SortDirection::Descending => y.cmp(&x),
                },
            }
        });

        Ok(self.history.set(rows))
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn check_row(&self, row: usize) -> Result<()> {
        let len = self.row_count();
        if row >= len {
            return Err(EditorError::RowOutOfRange { index: row, len });
        }
        Ok(())
    }
}

fn sort_key(value: Option<&CellValue>) -> Option<String> {
    match value {
        None | Some(CellValue::Null) => None,
        Some(v) => Some(v.display_text().to_lowercase()),
    }
}

fn rename_key(row: &Row, old: &str, new: &str) -> Row {
    if !row.contains_key(old) {
        return row.clone();
    }
    row.iter()
        .filter(|(key, _)| key.as_str() != new)
        .map(|(key, value)| {
            let key = if key == old { new.to_string() } else { key.clone() };
            (key, value.clone())
        })
        .collect()
}
