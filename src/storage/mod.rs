//! Persistence of the row data
//!
//! The editor keeps one snapshot of its rows in a key-value store. Only the
//! rows are stored; columns and schema are re-inferred on load. An empty
//! document removes the entry instead of storing `[]`, so a reload can tell
//! "never had data" from "cleared".

pub mod local;

pub use local::LocalStorage;

use crate::error::{EditorError, Result};
use crate::models::value::Row;

/// Storage adapter injected into the editor
pub trait Storage {
    /// Read the stored rows; `Ok(None)` when nothing is stored
    fn load(&self) -> Result<Option<Vec<Row>>>;

    fn save(&mut self, rows: &[Row]) -> Result<()>;

    fn clear(&mut self) -> Result<()>;
}

/// In-memory storage for tests and non-browser hosts. Holds the serialized
/// text, so it exercises the same encoding as browser storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    text: Option<String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with raw text (which need not be valid JSON)
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            fail_writes: false,
        }
    }

    /// Storage whose writes all fail, like a full quota
    pub fn failing() -> Self {
        Self {
            text: None,
            fail_writes: true,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<Row>>> {
        self.text.as_deref().map(decode_rows).transpose()
    }

    fn save(&mut self, rows: &[Row]) -> Result<()> {
        if self.fail_writes {
            return Err(EditorError::Persistence("quota exceeded".to_string()));
        }
        self.text = Some(encode_rows(rows)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.fail_writes {
            return Err(EditorError::Persistence("storage disabled".to_string()));
        }
        self.text = None;
        Ok(())
    }
}

pub(crate) fn encode_rows(rows: &[Row]) -> Result<String> {
    serde_json::to_string(rows).map_err(|e| EditorError::Persistence(e.to_string()))
}

pub(crate) fn decode_rows(text: &str) -> Result<Vec<Row>> {
    serde_json::from_str(text).map_err(|e| EditorError::Persistence(format!("stored rows unreadable: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_then_load() {
        let rows: Vec<Row> = serde_json::from_value(json!([{"a": 1, "b": [true]}])).unwrap();
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load(), Ok(None));

        storage.save(&rows).unwrap();
        assert_eq!(storage.load(), Ok(Some(rows)));

        storage.clear().unwrap();
        assert_eq!(storage.load(), Ok(None));
    }

    #[test]
    fn test_corrupt_text_is_persistence_error() {
        let storage = MemoryStorage::with_text("{not json");
        assert!(matches!(storage.load(), Err(EditorError::Persistence(_))));
    }

    #[test]
    fn test_failing_storage() {
        let mut storage = MemoryStorage::failing();
        assert!(storage.save(&[]).is_err());
        assert!(storage.clear().is_err());
    }
}
