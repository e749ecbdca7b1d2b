//! Browser `window.localStorage` adapter

use crate::error::{EditorError, Result};
use crate::models::value::Row;

use super::{decode_rows, encode_rows, Storage};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    key: String,
}

impl LocalStorage {
    pub fn new(key: &str) -> Self {
        Self { key: key.to_string() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn store(&self) -> Result<web_sys::Storage> {
        let window = web_sys::window()
            .ok_or_else(|| EditorError::Persistence("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| EditorError::Persistence(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| EditorError::Persistence("localStorage disabled".to_string()))
    }
}

impl Storage for LocalStorage {
    fn load(&self) -> Result<Option<Vec<Row>>> {
        let text = self
            .store()?
            .get_item(&self.key)
            .map_err(|e| EditorError::Persistence(format!("read failed: {:?}", e)))?;
        text.as_deref().map(decode_rows).transpose()
    }

    fn save(&mut self, rows: &[Row]) -> Result<()> {
        let text = encode_rows(rows)?;
        self.store()?
            .set_item(&self.key, &text)
            .map_err(|e| EditorError::Persistence(format!("write failed: {:?}", e)))
    }

    fn clear(&mut self) -> Result<()> {
        self.store()?
            .remove_item(&self.key)
            .map_err(|e| EditorError::Persistence(format!("remove failed: {:?}", e)))
    }
}
