//! Editor configuration
//!
//! Settings arrive from the page as an optional JSON string. Every field has a
//! default, so `{}` (or no settings at all) gives the stock editor.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 8;
pub const DEFAULT_STORAGE_KEY: &str = "json-grid-editor:rows";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "data.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept per grid
    pub history_limit: usize,

    /// Maximum number of nested editors open at once
    pub max_nesting_depth: usize,

    /// localStorage key holding the persisted rows
    pub storage_key: String,

    /// File name offered for "export to file"
    pub export_file_name: String,

    /// Use Meta (Cmd) instead of Ctrl as the primary shortcut modifier
    pub mac_shortcuts: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            mac_shortcuts: false,
        }
    }
}

impl EditorConfig {
    /// Parse settings JSON, falling back to defaults for `None`
    pub fn from_json(settings_json: Option<&str>) -> Result<Self> {
        let config = match settings_json {
            Some(text) if !text.trim().is_empty() => serde_json::from_str::<EditorConfig>(text)
                .map_err(|e| EditorError::Validation(format!("Invalid editor settings: {}", e)))?,
            _ => EditorConfig::default(),
        };

        if config.storage_key.is_empty() {
            return Err(EditorError::Validation(
                "Invalid editor settings: storage_key must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}
