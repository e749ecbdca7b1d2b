//! Shared types for the WASM API
//!
//! Result types handed back to JavaScript after an operation.

use serde::Serialize;

use crate::editor::{HostCommand, ViewSnapshot};

/// Result of an import
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub row_count: usize,
    pub columns: Vec<String>,
}

/// Result of an edit operation: whether anything changed, and the grid to
/// redraw
#[derive(Serialize, Clone, Debug)]
pub struct EditResult {
    pub changed: bool,
    pub view: ViewSnapshot,
}

/// Result of a key press
#[derive(Serialize, Clone, Debug)]
pub struct KeyResult {
    pub claimed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<HostCommand>,
    pub view: ViewSnapshot,
}
