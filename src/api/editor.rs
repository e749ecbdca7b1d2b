//! `JsonGridEditor`: the JavaScript-facing editor class
//!
//! One instance owns the whole editing session. The page forwards key
//! events, pointer actions and platform I/O results here, and redraws from
//! the returned view.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, js_error, serialize, validation_error};
use crate::api::types::{EditResult, ImportResult, KeyResult};
use crate::config::EditorConfig;
use crate::converters::json::ImportSource;
use crate::editor::EditorState;
use crate::models::document::SortDirection;
use crate::models::schema::TypeTag;
use crate::models::value::{CellValue, Row};
use crate::navigation::{Key, KeyContext, KeyPress, Modifiers};
use crate::storage::LocalStorage;
use crate::{wasm_info, wasm_log};

#[wasm_bindgen]
pub struct JsonGridEditor {
    state: EditorState<LocalStorage>,
}

#[wasm_bindgen]
impl JsonGridEditor {
    /// Create an editor, restoring rows saved in localStorage.
    /// `config_json` is an optional JSON object of editor settings.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<JsonGridEditor, JsValue> {
        let config = EditorConfig::from_json(config_json.as_deref()).map_err(js_error)?;
        let storage = LocalStorage::new(&config.storage_key);
        let state = EditorState::new(config, storage);

        wasm_info!(
            "JsonGridEditor created with {} rows",
            state.root_document().row_count()
        );
        Ok(JsonGridEditor { state })
    }

    /// Import JSON text. `source` is "file", "clipboard" or "drop".
    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, text: &str, source: &str) -> Result<JsValue, JsValue> {
        let source = parse_source(source)?;
        let row_count = self
            .state
            .import(source, Ok(text.to_string()))
            .map_err(js_error)?;

        wasm_info!("importJson: {} rows ({} bytes)", row_count, text.len());
        serialize(
            &ImportResult {
                row_count,
                columns: self.state.root_document().columns().to_vec(),
            },
            "ImportResult serialization error",
        )
    }

    /// Report a failed platform read (clipboard permission denied, unreadable
    /// file). Always throws: PermissionError for the clipboard, ParseError
    /// otherwise.
    #[wasm_bindgen(js_name = importFailed)]
    pub fn import_failed(&mut self, source: &str, reason: &str) -> Result<(), JsValue> {
        let source = parse_source(source)?;
        self.state
            .import(source, Err(reason.to_string()))
            .map(|_| ())
            .map_err(js_error)
    }

    /// Pretty-printed JSON for "export to file", with dotted keys nested
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.state.export_json().map_err(js_error)
    }

    /// Pretty-printed JSON for the clipboard, rows as held
    #[wasm_bindgen(js_name = copyJson)]
    pub fn copy_json(&self) -> Result<String, JsValue> {
        self.state.copy_json().map_err(js_error)
    }

    #[wasm_bindgen(js_name = exportFileName)]
    pub fn export_file_name(&self) -> String {
        self.state.config().export_file_name.clone()
    }

    #[wasm_bindgen(js_name = clearWorkspace)]
    pub fn clear_workspace(&mut self) -> Result<JsValue, JsValue> {
        self.state.clear_workspace();
        self.edit_result(true)
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Add a column. `type_tag` is one of text, number, boolean, list,
    /// object, auto; `default_value` is any JSON value (undefined = null).
    #[wasm_bindgen(js_name = addColumn)]
    pub fn add_column(&mut self, name: &str, type_tag: &str, default_value: JsValue) -> Result<JsValue, JsValue> {
        let tag = TypeTag::parse(type_tag)
            .ok_or_else(|| validation_error(format!("Unknown column type '{}'", type_tag)))?;
        let default = to_cell_value(default_value)?;

        self.state.add_column(name, tag, default).map_err(js_error)?;
        wasm_log!("addColumn: '{}' ({})", name, tag.as_str());
        self.edit_result(true)
    }

    #[wasm_bindgen(js_name = deleteColumn)]
    pub fn delete_column(&mut self, name: &str) -> Result<JsValue, JsValue> {
        let changed = self.state.delete_column(name).map_err(js_error)?;
        self.edit_result(changed)
    }

    #[wasm_bindgen(js_name = renameColumn)]
    pub fn rename_column(&mut self, old_name: &str, new_name: &str) -> Result<JsValue, JsValue> {
        let changed = self.state.rename_column(old_name, new_name).map_err(js_error)?;
        self.edit_result(changed)
    }

    /// Apply a new column order (an array of every column name)
    #[wasm_bindgen(js_name = reorderColumns)]
    pub fn reorder_columns(&mut self, order: JsValue) -> Result<JsValue, JsValue> {
        let order: Vec<String> = deserialize(order, "Column order must be an array of names")?;
        self.state.reorder_columns(order).map_err(js_error)?;
        self.edit_result(true)
    }

    // ------------------------------------------------------------------
    // Rows and cells
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = updateCell)]
    pub fn update_cell(&mut self, row: usize, column: &str, value: JsValue) -> Result<JsValue, JsValue> {
        let value = to_cell_value(value)?;
        let changed = self.state.update_cell(row, column, value).map_err(js_error)?;
        self.edit_result(changed)
    }

    /// Append a row. Without an argument the row is blank.
    #[wasm_bindgen(js_name = addRow)]
    pub fn add_row(&mut self, row: JsValue) -> Result<JsValue, JsValue> {
        if row.is_undefined() || row.is_null() {
            self.state.add_blank_row();
        } else {
            let row: Row = deserialize(row, "Row must be an object")?;
            self.state.add_row(row).map_err(js_error)?;
        }
        self.edit_result(true)
    }

    #[wasm_bindgen(js_name = deleteRow)]
    pub fn delete_row(&mut self, row: usize) -> Result<JsValue, JsValue> {
        self.state.delete_row(row).map_err(js_error)?;
        self.edit_result(true)
    }

    /// Sort rows by a column; `direction` is "asc" or "desc"
    #[wasm_bindgen(js_name = sort)]
    pub fn sort(&mut self, column: &str, direction: &str) -> Result<JsValue, JsValue> {
        let direction: SortDirection = deserialize(JsValue::from_str(direction), "Invalid sort direction")?;
        let changed = self.state.sort(column, direction).map_err(js_error)?;
        self.edit_result(changed)
    }

    #[wasm_bindgen(js_name = undo)]
    pub fn undo(&mut self) -> Result<JsValue, JsValue> {
        let changed = self.state.undo();
        self.edit_result(changed)
    }

    #[wasm_bindgen(js_name = redo)]
    pub fn redo(&mut self) -> Result<JsValue, JsValue> {
        let changed = self.state.redo();
        self.edit_result(changed)
    }

    // ------------------------------------------------------------------
    // Focus and editing
    // ------------------------------------------------------------------

    /// Handle a keydown event. `context` is `{ inTextInput,
    /// hasTextSelection, targetIsControl }`; missing fields are false.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        context: JsValue,
    ) -> Result<JsValue, JsValue> {
        let ctx: KeyContext = if context.is_undefined() || context.is_null() {
            KeyContext::default()
        } else {
            deserialize(context, "Invalid key context")?
        };
        let press = KeyPress::new(Key::from_dom(key), Modifiers::new(ctrl, shift, alt, meta));

        let response = self.state.handle_key(press, &ctx).map_err(js_error)?;
        serialize(
            &KeyResult {
                claimed: response.claimed,
                command: response.command,
                view: self.state.snapshot(),
            },
            "KeyResult serialization error",
        )
    }

    #[wasm_bindgen(js_name = focusCell)]
    pub fn focus_cell(&mut self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        self.state.focus_cell(row, col);
        self.edit_result(false)
    }

    #[wasm_bindgen(js_name = beginEdit)]
    pub fn begin_edit(&mut self, row: usize, column: &str) -> Result<JsValue, JsValue> {
        self.state.begin_edit(row, column).map_err(js_error)?;
        self.edit_result(false)
    }

    #[wasm_bindgen(js_name = setDraft)]
    pub fn set_draft(&mut self, text: &str) -> bool {
        self.state.set_draft(text)
    }

    /// Commit the open inline edit (e.g. when the input loses focus)
    #[wasm_bindgen(js_name = commitEdit)]
    pub fn commit_edit(&mut self) -> Result<JsValue, JsValue> {
        let changed = self.state.commit_edit().map_err(js_error)?;
        self.edit_result(changed)
    }

    // ------------------------------------------------------------------
    // Nested editors
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = openNested)]
    pub fn open_nested(&mut self, row: usize, column: &str) -> Result<JsValue, JsValue> {
        self.state.open_nested(row, column).map_err(js_error)?;
        self.edit_result(false)
    }

    #[wasm_bindgen(js_name = saveNested)]
    pub fn save_nested(&mut self) -> Result<JsValue, JsValue> {
        let changed = self.state.save_nested().map_err(js_error)?;
        self.edit_result(changed)
    }

    #[wasm_bindgen(js_name = cancelNested)]
    pub fn cancel_nested(&mut self) -> Result<JsValue, JsValue> {
        let closed = self.state.cancel_nested();
        self.edit_result(closed)
    }

    /// The active grid: columns, schema, rows, focus, undo/redo state and
    /// nesting depth
    #[wasm_bindgen(js_name = snapshot)]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serialize(&self.state.snapshot(), "ViewSnapshot serialization error")
    }
}

impl JsonGridEditor {
    fn edit_result(&self, changed: bool) -> Result<JsValue, JsValue> {
        serialize(
            &EditResult {
                changed,
                view: self.state.snapshot(),
            },
            "EditResult serialization error",
        )
    }
}

fn parse_source(source: &str) -> Result<ImportSource, JsValue> {
    deserialize(JsValue::from_str(source), "Unknown import source")
}

fn to_cell_value(value: JsValue) -> Result<CellValue, JsValue> {
    if value.is_undefined() {
        return Ok(CellValue::Null);
    }
    deserialize(value, "Cell value must be JSON")
}
