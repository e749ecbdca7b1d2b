//! Editor host
//!
//! `EditorState` owns the frame stack, the storage adapter and the keymap.
//! Every user action enters here, is applied to the active frame, and any
//! change to the root rows is persisted.
//!
//! Key presses run through an ordered dispatch chain. Each layer either
//! claims the event or passes it on:
//!
//! 1. the active grid's navigator
//! 2. the nested overlay layer (save / cancel)
//! 3. global shortcuts

pub mod shortcuts;

pub use shortcuts::{Keymap, Keystroke, ShortcutAction};

use log::{info, warn};
use serde::Serialize;

use crate::coerce::coerce_edit;
use crate::config::EditorConfig;
use crate::converters::json::{read_import, serialize_rows, ExportShape, ImportSource};
use crate::error::Result;
use crate::models::document::{Document, SortDirection};
use crate::models::schema::{Schema, TypeTag};
use crate::models::value::{CellValue, Row};
use crate::navigation::{Focus, Key, KeyContext, KeyPress, NavAction, Navigator};
use crate::nested::{NestedKind, NestedStack};
use crate::storage::Storage;

/// Platform work a shortcut asks the page to do
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostCommand {
    #[serde(rename_all = "camelCase")]
    DownloadFile { file_name: String, contents: String },
    OpenFilePicker,
    /// Ask the user, then call `clear_workspace`
    ConfirmClear,
    WriteClipboard { text: String },
    ShowReorderColumns { columns: Vec<String> },
    ShowAddColumn,
}

/// Outcome of one key press
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct KeyResponse {
    /// The page should call `preventDefault()`
    pub claimed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<HostCommand>,
}

impl KeyResponse {
    fn unclaimed() -> Self {
        Self::default()
    }

    fn claimed() -> Self {
        Self {
            claimed: true,
            command: None,
        }
    }

    fn command(command: HostCommand) -> Self {
        Self {
            claimed: true,
            command: Some(command),
        }
    }
}

/// Everything the renderer needs to draw the active grid
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub columns: Vec<String>,
    pub schema: Schema,
    pub rows: Vec<Row>,
    pub focus: Focus,
    pub can_undo: bool,
    pub can_redo: bool,
    pub depth: usize,
    pub nested_kind: Option<NestedKind>,
}

pub struct EditorState<S: Storage> {
    config: EditorConfig,
    stack: NestedStack,
    storage: S,
    keymap: Keymap,
}

impl<S: Storage> EditorState<S> {
    /// Start the editor from whatever the storage holds. Unreadable stored
    /// data is logged and the editor starts empty.
    pub fn new(config: EditorConfig, storage: S) -> Self {
        let rows = match storage.load() {
            Ok(Some(rows)) => {
                info!("restored {} rows from storage", rows.len());
                rows
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("ignoring stored rows: {}", e);
                Vec::new()
            }
        };

        let document = Document::from_rows(rows, config.history_limit);
        Self {
            stack: NestedStack::new(document, config.max_nesting_depth),
            keymap: Keymap::new(config.mac_shortcuts),
            config,
            storage,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The grid receiving edits
    pub fn document(&self) -> &Document {
        &self.stack.active().document
    }

    pub fn root_document(&self) -> &Document {
        &self.stack.root().document
    }

    pub fn focus(&self) -> &Focus {
        self.stack.active().navigator.focus()
    }

    /// Number of open nested editors
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let frame = self.stack.active();
        ViewSnapshot {
            columns: frame.document.columns().to_vec(),
            schema: frame.document.schema().clone(),
            rows: frame.document.rows().to_vec(),
            focus: frame.navigator.focus().clone(),
            can_undo: frame.document.can_undo(),
            can_redo: frame.document.can_redo(),
            depth: self.stack.depth(),
            nested_kind: frame.kind(),
        }
    }

    // ------------------------------------------------------------------
    // Import / export
    // ------------------------------------------------------------------

    /// Replace the whole dataset with imported text. On error nothing
    /// changes. Returns the number of imported rows.
    pub fn import(&mut self, source: ImportSource, read: std::result::Result<String, String>) -> Result<usize> {
        let rows = read_import(source, read)?;
        let count = rows.len();

        self.stack.close_all();
        let root = self.stack.root_mut();
        root.document.replace_rows(rows);
        root.navigator = Navigator::new();
        root.navigator.sync(&root.document);

        self.persist();
        Ok(count)
    }

    /// The root rows as file contents, with dotted keys rebuilt into objects
    pub fn export_json(&self) -> Result<String> {
        serialize_rows(self.root_document().rows(), ExportShape::Unflattened)
    }

    /// The root rows as held, for the clipboard
    pub fn copy_json(&self) -> Result<String> {
        serialize_rows(self.root_document().rows(), ExportShape::Raw)
    }

    /// Drop all data, history and overlays, and remove the stored snapshot
    pub fn clear_workspace(&mut self) {
        self.stack.close_all();
        let root = self.stack.root_mut();
        root.document = Document::new(self.config.history_limit);
        root.navigator = Navigator::new();

        if let Err(e) = self.storage.clear() {
            warn!("failed to clear stored rows: {}", e);
        }
        info!("workspace cleared");
    }

    // ------------------------------------------------------------------
    // Column operations (active frame)
    // ------------------------------------------------------------------

    pub fn add_column(&mut self, name: &str, tag: TypeTag, default: CellValue) -> Result<()> {
        let frame = self.stack.active_mut();
        frame.check_columns_editable()?;
        frame.document.add_column(name, tag, default)?;
        self.after_change(true);
        Ok(())
    }

    pub fn delete_column(&mut self, name: &str) -> Result<bool> {
        let frame = self.stack.active_mut();
        frame.check_columns_editable()?;
        let changed = frame.document.delete_column(name);
        self.after_change(changed);
        Ok(changed)
    }

    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<bool> {
        let frame = self.stack.active_mut();
        frame.check_columns_editable()?;
        let changed = frame.document.rename_column(old, new)?;
        self.after_change(changed);
        Ok(changed)
    }

    pub fn reorder_columns(&mut self, order: Vec<String>) -> Result<()> {
        let frame = self.stack.active_mut();
        frame.check_columns_editable()?;
        frame.document.reorder_columns(order)?;
        self.after_change(false);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Row operations (active frame)
    // ------------------------------------------------------------------

    pub fn update_cell(&mut self, row: usize, column: &str, value: CellValue) -> Result<bool> {
        let frame = self.stack.active_mut();
        frame.validate_write(row, column, &value)?;
        let changed = frame.document.update_cell(row, column, value)?;
        self.after_change(changed);
        Ok(changed)
    }

    /// Append a row. In object and list-item editors the row must fit the
    /// fixed `key`/`value` layout.
    pub fn add_row(&mut self, row: Row) -> Result<()> {
        let frame = self.stack.active_mut();
        frame.validate_row(&row)?;
        frame.document.add_row(row);
        self.after_change(true);
        Ok(())
    }

    /// Append a row of nulls (a fresh unique key in object editors)
    pub fn add_blank_row(&mut self) {
        let frame = self.stack.active_mut();
        let row = frame.blank_row();
        frame.document.add_row(row);
        self.after_change(true);
    }

    pub fn delete_row(&mut self, row: usize) -> Result<Row> {
        let removed = self.stack.active_mut().document.delete_row(row)?;
        self.after_change(true);
        Ok(removed)
    }

    pub fn sort(&mut self, column: &str, direction: SortDirection) -> Result<bool> {
        let changed = self.stack.active_mut().document.sort(column, direction)?;
        self.after_change(changed);
        Ok(changed)
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.stack.active_mut().document.undo();
        self.after_change(changed);
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.stack.active_mut().document.redo();
        self.after_change(changed);
        changed
    }

    // ------------------------------------------------------------------
    // Pointer focus and inline editing
    // ------------------------------------------------------------------

    pub fn focus_cell(&mut self, row: usize, col: usize) {
        let frame = self.stack.active_mut();
        frame.navigator.focus_cell(row, col, &frame.document);
    }

    /// Start editing a cell, opening a nested editor for structured values
    pub fn begin_edit(&mut self, row: usize, column: &str) -> Result<()> {
        let frame = self.stack.active_mut();
        let action = frame.navigator.begin_edit(row, column, &frame.document);
        self.apply(action)
    }

    pub fn set_draft(&mut self, text: &str) -> bool {
        self.stack.active_mut().navigator.set_draft(text)
    }

    /// Commit the current draft, if an inline edit is open
    pub fn commit_edit(&mut self) -> Result<bool> {
        match self.focus().clone() {
            Focus::Editing { row, column, draft } => self.commit(row, &column, &draft),
            _ => Ok(false),
        }
    }

    // ------------------------------------------------------------------
    // Nested editors
    // ------------------------------------------------------------------

    pub fn open_nested(&mut self, row: usize, column: &str) -> Result<()> {
        self.stack.open(row, column)
    }

    /// Write the top nested editor back into its parent cell and close it.
    /// An open inline edit is committed first; if that commit is rejected
    /// the editor stays open.
    pub fn save_nested(&mut self) -> Result<bool> {
        if self.stack.depth() > 0 {
            self.commit_edit()?;
        }
        let changed = self.stack.save()?;
        self.after_change(changed);
        Ok(changed)
    }

    pub fn cancel_nested(&mut self) -> bool {
        self.stack.cancel()
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, press: KeyPress, ctx: &KeyContext) -> Result<KeyResponse> {
        let frame = self.stack.active_mut();
        let action = frame.navigator.handle_key(press, ctx, &frame.document);
        if action != NavAction::Unhandled {
            let claimed = action.is_claimed();
            self.apply(action)?;
            return Ok(KeyResponse { claimed, command: None });
        }

        if self.stack.depth() > 0 {
            if press.key == Key::Escape
                && press.modifiers.is_empty()
                && *self.focus() == Focus::Idle
            {
                self.cancel_nested();
                return Ok(KeyResponse::claimed());
            }
            if self.keymap.lookup(press) == Some(ShortcutAction::SaveNested) {
                self.save_nested()?;
                return Ok(KeyResponse::claimed());
            }
        }

        match self.keymap.lookup(press) {
            Some(action) => self.run_shortcut(action, ctx),
            None => Ok(KeyResponse::unclaimed()),
        }
    }

    fn run_shortcut(&mut self, action: ShortcutAction, ctx: &KeyContext) -> Result<KeyResponse> {
        let response = match action {
            ShortcutAction::Export => KeyResponse::command(HostCommand::DownloadFile {
                file_name: self.config.export_file_name.clone(),
                contents: self.export_json()?,
            }),
            ShortcutAction::Open => KeyResponse::command(HostCommand::OpenFilePicker),
            ShortcutAction::Clear => KeyResponse::command(HostCommand::ConfirmClear),
            ShortcutAction::Undo | ShortcutAction::Redo if ctx.in_text_input => KeyResponse::unclaimed(),
            ShortcutAction::Undo => {
                self.undo();
                KeyResponse::claimed()
            }
            ShortcutAction::Redo => {
                self.redo();
                KeyResponse::claimed()
            }
            ShortcutAction::Copy if ctx.in_text_input || ctx.has_text_selection => {
                KeyResponse::unclaimed()
            }
            ShortcutAction::Copy => KeyResponse::command(HostCommand::WriteClipboard {
                text: self.copy_json()?,
            }),
            ShortcutAction::ReorderColumns => KeyResponse::command(HostCommand::ShowReorderColumns {
                columns: self.document().columns().to_vec(),
            }),
            ShortcutAction::AddColumn => KeyResponse::command(HostCommand::ShowAddColumn),
            ShortcutAction::SaveNested => KeyResponse::unclaimed(),
        };
        Ok(response)
    }

    /// Carry out what the navigator decided
    fn apply(&mut self, action: NavAction) -> Result<()> {
        match action {
            NavAction::OpenNested { row, column } => self.stack.open(row, &column)?,
            NavAction::Commit { row, column, text } => {
                self.commit(row, &column, &text)?;
            }
            NavAction::ClearCell { row, column } => {
                self.update_cell(row, &column, CellValue::Text(String::new()))?;
            }
            NavAction::DeleteRow { row } => {
                self.delete_row(row)?;
            }
            NavAction::Unhandled
            | NavAction::Moved
            | NavAction::Exited { .. }
            | NavAction::BeginEdit { .. }
            | NavAction::CancelEdit => {}
        }
        Ok(())
    }

    /// Coerce and write an inline edit. A rejected write leaves the cell in
    /// editing state with its draft.
    fn commit(&mut self, row: usize, column: &str, text: &str) -> Result<bool> {
        let frame = self.stack.active_mut();
        let value = coerce_edit(
            text,
            frame.document.cell(row, column),
            frame.document.column_type(column),
        );
        frame.validate_write(row, column, &value)?;
        let changed = frame.document.update_cell(row, column, value)?;
        frame.navigator.finish_edit(&frame.document);
        self.after_change(changed);
        Ok(changed)
    }

    /// Re-validate focus and persist root changes
    fn after_change(&mut self, changed: bool) {
        let frame = self.stack.active_mut();
        frame.navigator.sync(&frame.document);
        if changed && self.stack.depth() == 0 {
            self.persist();
        }
    }

    /// Write the root rows to storage; an empty document removes the entry.
    /// Failures are logged and otherwise ignored.
    fn persist(&mut self) {
        let rows = self.stack.root().document.rows();
        let result = if rows.is_empty() {
            self.storage.clear()
        } else {
            self.storage.save(rows)
        };
        if let Err(e) = result {
            warn!("{}", e);
        }
    }
}
