//! Keyboard navigation state machine
//!
//! Focus moves over a grid of `row_count` rows and `column_count + 1`
//! slots per row; the extra last slot is the row's delete control.
//!
//! ```text
//!   Idle ──(focus_cell / data appears)──▶ Focused(row, col)
//!   Focused ──Enter/Space──▶ Editing(row, column)   (data cell)
//!   Focused ──Escape──▶ Idle
//!   Editing ──Enter──▶ Focused (commit)   Editing ──Escape──▶ Focused (discard)
//! ```
//!
//! The navigator only decides; row deletion, cell writes, commits and
//! nested editors are applied by the caller from the returned [`NavAction`].

pub mod keys;

pub use keys::{Key, KeyContext, KeyPress, Modifiers};

use serde::{Deserialize, Serialize};

use crate::coerce::edit_text;
use crate::models::document::Document;
use crate::models::value::CellValue;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Focus {
    Idle,
    /// `col == column_count` is the row's delete control
    Focused { row: usize, col: usize },
    Editing { row: usize, column: String, draft: String },
}

impl Focus {
    pub fn is_editing(&self) -> bool {
        matches!(self, Focus::Editing { .. })
    }
}

/// What a key press asks the caller to do
#[derive(Clone, Debug, PartialEq)]
pub enum NavAction {
    /// Not a grid key here; let the next handler (or the browser) have it
    Unhandled,
    /// Focus moved (possibly clamped in place at an edge)
    Moved,
    /// Focus left the grid. With `yield_focus` the browser's own focus
    /// traversal should proceed (the event is not claimed).
    Exited { yield_focus: bool },
    /// Inline editing started; the focus now holds the draft
    BeginEdit { row: usize, column: String },
    /// The cell holds a nested value and needs a nested editor
    OpenNested { row: usize, column: String },
    /// Commit `text` into the cell, then call [`Navigator::finish_edit`]
    Commit { row: usize, column: String, text: String },
    /// Inline edit discarded
    CancelEdit,
    /// Set the cell to an empty string
    ClearCell { row: usize, column: String },
    DeleteRow { row: usize },
}

impl NavAction {
    /// Whether the key event was consumed (default browser action suppressed)
    pub fn is_claimed(&self) -> bool {
        !matches!(
            self,
            NavAction::Unhandled | NavAction::Exited { yield_focus: true }
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Navigator {
    focus: Focus,
    /// Focus (0, 0) automatically the next time the grid gains rows
    auto_focus: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            focus: Focus::Idle,
            auto_focus: true,
        }
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    /// Drop focus without touching the document
    pub fn exit(&mut self) {
        self.focus = Focus::Idle;
    }

    /// Re-validate focus against the document after any change: focus the
    /// first cell when rows first appear, clamp indices when rows or columns
    /// shrink, and go idle when the grid is empty.
    pub fn sync(&mut self, doc: &Document) {
        let rows = doc.row_count();
        let cols = doc.column_count();

        if rows == 0 {
            self.focus = Focus::Idle;
            self.auto_focus = true;
            return;
        }

        self.focus = match std::mem::replace(&mut self.focus, Focus::Idle) {
            Focus::Idle if self.auto_focus => {
                self.auto_focus = false;
                Focus::Focused { row: 0, col: 0 }
            }
            Focus::Idle => Focus::Idle,
            Focus::Focused { row, col } => Focus::Focused {
                row: row.min(rows - 1),
                col: col.min(cols),
            },
            Focus::Editing { row, column, draft } => match doc.column_index(&column) {
                Some(_) if row < rows => Focus::Editing { row, column, draft },
                Some(col) => Focus::Focused { row: rows - 1, col },
                None => Focus::Focused { row: row.min(rows - 1), col: 0 },
            },
        };
    }

    /// Focus a slot directly (pointer click). Out-of-range positions clamp.
    pub fn focus_cell(&mut self, row: usize, col: usize, doc: &Document) {
        if doc.row_count() == 0 {
            self.focus = Focus::Idle;
            return;
        }
        self.auto_focus = false;
        self.focus = Focus::Focused {
            row: row.min(doc.row_count() - 1),
            col: col.min(doc.column_count()),
        };
    }

    /// Start editing a data cell: inline for primitives and primitive lists,
    /// a nested editor for objects and lists holding structures.
    pub fn begin_edit(&mut self, row: usize, column: &str, doc: &Document) -> NavAction {
        let Some(col) = doc.column_index(column) else {
            return NavAction::Unhandled;
        };
        if row >= doc.row_count() {
            return NavAction::Unhandled;
        }

        self.auto_focus = false;
        let value = doc.cell(row, column).cloned().unwrap_or(CellValue::Null);
        if value.is_complex() {
            self.focus = Focus::Focused { row, col };
            return NavAction::OpenNested {
                row,
                column: column.to_string(),
            };
        }

        self.focus = Focus::Editing {
            row,
            column: column.to_string(),
            draft: edit_text(&value),
        };
        NavAction::BeginEdit {
            row,
            column: column.to_string(),
        }
    }

    /// Replace the draft text of the active inline edit
    pub fn set_draft(&mut self, text: &str) -> bool {
        match &mut self.focus {
            Focus::Editing { draft, .. } => {
                *draft = text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Leave inline editing after a successful commit, staying on the cell
    pub fn finish_edit(&mut self, doc: &Document) {
        if let Focus::Editing { row, column, .. } = &self.focus {
            let col = doc.column_index(column).unwrap_or(0);
            self.focus = Focus::Focused { row: *row, col };
        }
        self.sync(doc);
    }

    /// Interpret one key press
    pub fn handle_key(&mut self, press: KeyPress, ctx: &KeyContext, doc: &Document) -> NavAction {
        if let Focus::Editing { row, column, draft } = &self.focus {
            return match press.key {
                Key::Enter if !press.modifiers.has_command() => NavAction::Commit {
                    row: *row,
                    column: column.clone(),
                    text: draft.clone(),
                },
                Key::Escape => {
                    let (row, col) = (*row, doc.column_index(column).unwrap_or(0));
                    self.focus = Focus::Focused { row, col };
                    NavAction::CancelEdit
                }
                _ => NavAction::Unhandled,
            };
        }

        if ctx.target_is_control || ctx.in_text_input || press.modifiers.has_command() {
            return NavAction::Unhandled;
        }

        let Focus::Focused { row, col } = self.focus else {
            return NavAction::Unhandled;
        };

        let rows = doc.row_count();
        let cols = doc.column_count();
        if rows == 0 {
            self.focus = Focus::Idle;
            return NavAction::Unhandled;
        }
        let on_delete_control = col >= cols;

        match press.key {
            Key::ArrowUp => self.move_to(row.saturating_sub(1), col),
            Key::ArrowDown => self.move_to((row + 1).min(rows - 1), col),
            Key::ArrowLeft => self.move_to(row, col.saturating_sub(1)),
            Key::ArrowRight => self.move_to(row, (col + 1).min(cols)),
            Key::Tab => self.tab(row, col, rows, cols, press.modifiers.shift()),
            Key::Enter | Key::Space => {
                if on_delete_control {
                    NavAction::DeleteRow { row }
                } else {
                    let column = doc.columns()[col].clone();
                    self.begin_edit(row, &column, doc)
                }
            }
            Key::Escape => {
                self.focus = Focus::Idle;
                NavAction::Exited { yield_focus: false }
            }
            Key::Delete | Key::Backspace => {
                if on_delete_control || press.modifiers.shift() {
                    NavAction::DeleteRow { row }
                } else {
                    NavAction::ClearCell {
                        row,
                        column: doc.columns()[col].clone(),
                    }
                }
            }
            _ => NavAction::Unhandled,
        }
    }

    fn move_to(&mut self, row: usize, col: usize) -> NavAction {
        self.focus = Focus::Focused { row, col };
        NavAction::Moved
    }

    /// Step through the row-major slot sequence; leaving either end hands
    /// focus back to the page.
    fn tab(&mut self, row: usize, col: usize, rows: usize, cols: usize, backwards: bool) -> NavAction {
        let width = cols + 1;
        let index = row * width + col;

        let next = if backwards {
            index.checked_sub(1)
        } else {
            Some(index + 1).filter(|i| *i < rows * width)
        };

        match next {
            Some(i) => self.move_to(i / width, i % width),
            None => {
                self.focus = Focus::Idle;
                NavAction::Exited { yield_focus: true }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_rows(
            serde_json::from_value(json!([
                {"a": 1, "b": "x"},
                {"a": 2, "b": "y"}
            ]))
            .unwrap(),
            100,
        )
    }

    fn focused(row: usize, col: usize) -> Navigator {
        let mut nav = Navigator::new();
        nav.focus_cell(row, col, &doc());
        nav
    }

    fn press(nav: &mut Navigator, key: Key) -> NavAction {
        nav.handle_key(KeyPress::plain(key), &KeyContext::default(), &doc())
    }

    #[test]
    fn test_sync_focuses_first_cell_once() {
        let mut nav = Navigator::new();
        nav.sync(&doc());
        assert_eq!(nav.focus(), &Focus::Focused { row: 0, col: 0 });

        nav.handle_key(KeyPress::plain(Key::Escape), &KeyContext::default(), &doc());
        nav.sync(&doc());
        assert_eq!(nav.focus(), &Focus::Idle, "explicit exit is not undone by sync");
    }

    #[test]
    fn test_arrows_clamp_at_edges() {
        let mut nav = focused(0, 0);
        assert_eq!(press(&mut nav, Key::ArrowUp), NavAction::Moved);
        press(&mut nav, Key::ArrowLeft);
        assert_eq!(nav.focus(), &Focus::Focused { row: 0, col: 0 });

        for _ in 0..5 {
            press(&mut nav, Key::ArrowRight);
            press(&mut nav, Key::ArrowDown);
        }
        assert_eq!(nav.focus(), &Focus::Focused { row: 1, col: 2 });
    }

    #[test]
    fn test_tab_reaches_delete_control_before_next_row() {
        let mut nav = focused(0, 1);
        press(&mut nav, Key::Tab);
        assert_eq!(nav.focus(), &Focus::Focused { row: 0, col: 2 });
        press(&mut nav, Key::Tab);
        assert_eq!(nav.focus(), &Focus::Focused { row: 1, col: 0 });
    }

    #[test]
    fn test_tab_past_end_yields_focus() {
        let mut nav = focused(1, 2);
        let action = press(&mut nav, Key::Tab);
        assert_eq!(action, NavAction::Exited { yield_focus: true });
        assert!(!action.is_claimed());
        assert_eq!(nav.focus(), &Focus::Idle);

        let mut nav = focused(0, 0);
        let action = nav.handle_key(KeyPress::shifted(Key::Tab), &KeyContext::default(), &doc());
        assert_eq!(action, NavAction::Exited { yield_focus: true });
    }

    #[test]
    fn test_enter_starts_inline_edit_with_draft() {
        let mut nav = focused(1, 0);
        assert_eq!(
            press(&mut nav, Key::Enter),
            NavAction::BeginEdit { row: 1, column: "a".into() }
        );
        assert_eq!(
            nav.focus(),
            &Focus::Editing { row: 1, column: "a".into(), draft: "2".into() }
        );
    }

    #[test]
    fn test_enter_on_delete_control_deletes_row() {
        let mut nav = focused(1, 2);
        assert_eq!(press(&mut nav, Key::Enter), NavAction::DeleteRow { row: 1 });
        assert_eq!(press(&mut nav, Key::Space), NavAction::DeleteRow { row: 1 });
    }

    #[test]
    fn test_editing_enter_commits_and_escape_discards() {
        let mut nav = focused(0, 1);
        press(&mut nav, Key::Enter);
        nav.set_draft("changed");

        assert_eq!(
            press(&mut nav, Key::Enter),
            NavAction::Commit { row: 0, column: "b".into(), text: "changed".into() }
        );
        nav.finish_edit(&doc());
        assert_eq!(nav.focus(), &Focus::Focused { row: 0, col: 1 });

        press(&mut nav, Key::Enter);
        assert_eq!(press(&mut nav, Key::Escape), NavAction::CancelEdit);
        assert_eq!(nav.focus(), &Focus::Focused { row: 0, col: 1 });
    }

    #[test]
    fn test_editing_ignores_navigation_keys() {
        let mut nav = focused(0, 0);
        press(&mut nav, Key::Enter);
        assert_eq!(press(&mut nav, Key::ArrowDown), NavAction::Unhandled);
        assert_eq!(press(&mut nav, Key::Delete), NavAction::Unhandled);
        assert!(nav.focus().is_editing());
    }

    #[test]
    fn test_delete_clears_cell_and_shift_delete_removes_row() {
        let mut nav = focused(0, 1);
        assert_eq!(
            press(&mut nav, Key::Backspace),
            NavAction::ClearCell { row: 0, column: "b".into() }
        );
        let action = nav.handle_key(KeyPress::shifted(Key::Delete), &KeyContext::default(), &doc());
        assert_eq!(action, NavAction::DeleteRow { row: 0 });
    }

    #[test]
    fn test_complex_value_opens_nested_editor() {
        let doc = Document::from_rows(
            serde_json::from_value(json!([{"meta": {"k": 1}, "tags": [1, 2]}])).unwrap(),
            100,
        );
        let mut nav = Navigator::new();
        nav.sync(&doc);

        let action = nav.handle_key(KeyPress::plain(Key::Enter), &KeyContext::default(), &doc);
        assert_eq!(action, NavAction::OpenNested { row: 0, column: "meta".into() });
        assert!(!nav.focus().is_editing());

        assert_eq!(
            nav.begin_edit(0, "tags", &doc),
            NavAction::BeginEdit { row: 0, column: "tags".into() }
        );
        assert_eq!(
            nav.focus(),
            &Focus::Editing { row: 0, column: "tags".into(), draft: "1, 2".into() }
        );
    }

    #[test]
    fn test_unrelated_control_and_shortcuts_pass_through() {
        let mut nav = focused(0, 0);
        let ctx = KeyContext { target_is_control: true, ..Default::default() };
        assert_eq!(nav.handle_key(KeyPress::plain(Key::ArrowDown), &ctx, &doc()), NavAction::Unhandled);

        let ctrl_z = KeyPress::new(Key::Char('z'), Modifiers::CTRL);
        assert_eq!(nav.handle_key(ctrl_z, &KeyContext::default(), &doc()), NavAction::Unhandled);
        assert_eq!(nav.focus(), &Focus::Focused { row: 0, col: 0 });
    }

    #[test]
    fn test_sync_clamps_after_rows_shrink() {
        let mut document = doc();
        let mut nav = Navigator::new();
        nav.focus_cell(1, 1, &document);

        document.delete_row(1).unwrap();
        nav.sync(&document);
        assert_eq!(nav.focus(), &Focus::Focused { row: 0, col: 1 });

        document.delete_row(0).unwrap();
        nav.sync(&document);
        assert_eq!(nav.focus(), &Focus::Idle);
    }

    #[test]
    fn test_escape_from_focused_claims_event() {
        let mut nav = focused(0, 0);
        let action = press(&mut nav, Key::Escape);
        assert!(action.is_claimed());
        assert_eq!(nav.focus(), &Focus::Idle);
    }
}
