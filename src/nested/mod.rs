//! Nested editing
//!
//! Objects and structured lists are edited in an overlay grid that is a full
//! document of its own. Overlays stack: a cell inside an overlay can open a
//! further overlay. Only the top frame takes edits, and each frame has its
//! own undo history, which is dropped when the overlay closes. Saving an
//! overlay writes its value back to the parent cell as one edit.

pub mod frame;

pub use frame::{Frame, NestedKind, NestedOrigin, KEY_COLUMN, VALUE_COLUMN};

use log::debug;

use crate::error::{EditorError, Result};
use crate::models::document::Document;

#[derive(Clone, Debug, PartialEq)]
pub struct NestedStack {
    root: Frame,
    overlays: Vec<Frame>,
    max_depth: usize,
}

impl NestedStack {
    pub fn new(root: Document, max_depth: usize) -> Self {
        Self {
            root: Frame::root(root),
            overlays: Vec::new(),
            max_depth,
        }
    }

    /// Number of open overlays (0 when only the root grid is shown)
    pub fn depth(&self) -> usize {
        self.overlays.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn root(&self) -> &Frame {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Frame {
        &mut self.root
    }

    /// The frame receiving edits: the top overlay, or the root
    pub fn active(&self) -> &Frame {
        self.overlays.last().unwrap_or(&self.root)
    }

    pub fn active_mut(&mut self) -> &mut Frame {
        match self.overlays.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    /// Open an overlay for the value at (`row`, `column`) of the active frame
    pub fn open(&mut self, row: usize, column: &str) -> Result<()> {
        if self.overlays.len() >= self.max_depth {
            return Err(EditorError::StructuralLimit {
                depth: self.overlays.len() + 1,
                limit: self.max_depth,
            });
        }

        let parent = self.active();
        let history_limit = parent.document.history().limit();
        let value = parent.document.cell(row, column).cloned().ok_or_else(|| {
            EditorError::NotNested(format!("Cell ({}, {}) is empty", row, column))
        })?;

        let frame = Frame::nested(&value, row, column, history_limit)?;
        debug!(
            "opened nested {:?} editor for ({}, {}) at depth {}",
            frame.kind(),
            row,
            column,
            self.overlays.len() + 1
        );
        self.overlays.push(frame);
        Ok(())
    }

    /// Write the top overlay back into its parent cell and close it.
    /// Returns whether the parent changed.
    pub fn save(&mut self) -> Result<bool> {
        let top = self
            .overlays
            .last()
            .ok_or_else(|| EditorError::NotNested("No nested editor is open".to_string()))?;
        let origin = top
            .origin
            .clone()
            .ok_or_else(|| EditorError::NotNested("Nested editor has no parent cell".to_string()))?;
        let value = top.to_value();

        let parent_index = self.overlays.len() - 1;
        let parent = match parent_index.checked_sub(1) {
            Some(i) => &mut self.overlays[i],
            None => &mut self.root,
        };
        let changed = parent.document.update_cell(origin.row, &origin.column, value)?;
        parent.navigator.sync(&parent.document);

        self.overlays.pop();
        debug!("saved nested editor into ({}, {})", origin.row, origin.column);
        Ok(changed)
    }

    /// Close the top overlay without writing back. Returns false when no
    /// overlay was open.
    pub fn cancel(&mut self) -> bool {
        self.overlays.pop().is_some()
    }

    /// Discard every overlay
    pub fn close_all(&mut self) {
        self.overlays.clear();
    }
}
