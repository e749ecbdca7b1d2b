use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::DEFAULT_HISTORY_LIMIT;

/// Snapshot-based undo/redo history with bounded depth.
///
/// Every `set` that actually changes the present value becomes one undo
/// step. A `set` whose value is structurally equal to the present one is
/// dropped, so re-applying an unchanged value never adds a step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct History<T> {
    /// Older snapshots, oldest first
    past: VecDeque<T>,
    present: T,
    /// Undone snapshots, next redo first
    future: VecDeque<T>,
    /// Maximum number of entries kept in `past`
    limit: usize,
}

impl<T: Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default(), DEFAULT_HISTORY_LIMIT)
    }
}

impl<T> History<T> {
    pub fn new(present: T, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
            limit,
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Replace the present value and forget all history
    pub fn reset(&mut self, value: T) {
        self.past.clear();
        self.future.clear();
        self.present = value;
    }

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Re-apply the most recently undone snapshot. Returns false when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.push_past(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Get the number of available undo steps
    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    fn push_past(&mut self, value: T) {
        self.past.push_back(value);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}

impl<T: PartialEq> History<T> {
    /// Install `next` as the present value.
    ///
    /// Returns false (and leaves history untouched) when `next` equals the
    /// present value. Otherwise the old present becomes an undo step and the
    /// redo list is discarded.
    pub fn set(&mut self, next: T) -> bool {
        if next == self.present {
            return false;
        }
        let current = std::mem::replace(&mut self.present, next);
        self.push_past(current);
        self.future.clear();
        true
    }

    /// Compute the next value from the present one, then `set` it
    pub fn update<F>(&mut self, updater: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = updater(&self.present);
        self.set(next)
    }
}
