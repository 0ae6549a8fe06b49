//! # History
//!
//! Linear snapshot history with a cursor.
//!
//! Every committed operation records a full snapshot (serialized tree,
//! theme, rule table). Undo and redo move the cursor and hand back the
//! snapshot to restore; nothing is ever replayed.
//!
//! - Recording after an undo discards the redo branch
//! - The oldest entry is evicted once `max_entries` is exceeded
//! - While a restore is in progress `record` is a no-op, so applying a
//!   snapshot can never write history of its own

use crate::styles::StyleSheet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitecraft_compiler_html::Theme;

/// One restorable state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Serialized root content, identifiers included
    pub markup: String,
    pub theme: Theme,
    pub styles: StyleSheet,
    /// Operation that produced this state
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    max_entries: usize,
    restoring: bool,
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_entries: max_entries.max(1),
            restoring: false,
        }
    }

    /// Record a new current state. Returns false if suppressed by a restore.
    pub fn record(&mut self, entry: HistoryEntry) -> bool {
        if self.restoring {
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(entry);

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Step back. Returns the state to restore.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward. Returns the state to restore.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Label of the operation an undo would revert
    pub fn undo_label(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.current().map(|e| e.label.as_str())
    }

    /// Label of the operation a redo would reapply
    pub fn redo_label(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.entries.get(self.cursor + 1).map(|e| e.label.as_str())
    }

    pub fn begin_restore(&mut self) {
        self.restoring = true;
    }

    pub fn end_restore(&mut self) {
        self.restoring = false;
    }

    /// Cursor position, `None` while empty
    pub fn cursor(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
