//! Notifications for the presentation layer
//!
//! The session queues events as state changes; the host drains them after
//! each call and re-renders whatever they name.

use crate::fields::PropertyFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// Selection changed: panel header text and prefill for the primary node
    #[serde(rename_all = "camelCase")]
    SelectionChanged {
        summary: String,
        fields: Option<PropertyFields>,
    },

    /// Tree structure changed: re-render the tree view and counter
    #[serde(rename_all = "camelCase")]
    TreeChanged { element_count: usize },

    /// Undo/redo availability changed
    #[serde(rename_all = "camelCase")]
    HistoryChanged { can_undo: bool, can_redo: bool },
}

/// Queue of pending notifications
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<EditorEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: EditorEvent) {
        // Only the latest state of a kind matters to a renderer
        self.events
            .retain(|queued| std::mem::discriminant(queued) != std::mem::discriminant(&event));
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
