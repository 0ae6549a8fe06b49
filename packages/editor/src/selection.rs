//! Selection state
//!
//! An insertion-ordered set of node IDs. The first member is the primary
//! selection and anchors insert position and the property panel. A separate
//! single-node pointer is kept for hosts that only track one node.

use crate::document::Document;
use crate::fields::PropertyFields;
use crate::styles::StyleSheet;
use sitecraft_parser::NodeId;
use std::collections::HashSet;

/// How the selection should be presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionDisplay {
    None,
    Single(NodeId),
    Group(Vec<NodeId>),
}

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Vec<NodeId>,
    legacy: Option<NodeId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a node. Non-additive replaces the selection; additive toggles
    /// membership. The root and unresolvable IDs are ignored. Returns true
    /// if the selection changed.
    pub fn select(&mut self, doc: &Document, id: &NodeId, additive: bool) -> bool {
        if doc.resolve_content(id).is_none() {
            return false;
        }

        if !additive {
            if self.selected.len() == 1 && self.selected[0] == *id {
                return false;
            }
            self.selected = vec![id.clone()];
            return true;
        }

        match self.selected.iter().position(|s| s == id) {
            Some(pos) => {
                self.selected.remove(pos);
            }
            None => self.selected.push(id.clone()),
        }
        true
    }

    /// Empty the selection. Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Replace the selection wholesale (in the given order)
    pub fn replace(&mut self, ids: Vec<NodeId>) {
        let mut seen = HashSet::new();
        self.selected = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
    }

    /// Drop members that no longer resolve, and a stale single-node pointer
    pub fn prune(&mut self, doc: &Document) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| doc.resolve_content(id).is_some());
        if self.legacy.as_ref().is_some_and(|id| doc.resolve_content(id).is_none()) {
            self.legacy = None;
        }
        before != self.selected.len()
    }

    pub fn primary(&self) -> Option<&NodeId> {
        self.selected.first()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn legacy_pointer(&self) -> Option<&NodeId> {
        self.legacy.as_ref()
    }

    pub fn set_legacy_pointer(&mut self, id: Option<NodeId>) {
        self.legacy = id;
    }

    pub fn display(&self) -> SelectionDisplay {
        match self.selected.as_slice() {
            [] => SelectionDisplay::None,
            [only] => SelectionDisplay::Single(only.clone()),
            many => SelectionDisplay::Group(many.to_vec()),
        }
    }

    /// Summary line for the property panel header
    pub fn summary(&self, doc: &Document) -> String {
        match self.selected.as_slice() {
            [] => "No element selected".to_string(),
            [only] => match doc.resolve(only) {
                Some(el) => format!("Selected: <{}>", el.tag),
                None => "No element selected".to_string(),
            },
            many => format!("Selected: {} elements", many.len()),
        }
    }

    /// Panel prefill from the primary selection
    pub fn field_values(&self, doc: &Document, styles: &StyleSheet) -> Option<PropertyFields> {
        let el = doc.resolve(self.primary()?)?;
        Some(PropertyFields::prefill(el, styles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::from_markup(
            "test",
            r#"<h1 data-node-id="h">Title</h1><p data-node-id="p">Body</p><img data-node-id="i" src="a.png">"#,
        )
        .unwrap()
    }

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    #[test]
    fn test_non_additive_replaces() {
        let doc = doc();
        let mut selection = SelectionManager::new();

        assert!(selection.select(&doc, &id("h"), false));
        assert!(selection.select(&doc, &id("p"), false));
        assert_eq!(selection.ids(), &[id("p")]);
        assert!(!selection.select(&doc, &id("p"), false));
    }

    #[test]
    fn test_additive_toggles_and_keeps_order() {
        let doc = doc();
        let mut selection = SelectionManager::new();

        selection.select(&doc, &id("p"), true);
        selection.select(&doc, &id("h"), true);
        assert_eq!(selection.ids(), &[id("p"), id("h")]);
        assert_eq!(selection.primary(), Some(&id("p")));

        selection.select(&doc, &id("p"), true);
        assert_eq!(selection.ids(), &[id("h")]);
    }

    #[test]
    fn test_root_and_stale_ids_ignored() {
        let doc = doc();
        let mut selection = SelectionManager::new();

        assert!(!selection.select(&doc, &Document::root_id(), false));
        assert!(!selection.select(&doc, &id("missing"), true));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_display_and_summary() {
        let doc = doc();
        let mut selection = SelectionManager::new();

        assert_eq!(selection.display(), SelectionDisplay::None);
        assert_eq!(selection.summary(&doc), "No element selected");

        selection.select(&doc, &id("h"), false);
        assert_eq!(selection.display(), SelectionDisplay::Single(id("h")));
        assert_eq!(selection.summary(&doc), "Selected: <h1>");

        selection.select(&doc, &id("i"), true);
        assert_eq!(selection.display(), SelectionDisplay::Group(vec![id("h"), id("i")]));
        assert_eq!(selection.summary(&doc), "Selected: 2 elements");
    }

    #[test]
    fn test_prune_and_field_values() {
        let doc = doc();
        let mut selection = SelectionManager::new();
        selection.replace(vec![id("gone"), id("i")]);
        selection.set_legacy_pointer(Some(id("gone")));

        assert!(selection.prune(&doc));
        assert_eq!(selection.ids(), &[id("i")]);
        assert_eq!(selection.legacy_pointer(), None);

        let fields = selection.field_values(&doc, &StyleSheet::new()).unwrap();
        assert_eq!(fields.src.as_deref(), Some("a.png"));
    }
}
