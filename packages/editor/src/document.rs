//! # Document Tree
//!
//! The live document being edited: a fixed root container plus user
//! content, and the identity assigner that keeps every element addressable.
//!
//! Every other component refers to nodes by [`NodeId`] and looks them up
//! through [`Document::resolve`]; references are never held across a
//! mutation. A stale ID simply resolves to `None`.

use sitecraft_parser::{parse_fragment, Element, IdGenerator, Node, NodeId, ParseError, Serializer};
use std::collections::HashMap;

/// Identifier of the fixed root container
pub const ROOT_ID: &str = "root";

/// Tag of the fixed root container
pub const ROOT_TAG: &str = "div";

/// Content of a fresh or cleared document
pub const DEFAULT_MARKUP: &str = "<h1>Welcome to Website Builder</h1><p>Click on elements to select them. Use the left panel to add new elements.</p>";

/// Editable document tree
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
    ids: IdGenerator,
}

impl Document {
    /// Create a document holding the default content
    pub fn new(session_name: &str) -> Self {
        let mut doc = Self {
            root: empty_root(),
            ids: IdGenerator::new(session_name),
        };
        doc.reset();
        doc
    }

    /// Create a document from serialized root content
    pub fn from_markup(session_name: &str, markup: &str) -> Result<Self, ParseError> {
        let mut doc = Self {
            root: empty_root(),
            ids: IdGenerator::new(session_name),
        };
        doc.replace_content(markup)?;
        Ok(doc)
    }

    pub fn root_id() -> NodeId {
        NodeId::new(ROOT_ID)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn is_root(&self, id: &NodeId) -> bool {
        self.root.has_id(id)
    }

    /// Single lookup path for every component
    pub fn resolve(&self, id: &NodeId) -> Option<&Element> {
        self.root.find(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.resolve(id).is_some()
    }

    /// Resolve an ID that refers to user content (never the root)
    pub fn resolve_content(&self, id: &NodeId) -> Option<&Element> {
        if self.is_root(id) {
            return None;
        }
        self.resolve(id)
    }

    /// Parent ID and child index of a node
    pub fn parent_of(&self, id: &NodeId) -> Option<(NodeId, usize)> {
        let (parent, index) = self.root.parent_of(id)?;
        Some((parent.id.clone()?, index))
    }

    /// Whether `ancestor` strictly contains `id`
    pub fn is_ancestor(&self, ancestor: &NodeId, id: &NodeId) -> bool {
        if ancestor == id {
            return false;
        }
        self.resolve(ancestor).is_some_and(|el| el.contains(id))
    }

    /// Position of every element in a pre-order walk
    pub fn document_order(&self) -> HashMap<NodeId, usize> {
        self.root
            .ids()
            .into_iter()
            .enumerate()
            .map(|(index, id)| (id, index))
            .collect()
    }

    /// Sort IDs by tree position; unresolvable IDs are dropped
    pub fn sort_in_document_order(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let order = self.document_order();
        let mut sorted: Vec<NodeId> = ids
            .iter()
            .filter(|id| order.contains_key(*id))
            .cloned()
            .collect();
        sorted.sort_by_key(|id| order[id]);
        sorted.dedup();
        sorted
    }

    /// Number of user elements (root excluded)
    pub fn element_count(&self) -> usize {
        self.root.element_count()
    }

    /// Serialized root content, identifiers included (the snapshot format)
    pub fn markup(&self) -> String {
        Serializer::new().inner_markup(&self.root)
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    // Write access below is crate-private: only mutation operations and
    // history restore change the tree.

    pub(crate) fn resolve_mut(&mut self, id: &NodeId) -> Option<&mut Element> {
        self.root.find_mut(id)
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    /// Insert a node as a child of `parent` (index clamped to the end)
    pub(crate) fn insert(&mut self, parent: &NodeId, index: usize, node: Node) -> bool {
        self.root.insert_into(parent, index, node)
    }

    /// Detach user content from the tree
    pub(crate) fn remove(&mut self, id: &NodeId) -> Option<Element> {
        if self.is_root(id) {
            return None;
        }
        self.root.remove_descendant(id)
    }

    /// Replace root content with parsed markup, adopting its identifiers.
    /// On parse failure the tree is left untouched.
    pub(crate) fn replace_content(&mut self, markup: &str) -> Result<(), ParseError> {
        let mut root = empty_root();
        root.children = parse_fragment(markup)?;
        self.ids.adopt(&mut root);
        self.root = root;
        Ok(())
    }

    /// Restore the default content
    pub(crate) fn reset(&mut self) {
        let mut root = empty_root();
        if let Ok(children) = parse_fragment(DEFAULT_MARKUP) {
            root.children = children;
        }
        self.ids.assign_ids_deep(&mut root);
        self.root = root;
    }
}

fn empty_root() -> Element {
    Element::new(ROOT_TAG)
        .with_id(Document::root_id())
        .with_attr("id", "designRoot")
}
