use crate::style::{format_declarations, parse_declarations, to_kebab_case};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute carrying a node's stable identifier in serialized markup
pub const NODE_ID_ATTR: &str = "data-node-id";

/// Elements that never take children and have no end tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Stable node identifier
///
/// Assigned once by the [`IdGenerator`](crate::IdGenerator), never reused,
/// and carried through markup in the `data-node-id` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// CSS selector addressing this node in a stylesheet
    pub fn selector(&self) -> String {
        format!("[{}=\"{}\"]", NODE_ID_ATTR, self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Ordered attribute list (insertion order is preserved for serialization)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, overwriting in place if it already exists
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.0.iter().position(|(key, _)| key == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Document tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Tagged element
    Element(Element),

    /// Text run
    Text { content: String },
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text { .. } => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text { .. } => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Tagged tree element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Stable identifier (None until the identity assigner visits the node)
    pub id: Option<NodeId>,

    /// Element kind; an open vocabulary, not a closed set
    pub tag: String,

    /// Attributes in source order (`id` and `class` are ordinary entries)
    pub attributes: Attributes,

    /// Owned children in document order
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: None,
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.set_inline_style(property, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::text(text));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }

    pub fn has_id(&self, id: &NodeId) -> bool {
        self.id.as_ref() == Some(id)
    }

    /// Whole-node text projection (concatenation of every descendant text run)
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Replace all children (including markup) with a single text run
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::text(text));
        }
    }

    /// Child elements, skipping text runs
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// Find this element or a descendant by identifier
    pub fn find(&self, id: &NodeId) -> Option<&Element> {
        if self.has_id(id) {
            return Some(self);
        }
        self.elements().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut Element> {
        if self.has_id(id) {
            return Some(self);
        }
        self.elements_mut().find_map(|child| child.find_mut(id))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Child-index path from this element to a descendant
    ///
    /// Indices address `children` (text runs included). The path to `self`
    /// is empty.
    pub fn path_to(&self, id: &NodeId) -> Option<Vec<usize>> {
        if self.has_id(id) {
            return Some(Vec::new());
        }
        for (index, child) in self.children.iter().enumerate() {
            if let Node::Element(el) = child {
                if let Some(mut rest) = el.path_to(id) {
                    rest.insert(0, index);
                    return Some(rest);
                }
            }
        }
        None
    }

    pub fn at_path(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in path {
            current = current.children.get(index)?.as_element()?;
        }
        Some(current)
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &index in path {
            current = current.children.get_mut(index)?.as_element_mut()?;
        }
        Some(current)
    }

    /// Parent of a descendant and the descendant's index among its siblings
    pub fn parent_of(&self, id: &NodeId) -> Option<(&Element, usize)> {
        let path = self.path_to(id)?;
        let (&index, parent_path) = path.split_last()?;
        Some((self.at_path(parent_path)?, index))
    }

    /// Detach a descendant from its parent
    pub fn remove_descendant(&mut self, id: &NodeId) -> Option<Element> {
        let path = self.path_to(id)?;
        let (&index, parent_path) = path.split_last()?;
        let parent = self.at_path_mut(parent_path)?;
        match parent.children.remove(index) {
            Node::Element(el) => Some(el),
            Node::Text { .. } => None,
        }
    }

    /// Insert a node into a descendant (or self) at the given child index
    pub fn insert_into(&mut self, parent: &NodeId, index: usize, node: Node) -> bool {
        match self.find_mut(parent) {
            Some(el) => {
                let index = index.min(el.children.len());
                el.children.insert(index, node);
                true
            }
            None => false,
        }
    }

    /// Visit this element and every descendant element in document order
    pub fn for_each_element<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        f(self);
        for child in self.elements() {
            child.for_each_element(f);
        }
    }

    pub fn for_each_element_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in self.elements_mut() {
            child.for_each_element_mut(f);
        }
    }

    /// Identifiers of this element and its descendants, in document order
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.for_each_element(&mut |el| {
            if let Some(id) = &el.id {
                ids.push(id.clone());
            }
        });
        ids
    }

    /// Number of descendant elements (self excluded)
    pub fn element_count(&self) -> usize {
        self.elements().map(|child| 1 + child.element_count()).sum()
    }

    /// Inline declarations from the `style` attribute, in source order
    pub fn inline_styles(&self) -> Vec<(String, String)> {
        self.attributes
            .get("style")
            .map(parse_declarations)
            .unwrap_or_default()
    }

    pub fn inline_style(&self, property: &str) -> Option<String> {
        let property = to_kebab_case(property);
        self.inline_styles()
            .into_iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value)
    }

    /// Set one inline declaration; an empty value removes it
    pub fn set_inline_style(&mut self, property: &str, value: &str) {
        let property = to_kebab_case(property);
        let value = value.trim();
        let mut declarations = self.inline_styles();
        match declarations.iter().position(|(name, _)| *name == property) {
            Some(pos) if value.is_empty() => {
                declarations.remove(pos);
            }
            Some(pos) => declarations[pos].1 = value.to_string(),
            None if value.is_empty() => return,
            None => declarations.push((property, value.to_string())),
        }
        self.write_inline_styles(&declarations);
    }

    pub fn remove_inline_style(&mut self, property: &str) {
        self.set_inline_style(property, "");
    }

    fn write_inline_styles(&mut self, declarations: &[(String, String)]) {
        if declarations.is_empty() {
            self.attributes.remove("style");
        } else {
            self.attributes.set("style", format_declarations(declarations));
        }
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text { content } => out.push_str(content),
            Node::Element(child) => collect_text(child, out),
        }
    }
}
