//! # Mutations
//!
//! Discrete editing operations on the document.
//!
//! Each mutation validates everything it needs before touching state, so an
//! error always means nothing changed. On success the tree, selection and
//! rule table are consistent; recording history and notifying views is left
//! to the session.
//!
//! ## Targets
//!
//! - Insert operations target the primary selection (or the root). A void
//!   primary (e.g. `img`) cannot hold children, so new content goes after it.
//! - Delete, retag, wrap and bulk apply act on every resolvable selected
//!   node. Nodes nested inside another target are handled through their
//!   ancestor.
//! - The root container is never a target.

use crate::components::ComponentRegistry;
use crate::defaults::TagDefaults;
use crate::document::Document;
use crate::fields::PropertyFields;
use crate::selection::SelectionManager;
use crate::styles::{find_unsafe, PropertyMap, StyleSheet};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sitecraft_compiler_html::{Theme, ThemeError};
use sitecraft_parser::{is_void_element, Element, Node, NodeId, ParseError};
use std::sync::LazyLock;
use thiserror::Error;

/// Tag used for wrap containers
pub const WRAPPER_TAG: &str = "div";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z][a-z0-9]*$").unwrap());

/// Editing operations accepted by the session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a new element with tag defaults
    InsertElement { tag: String },

    /// Insert a prebuilt block
    InsertComponent { kind: String },

    /// Remove every selected node
    DeleteSelection,

    /// Reset to the default document
    ClearDocument,

    /// Change the tag of every selected node
    Retag { tag: String },

    /// Move the selected nodes into a new container
    WrapSelection,

    /// Clone a node after itself
    Duplicate { node_id: NodeId },

    /// Replace a node's text content
    CommitText { node_id: NodeId, text: String },

    /// Apply property panel values to every selected node
    ApplyProperties { fields: PropertyFields },

    /// Merge style properties into a node's rules
    SetStyle {
        node_id: NodeId,
        properties: PropertyMap,
    },

    /// Change the accent color
    SetTheme { color: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("The root container cannot be edited")]
    RootNotEditable,

    #[error("Nothing is selected")]
    EmptySelection,

    #[error("Invalid tag name `{0}`")]
    InvalidTag(String),

    #[error("`{tag}` cannot hold children")]
    VoidWithChildren { tag: String },

    #[error("Unknown component `{0}`")]
    UnknownComponent(String),

    #[error("Component `{kind}` has invalid markup: {source}")]
    InvalidFragment { kind: String, source: ParseError },

    #[error("`{0}` does not hold editable text")]
    NotTextBearing(String),

    #[error("No inline edit in progress")]
    NoInlineEdit,

    #[error("Invalid style declaration `{property}: {value}`")]
    InvalidStyle { property: String, value: String },

    #[error(transparent)]
    InvalidTheme(#[from] ThemeError),
}

/// Mutable view of the session state a mutation may touch
pub(crate) struct EditContext<'a> {
    pub document: &'a mut Document,
    pub selection: &'a mut SelectionManager,
    pub styles: &'a mut StyleSheet,
    pub theme: &'a mut Theme,
    pub tags: &'a TagDefaults,
    pub components: &'a ComponentRegistry,
    pub now: DateTime<Utc>,
}

impl Mutation {
    /// History label
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::InsertElement { .. } => "Insert element",
            Mutation::InsertComponent { .. } => "Insert component",
            Mutation::DeleteSelection => "Delete",
            Mutation::ClearDocument => "Clear document",
            Mutation::Retag { .. } => "Change tag",
            Mutation::WrapSelection => "Wrap",
            Mutation::Duplicate { .. } => "Duplicate",
            Mutation::CommitText { .. } => "Edit text",
            Mutation::ApplyProperties { .. } => "Apply properties",
            Mutation::SetStyle { .. } => "Style",
            Mutation::SetTheme { .. } => "Theme",
        }
    }

    /// Whether the tree structure may change (as opposed to styling only)
    pub fn is_structural(&self) -> bool {
        !matches!(self, Mutation::SetStyle { .. } | Mutation::SetTheme { .. })
    }

    pub(crate) fn apply(&self, ctx: &mut EditContext<'_>) -> Result<(), MutationError> {
        match self {
            Mutation::InsertElement { tag } => insert_element(ctx, tag),
            Mutation::InsertComponent { kind } => insert_component(ctx, kind),
            Mutation::DeleteSelection => delete_selection(ctx),
            Mutation::ClearDocument => clear_document(ctx),
            Mutation::Retag { tag } => retag(ctx, tag),
            Mutation::WrapSelection => wrap_selection(ctx),
            Mutation::Duplicate { node_id } => duplicate(ctx, node_id),
            Mutation::CommitText { node_id, text } => commit_text(ctx, node_id, text),
            Mutation::ApplyProperties { fields } => apply_properties(ctx, fields),
            Mutation::SetStyle {
                node_id,
                properties,
            } => set_style(ctx, node_id, properties),
            Mutation::SetTheme { color } => {
                *ctx.theme = Theme::parse(color)?;
                Ok(())
            }
        }
    }
}

/// Validate and normalize a tag name
pub fn validate_tag(tag: &str) -> Result<String, MutationError> {
    let trimmed = tag.trim();
    if !TAG_PATTERN.is_match(trimmed) {
        return Err(MutationError::InvalidTag(tag.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

fn validate_style(properties: &[(String, String)]) -> Result<(), MutationError> {
    match find_unsafe(properties) {
        Some((property, value)) => Err(MutationError::InvalidStyle {
            property: property.clone(),
            value: value.clone(),
        }),
        None => Ok(()),
    }
}

fn content_element<'d>(doc: &'d Document, id: &NodeId) -> Result<&'d Element, MutationError> {
    if doc.is_root(id) {
        return Err(MutationError::RootNotEditable);
    }
    doc.resolve(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))
}

/// Resolvable selected nodes, in selection order
fn selected_targets(ctx: &EditContext<'_>) -> Result<Vec<NodeId>, MutationError> {
    let targets: Vec<NodeId> = ctx
        .selection
        .ids()
        .iter()
        .filter(|id| ctx.document.resolve_content(id).is_some())
        .cloned()
        .collect();
    if targets.is_empty() {
        return Err(MutationError::EmptySelection);
    }
    Ok(targets)
}

/// Drop targets nested inside another target
fn outermost(doc: &Document, ids: &[NodeId]) -> Vec<NodeId> {
    ids.iter()
        .filter(|id| !ids.iter().any(|other| doc.is_ancestor(other, id)))
        .cloned()
        .collect()
}

/// Parent and child index where inserted content goes
fn insertion_point(ctx: &EditContext<'_>) -> (NodeId, usize) {
    let primary = ctx
        .selection
        .primary()
        .and_then(|id| ctx.document.resolve_content(id).map(|el| (id, el)));

    match primary {
        Some((id, el)) if el.is_void() => match ctx.document.parent_of(id) {
            Some((parent, index)) => (parent, index + 1),
            None => root_end(ctx.document),
        },
        Some((id, el)) => (id.clone(), el.children.len()),
        None => root_end(ctx.document),
    }
}

fn root_end(doc: &Document) -> (NodeId, usize) {
    (Document::root_id(), doc.root().children.len())
}

fn insert_element(ctx: &mut EditContext<'_>, tag: &str) -> Result<(), MutationError> {
    let tag = validate_tag(tag)?;
    let (parent, index) = insertion_point(ctx);

    let mut el = ctx.tags.build(&tag, ctx.now);
    ctx.document.ids_mut().assign_ids_deep(&mut el);
    let new_id = el.id.clone();

    ctx.document.insert(&parent, index, el.into());
    if let Some(new_id) = new_id {
        ctx.selection.select(ctx.document, &new_id, false);
    }
    Ok(())
}

fn insert_component(ctx: &mut EditContext<'_>, kind: &str) -> Result<(), MutationError> {
    let nodes = ctx.components.expand(kind)?;
    let (parent, index) = insertion_point(ctx);

    for (offset, mut node) in nodes.into_iter().enumerate() {
        if let Node::Element(el) = &mut node {
            ctx.document.ids_mut().assign_ids_deep(el);
        }
        ctx.document.insert(&parent, index + offset, node);
    }
    Ok(())
}

fn delete_selection(ctx: &mut EditContext<'_>) -> Result<(), MutationError> {
    let targets = match selected_targets(ctx) {
        Ok(targets) => targets,
        Err(_) => {
            let legacy = ctx
                .selection
                .legacy_pointer()
                .filter(|id| ctx.document.resolve_content(id).is_some())
                .cloned();
            legacy.into_iter().collect()
        }
    };
    if targets.is_empty() {
        return Err(MutationError::EmptySelection);
    }

    for id in outermost(ctx.document, &targets) {
        if let Some(removed) = ctx.document.remove(&id) {
            ctx.styles.remove_rules_deep(&removed);
        }
    }

    ctx.selection.clear();
    ctx.selection.set_legacy_pointer(None);
    Ok(())
}

fn clear_document(ctx: &mut EditContext<'_>) -> Result<(), MutationError> {
    ctx.document.reset();
    ctx.styles.clear();
    ctx.selection.clear();
    ctx.selection.set_legacy_pointer(None);
    Ok(())
}

fn retag(ctx: &mut EditContext<'_>, tag: &str) -> Result<(), MutationError> {
    let tag = validate_tag(tag)?;
    let targets = selected_targets(ctx)?;

    if is_void_element(&tag) {
        let has_children = targets
            .iter()
            .filter_map(|id| ctx.document.resolve(id))
            .any(|el| !el.children.is_empty());
        if has_children {
            return Err(MutationError::VoidWithChildren { tag });
        }
    }

    for id in &targets {
        if let Some(el) = ctx.document.resolve_mut(id) {
            let replacement = Element {
                id: el.id.clone(),
                tag: tag.clone(),
                attributes: el.attributes.clone(),
                children: std::mem::take(&mut el.children),
            };
            *el = replacement;
        }
    }

    ctx.selection.replace(targets);
    Ok(())
}

fn wrap_selection(ctx: &mut EditContext<'_>) -> Result<(), MutationError> {
    let targets = selected_targets(ctx)?;
    let targets = ctx
        .document
        .sort_in_document_order(&outermost(ctx.document, &targets));

    let first = targets.first().ok_or(MutationError::EmptySelection)?;
    let (parent, index) = ctx
        .document
        .parent_of(first)
        .ok_or_else(|| MutationError::NodeNotFound(first.clone()))?;

    let wrapper_id = ctx.document.ids_mut().new_id();
    let mut wrapper = Element::new(WRAPPER_TAG).with_id(wrapper_id.clone());

    // Everything removed lies at or after `index` in document order, so the
    // first target's slot is still valid once they are gone.
    for id in &targets {
        if let Some(el) = ctx.document.remove(id) {
            wrapper.children.push(el.into());
        }
    }
    ctx.document.insert(&parent, index, wrapper.into());

    ctx.selection.replace(vec![wrapper_id]);
    Ok(())
}

fn duplicate(ctx: &mut EditContext<'_>, id: &NodeId) -> Result<(), MutationError> {
    let mut copy = content_element(ctx.document, id)?.clone();
    let (parent, index) = ctx
        .document
        .parent_of(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;

    for (old, new) in ctx.document.ids_mut().reassign_ids_deep(&mut copy) {
        ctx.styles.copy_rules(&old, &new);
    }
    let copy_id = copy.id.clone();

    ctx.document.insert(&parent, index + 1, copy.into());
    if let Some(copy_id) = copy_id {
        ctx.selection.select(ctx.document, &copy_id, false);
    }
    Ok(())
}

fn commit_text(ctx: &mut EditContext<'_>, id: &NodeId, text: &str) -> Result<(), MutationError> {
    let el = content_element(ctx.document, id)?;
    if el.is_void() {
        return Err(MutationError::NotTextBearing(el.tag.clone()));
    }
    if let Some(el) = ctx.document.resolve_mut(id) {
        el.set_text(text);
    }
    Ok(())
}

fn apply_properties(ctx: &mut EditContext<'_>, fields: &PropertyFields) -> Result<(), MutationError> {
    let targets = selected_targets(ctx)?;
    let style = fields.style_properties();
    validate_style(&style)?;

    for id in &targets {
        // A target may vanish when an earlier one's text overwrite removes it
        let Some(el) = ctx.document.resolve_mut(id) else {
            tracing::debug!(node = %id, "skipping stale bulk apply target");
            continue;
        };
        fields.apply_content(el);
        if !style.is_empty() {
            ctx.styles.set_rules(el, &style);
        }
    }
    Ok(())
}

fn set_style(
    ctx: &mut EditContext<'_>,
    id: &NodeId,
    properties: &[(String, String)],
) -> Result<(), MutationError> {
    content_element(ctx.document, id)?;
    validate_style(properties)?;
    if let Some(el) = ctx.document.resolve_mut(id) {
        ctx.styles.set_rules(el, properties);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        document: Document,
        selection: SelectionManager,
        styles: StyleSheet,
        theme: Theme,
        tags: TagDefaults,
        components: ComponentRegistry,
    }

    impl Fixture {
        fn new(markup: &str) -> Self {
            Self {
                document: Document::from_markup("test", markup).unwrap(),
                selection: SelectionManager::new(),
                styles: StyleSheet::new(),
                theme: Theme::default(),
                tags: TagDefaults::standard(),
                components: ComponentRegistry::standard(),
            }
        }

        fn apply(&mut self, mutation: Mutation) -> Result<(), MutationError> {
            let mut ctx = EditContext {
                document: &mut self.document,
                selection: &mut self.selection,
                styles: &mut self.styles,
                theme: &mut self.theme,
                tags: &self.tags,
                components: &self.components,
                now: DateTime::<Utc>::UNIX_EPOCH,
            };
            mutation.apply(&mut ctx)
        }

        fn select(&mut self, ids: &[&str]) {
            self.selection
                .replace(ids.iter().map(|id| NodeId::new(*id)).collect());
        }
    }

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    #[test]
    fn test_validate_tag() {
        assert_eq!(validate_tag("Section").unwrap(), "section");
        assert_eq!(validate_tag("h2").unwrap(), "h2");
        assert!(validate_tag("my-tag").is_err());
        assert!(validate_tag("2col").is_err());
        assert!(validate_tag("").is_err());
        assert!(validate_tag("div onclick").is_err());
    }

    #[test]
    fn test_insert_into_primary() {
        let mut fx = Fixture::new(r#"<section data-node-id="s"></section>"#);
        fx.select(&["s"]);

        fx.apply(Mutation::InsertElement { tag: "p".into() }).unwrap();

        let section = fx.document.resolve(&id("s")).unwrap();
        assert_eq!(section.element_count(), 1);
        let new_id = fx.selection.primary().unwrap().clone();
        assert!(fx.document.is_ancestor(&id("s"), &new_id));
    }

    #[test]
    fn test_insert_after_void_primary() {
        let mut fx = Fixture::new(r#"<img data-node-id="i" src="a.png"><p data-node-id="p">x</p>"#);
        fx.select(&["i"]);

        fx.apply(Mutation::InsertElement { tag: "h2".into() }).unwrap();

        let tags: Vec<&str> = fx.document.root().elements().map(|el| el.tag.as_str()).collect();
        assert_eq!(tags, vec!["img", "h2", "p"]);
    }

    #[test]
    fn test_insert_component_does_not_select() {
        let mut fx = Fixture::new("");
        fx.apply(Mutation::InsertComponent { kind: "hero".into() }).unwrap();

        assert!(fx.selection.is_empty());
        assert!(fx.document.root().elements().all(|el| el.id.is_some()));
        assert!(fx.document.element_count() > 1);
    }

    #[test]
    fn test_delete_nested_selection() {
        let mut fx = Fixture::new(
            r#"<section data-node-id="s"><p data-node-id="p">x</p></section><p data-node-id="q">y</p>"#,
        );
        fx.select(&["p", "s"]);

        fx.apply(Mutation::DeleteSelection).unwrap();

        assert!(!fx.document.contains(&id("s")));
        assert!(fx.document.contains(&id("q")));
        assert!(fx.selection.is_empty());
    }

    #[test]
    fn test_delete_uses_legacy_pointer() {
        let mut fx = Fixture::new(r#"<p data-node-id="p">x</p>"#);
        fx.selection.set_legacy_pointer(Some(id("p")));

        fx.apply(Mutation::DeleteSelection).unwrap();

        assert_eq!(fx.document.element_count(), 0);
        assert_eq!(fx.selection.legacy_pointer(), None);
    }

    #[test]
    fn test_retag_rejects_void_with_children() {
        let mut fx = Fixture::new(r#"<p data-node-id="p">text</p>"#);
        fx.select(&["p"]);

        let before = fx.document.markup();
        assert!(matches!(
            fx.apply(Mutation::Retag { tag: "img".into() }),
            Err(MutationError::VoidWithChildren { .. })
        ));
        assert_eq!(fx.document.markup(), before);
    }

    #[test]
    fn test_wrap_single_node() {
        let mut fx = Fixture::new(r#"<p data-node-id="a">1</p><p data-node-id="b">2</p>"#);
        fx.select(&["b"]);

        fx.apply(Mutation::WrapSelection).unwrap();

        let root = fx.document.root();
        assert_eq!(root.elements().count(), 2);
        let wrapper = root.elements().nth(1).unwrap();
        assert_eq!(wrapper.tag, WRAPPER_TAG);
        assert!(wrapper.contains(&id("b")));
    }

    #[test]
    fn test_duplicate_copies_rules() {
        let mut fx = Fixture::new(r#"<p data-node-id="a">1</p>"#);
        fx.apply(Mutation::SetStyle {
            node_id: id("a"),
            properties: vec![("color".into(), "red".into())],
        })
        .unwrap();

        fx.apply(Mutation::Duplicate { node_id: id("a") }).unwrap();

        let copy_id = fx.selection.primary().unwrap().clone();
        assert_ne!(copy_id, id("a"));
        assert_eq!(fx.styles.property(&copy_id, "color"), Some("red"));
        assert_eq!(fx.document.parent_of(&copy_id), Some((Document::root_id(), 1)));
    }

    #[test]
    fn test_set_style_rejects_rule_breakout() {
        let mut fx = Fixture::new(r#"<p data-node-id="a">1</p>"#);
        let before = fx.document.markup();

        for value in [
            "red; } body { display: none",
            "red}</style><script>alert(1)</script>",
            "red\nbackground: blue",
        ] {
            let result = fx.apply(Mutation::SetStyle {
                node_id: id("a"),
                properties: vec![("color".into(), "green".into()), ("background".into(), value.into())],
            });
            assert!(matches!(result, Err(MutationError::InvalidStyle { .. })));
        }

        assert!(fx.styles.is_empty());
        assert_eq!(fx.document.markup(), before);
    }

    #[test]
    fn test_apply_properties_rejects_breakout_before_content_edit() {
        let mut fx = Fixture::new(r#"<p data-node-id="a">1</p>"#);
        fx.select(&["a"]);

        let fields = PropertyFields {
            text: Some("changed".into()),
            color: Some("red;} * { color: blue".into()),
            ..Default::default()
        };
        assert!(matches!(
            fx.apply(Mutation::ApplyProperties { fields }),
            Err(MutationError::InvalidStyle { .. })
        ));
        assert_eq!(fx.document.resolve(&id("a")).unwrap().text(), "1");
        assert!(fx.styles.is_empty());
    }

    #[test]
    fn test_set_style_keeps_data_url() {
        let mut fx = Fixture::new(r#"<p data-node-id="a">1</p>"#);
        let url = "url(data:image/png;base64,iVBO)";

        fx.apply(Mutation::SetStyle {
            node_id: id("a"),
            properties: vec![("backgroundImage".into(), url.into())],
        })
        .unwrap();

        let el = fx.document.resolve(&id("a")).unwrap();
        assert_eq!(el.inline_style("background-image").as_deref(), Some(url));
        assert_eq!(fx.styles.property(&id("a"), "background-image"), Some(url));
    }

    #[test]
    fn test_root_is_never_a_target() {
        let mut fx = Fixture::new("");
        assert_eq!(
            fx.apply(Mutation::Duplicate {
                node_id: Document::root_id()
            }),
            Err(MutationError::RootNotEditable)
        );
        assert_eq!(
            fx.apply(Mutation::SetStyle {
                node_id: Document::root_id(),
                properties: vec![("color".into(), "red".into())],
            }),
            Err(MutationError::RootNotEditable)
        );
    }

    #[test]
    fn test_commit_text_rejects_void() {
        let mut fx = Fixture::new(r#"<img data-node-id="i" src="a.png">"#);
        assert!(matches!(
            fx.apply(Mutation::CommitText {
                node_id: id("i"),
                text: "x".into()
            }),
            Err(MutationError::NotTextBearing(_))
        ));
    }

    #[test]
    fn test_set_theme_validates() {
        let mut fx = Fixture::new("");
        assert!(fx.apply(Mutation::SetTheme { color: "purple".into() }).is_err());
        assert_eq!(fx.theme, Theme::default());

        fx.apply(Mutation::SetTheme { color: "#e63946".into() }).unwrap();
        assert_eq!(fx.theme.to_hex(), "#e63946");
    }

    #[test]
    fn test_mutation_json() {
        let json = serde_json::to_string(&Mutation::Retag { tag: "h2".into() }).unwrap();
        assert_eq!(json, r#"{"Retag":{"tag":"h2"}}"#);
        let back: Mutation = serde_json::from_str(r#""WrapSelection""#).unwrap();
        assert_eq!(back, Mutation::WrapSelection);
    }
}
