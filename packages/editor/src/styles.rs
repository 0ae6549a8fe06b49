//! # Style Rule Table
//!
//! Per-node style rules keyed by stable node ID, kept alongside the tree.
//!
//! Every write also lands on the node's inline `style` attribute so the
//! live canvas reflects it immediately. At export time the table is the
//! source of truth: inline declarations it overrides are stripped and the
//! table is emitted as rule text.

use serde::{Deserialize, Serialize};
use sitecraft_parser::{is_safe_value, to_kebab_case, Element, NodeId};

/// Ordered property/value pairs
pub type PropertyMap = Vec<(String, String)>;

/// Values that mean "remove this property"
const UNSET_VALUES: &[&str] = &["", "null", "auto", "normal"];

pub fn is_unset(value: &str) -> bool {
    let value = value.trim();
    UNSET_VALUES.iter().any(|unset| value.eq_ignore_ascii_case(unset))
}

/// First pair that cannot be written as a single declaration.
///
/// Names must be plain (optionally `--`-prefixed) identifiers. Values must
/// not contain braces, angle brackets, line breaks, unbalanced quotes or
/// parentheses, or a `;` outside quotes and parentheses. Unset values and
/// empty names are always accepted.
pub fn find_unsafe(properties: &[(String, String)]) -> Option<&(String, String)> {
    properties.iter().find(|(name, value)| {
        let name = to_kebab_case(name);
        let name_ok = name.is_empty() || is_property_name(&name);
        let value_ok = is_unset(value) || is_safe_value(value.trim());
        !(name_ok && value_ok)
    })
}

fn is_property_name(name: &str) -> bool {
    let body = name.trim_start_matches('-');
    name.len() - body.len() <= 2
        && body.starts_with(|c: char| c.is_ascii_alphabetic())
        && body.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Build a property map from borrowed pairs
pub fn property_map<K: Into<String>, V: Into<String>>(
    pairs: impl IntoIterator<Item = (K, V)>,
) -> PropertyMap {
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Declarations targeting one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBlock {
    pub node_id: NodeId,
    pub declarations: PropertyMap,
}

impl RuleBlock {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Rule text for this block
    pub fn to_css(&self) -> String {
        let mut css = format!("{} {{\n", self.node_id.selector());
        for (name, value) in &self.declarations {
            css.push_str(&format!("  {}: {};\n", name, value));
        }
        css.push('}');
        css
    }
}

/// Rule table, at most one block per node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet {
    blocks: Vec<RuleBlock>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge properties into the node's block and mirror them inline.
    ///
    /// Property names are normalized to kebab-case. Unset values remove the
    /// property. Pairs rejected by [`find_unsafe`] are skipped. The merged
    /// block replaces the previous one at the end of the table; a block left
    /// with no declarations is dropped. Returns false when the node has no
    /// identifier.
    pub fn set_rules(&mut self, el: &mut Element, properties: &[(String, String)]) -> bool {
        let Some(id) = el.id.clone() else {
            return false;
        };

        let mut declarations = self.take_block(&id).map(|b| b.declarations).unwrap_or_default();

        for pair in properties {
            let (name, value) = pair;
            let name = to_kebab_case(name.trim());
            if name.is_empty() {
                continue;
            }
            if find_unsafe(std::slice::from_ref(pair)).is_some() {
                tracing::warn!(property = %name, "skipping unsafe style declaration");
                continue;
            }

            if is_unset(value) {
                declarations.retain(|(existing, _)| *existing != name);
                el.remove_inline_style(&name);
                continue;
            }

            let value = value.trim().to_string();
            match declarations.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value.clone(),
                None => declarations.push((name.clone(), value.clone())),
            }
            el.set_inline_style(&name, &value);
        }

        if !declarations.is_empty() {
            self.blocks.push(RuleBlock {
                node_id: id,
                declarations,
            });
        }
        true
    }

    /// Drop the node's block. Returns true if one existed.
    pub fn remove_rules(&mut self, id: &NodeId) -> bool {
        self.take_block(id).is_some()
    }

    /// Drop blocks for a detached subtree
    pub fn remove_rules_deep(&mut self, el: &Element) -> usize {
        el.ids().iter().filter(|id| self.remove_rules(id)).count()
    }

    /// Give `to` a copy of `from`'s declarations
    pub fn copy_rules(&mut self, from: &NodeId, to: &NodeId) -> bool {
        let Some(declarations) = self.rules_for(from).map(|b| b.declarations.clone()) else {
            return false;
        };
        self.take_block(to);
        self.blocks.push(RuleBlock {
            node_id: to.clone(),
            declarations,
        });
        true
    }

    /// Drop blocks whose node no longer exists in `root`
    pub fn prune(&mut self, root: &Element) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|block| root.contains(&block.node_id));
        before - self.blocks.len()
    }

    pub fn rules_for(&self, id: &NodeId) -> Option<&RuleBlock> {
        self.blocks.iter().find(|b| b.node_id == *id)
    }

    pub fn property(&self, id: &NodeId, property: &str) -> Option<&str> {
        self.rules_for(id)?.get(&to_kebab_case(property))
    }

    pub fn blocks(&self) -> &[RuleBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Accumulated rule text, one block per node in table order
    pub fn css_text(&self) -> String {
        self.blocks
            .iter()
            .map(RuleBlock::to_css)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Copy of the tree with inline declarations the table overrides removed
    pub fn project_for_export(&self, root: &Element) -> Element {
        let mut projected = root.clone();
        projected.for_each_element_mut(&mut |el| {
            let Some(block) = el.id.as_ref().and_then(|id| self.rules_for(id)) else {
                return;
            };
            for (name, _) in &block.declarations {
                el.remove_inline_style(name);
            }
        });
        projected
    }

    fn take_block(&mut self, id: &NodeId) -> Option<RuleBlock> {
        let pos = self.blocks.iter().position(|b| b.node_id == *id)?;
        Some(self.blocks.remove(pos))
    }
}

/// Box-model property edited by the spacing control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpacingProperty {
    Margin,
    Padding,
}

impl SpacingProperty {
    pub fn name(self) -> &'static str {
        match self {
            SpacingProperty::Margin => "margin",
            SpacingProperty::Padding => "padding",
        }
    }

    fn side(self, side: &str) -> String {
        format!("{}-{}", self.name(), side)
    }
}

/// Spacing control edit: one shorthand when linked, four sides when not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum SpacingEdit {
    Linked {
        property: SpacingProperty,
        value: String,
    },
    Unlinked {
        property: SpacingProperty,
        top: String,
        right: String,
        bottom: String,
        left: String,
    },
}

impl SpacingEdit {
    /// Properties to hand to [`StyleSheet::set_rules`]
    ///
    /// Linked writes the shorthand and clears the longhands; unlinked writes
    /// the longhands and clears the shorthand.
    pub fn to_properties(&self) -> PropertyMap {
        match self {
            SpacingEdit::Linked { property, value } => {
                let mut props = vec![(property.name().to_string(), value.clone())];
                for side in ["top", "right", "bottom", "left"] {
                    props.push((property.side(side), String::new()));
                }
                props
            }
            SpacingEdit::Unlinked {
                property,
                top,
                right,
                bottom,
                left,
            } => vec![
                (property.name().to_string(), String::new()),
                (property.side("top"), top.clone()),
                (property.side("right"), right.clone()),
                (property.side("bottom"), bottom.clone()),
                (property.side("left"), left.clone()),
            ],
        }
    }
}
