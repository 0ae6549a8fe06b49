//! Property panel values: the prefill read from a node and the bulk edit
//! written back to every selected node.

use crate::styles::{PropertyMap, StyleSheet};
use serde::{Deserialize, Serialize};
use sitecraft_parser::Element;

/// Style properties surfaced by the property panel
pub const PANEL_STYLE_PROPERTIES: &[&str] = &["background-color", "color", "padding", "margin"];

/// Property panel fields
///
/// `None` means "leave untouched" when applying; when prefilling, every
/// field that applies to the node is `Some` (possibly empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

impl PropertyFields {
    /// Read the panel values for a node. Style values come from the rule
    /// table first, then from inline declarations.
    pub fn prefill(el: &Element, styles: &StyleSheet) -> Self {
        let attr = |name: &str| Some(el.attributes.get(name).unwrap_or_default().to_string());
        let style = |property: &str| {
            let value = el
                .id
                .as_ref()
                .and_then(|id| styles.property(id, property).map(str::to_string))
                .or_else(|| el.inline_style(property))
                .unwrap_or_default();
            Some(value)
        };

        let is_img = el.tag.eq_ignore_ascii_case("img");
        let is_link = el.tag.eq_ignore_ascii_case("a");

        Self {
            text: if el.is_void() { None } else { Some(el.text()) },
            id: attr("id"),
            class: attr("class"),
            src: if is_img { attr("src") } else { None },
            alt: if is_img { attr("alt") } else { None },
            href: if is_link { attr("href") } else { None },
            background_color: style("background-color"),
            color: style("color"),
            padding: style("padding"),
            margin: style("margin"),
        }
    }

    /// Style half of the edit, ready for the rule table
    pub fn style_properties(&self) -> PropertyMap {
        let values = [&self.background_color, &self.color, &self.padding, &self.margin];
        PANEL_STYLE_PROPERTIES
            .iter()
            .zip(values)
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
            .collect()
    }

    /// Apply the content half of the edit (text and attributes) to one node.
    /// Tag-specific attributes only land on matching tags.
    pub fn apply_content(&self, el: &mut Element) {
        if let Some(text) = &self.text {
            if !el.is_void() {
                el.set_text(text.clone());
            }
        }

        set_or_remove(el, "id", &self.id);
        set_or_remove(el, "class", &self.class);

        if el.tag.eq_ignore_ascii_case("img") {
            set_or_remove(el, "src", &self.src);
            set_or_remove(el, "alt", &self.alt);
        }
        if el.tag.eq_ignore_ascii_case("a") {
            set_or_remove(el, "href", &self.href);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn set_or_remove(el: &mut Element, name: &str, value: &Option<String>) {
    match value.as_deref().map(str::trim) {
        Some("") => {
            el.attributes.remove(name);
        }
        Some(value) => el.attributes.set(name, value),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecraft_parser::NodeId;

    #[test]
    fn test_prefill_image() {
        let el = Element::new("img")
            .with_id(NodeId::new("i"))
            .with_attr("src", "a.png")
            .with_attr("alt", "A")
            .with_style("padding", "4px");

        let fields = PropertyFields::prefill(&el, &StyleSheet::new());
        assert_eq!(fields.src.as_deref(), Some("a.png"));
        assert_eq!(fields.alt.as_deref(), Some("A"));
        assert_eq!(fields.href, None);
        assert_eq!(fields.text, None);
        assert_eq!(fields.padding.as_deref(), Some("4px"));
        assert_eq!(fields.margin.as_deref(), Some(""));
    }

    #[test]
    fn test_prefill_prefers_rule_table() {
        let mut el = Element::new("p").with_id(NodeId::new("p1")).with_text("Hi");
        let mut styles = StyleSheet::new();
        styles.set_rules(&mut el, &[("color".to_string(), "red".to_string())]);
        el.set_inline_style("color", "blue");

        let fields = PropertyFields::prefill(&el, &styles);
        assert_eq!(fields.color.as_deref(), Some("red"));
        assert_eq!(fields.text.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_apply_content_is_tag_aware() {
        let fields = PropertyFields {
            text: Some("New".to_string()),
            href: Some("https://example.org".to_string()),
            class: Some("".to_string()),
            ..Default::default()
        };

        let mut link = Element::new("a").with_attr("class", "btn").with_text("Old");
        fields.apply_content(&mut link);
        assert_eq!(link.text(), "New");
        assert_eq!(link.attributes.get("href"), Some("https://example.org"));
        assert!(!link.attributes.contains("class"));

        let mut para = Element::new("p");
        fields.apply_content(&mut para);
        assert!(!para.attributes.contains("href"));
    }

    #[test]
    fn test_style_properties_only_present_fields() {
        let fields = PropertyFields {
            color: Some("red".to_string()),
            margin: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(
            fields.style_properties(),
            vec![
                ("color".to_string(), "red".to_string()),
                ("margin".to_string(), "".to_string()),
            ]
        );
    }
}
