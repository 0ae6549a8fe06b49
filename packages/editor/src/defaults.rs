//! Default content for newly inserted elements, keyed by tag

use chrono::{DateTime, Datelike, Utc};
use sitecraft_parser::Element;
use std::collections::HashMap;

/// Builds the initial element for a tag at the given session time
pub type DefaultBuilder = fn(&str, DateTime<Utc>) -> Element;

/// Tags whose text can be edited in place
pub const TEXT_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "a", "button", "li", "span", "label", "blockquote",
    "small", "strong", "em", "td", "th", "figcaption",
];

pub fn is_text_bearing(tag: &str) -> bool {
    TEXT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Tag → default content registry
#[derive(Debug, Clone)]
pub struct TagDefaults {
    builders: HashMap<String, DefaultBuilder>,
}

impl TagDefaults {
    pub fn empty() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registry with the built-in palette
    pub fn standard() -> Self {
        let mut defaults = Self::empty();
        defaults.register("img", image);
        defaults.register("a", link);
        defaults.register("button", button);
        defaults.register("ul", list);
        defaults.register("ol", list);
        defaults.register("h1", heading);
        defaults.register("h2", heading);
        defaults.register("p", paragraph);
        defaults.register("section", section);
        defaults.register("footer", footer);
        defaults.register("div", container);
        defaults
    }

    pub fn register(&mut self, tag: impl Into<String>, builder: DefaultBuilder) {
        self.builders.insert(tag.into().to_ascii_lowercase(), builder);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.builders.contains_key(&tag.to_ascii_lowercase())
    }

    /// Build a fresh element; unknown tags get an empty element
    pub fn build(&self, tag: &str, now: DateTime<Utc>) -> Element {
        let tag = tag.to_ascii_lowercase();
        match self.builders.get(&tag) {
            Some(builder) => builder(&tag, now),
            None => Element::new(tag),
        }
    }
}

impl Default for TagDefaults {
    fn default() -> Self {
        Self::standard()
    }
}

fn image(tag: &str, _now: DateTime<Utc>) -> Element {
    Element::new(tag)
        .with_attr("src", "https://placehold.co/800x400?text=Image+Placeholder")
        .with_attr("alt", "Placeholder image")
        .with_style("display", "block")
        .with_style("max-width", "100%")
        .with_style("border-radius", "8px")
}

fn link(tag: &str, _now: DateTime<Utc>) -> Element {
    Element::new(tag)
        .with_attr("href", "https://example.com")
        .with_attr("class", "btn")
        .with_text("Example Link")
}

fn button(tag: &str, _now: DateTime<Utc>) -> Element {
    Element::new(tag).with_attr("class", "btn").with_text("Click Me")
}

fn list(tag: &str, _now: DateTime<Utc>) -> Element {
    (1..=3).fold(Element::new(tag), |list, n| {
        list.with_child(Element::new("li").with_text(format!("Item {}", n)))
    })
}

fn heading(tag: &str, _now: DateTime<Utc>) -> Element {
    let level = tag.trim_start_matches('h');
    Element::new(tag).with_text(format!("Heading {}", level))
}

fn paragraph(tag: &str, _now: DateTime<Utc>) -> Element {
    Element::new(tag).with_text(
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.",
    )
}

fn section(tag: &str, _now: DateTime<Utc>) -> Element {
    Element::new(tag)
        .with_style("padding", "30px")
        .with_style("margin", "20px 0")
        .with_style("background", "#f8f9fa")
        .with_style("border-radius", "12px")
        .with_child(Element::new("h2").with_text("Section Title"))
        .with_child(
            Element::new("p")
                .with_text("Section content goes here. You can edit this text with the properties panel."),
        )
}

fn footer(tag: &str, now: DateTime<Utc>) -> Element {
    Element::new(tag)
        .with_style("padding", "30px")
        .with_style("margin-top", "40px")
        .with_style("background", "#343a40")
        .with_style("color", "white")
        .with_style("text-align", "center")
        .with_style("border-radius", "12px")
        .with_text(format!(
            "\u{a9} {} My Website. All rights reserved.",
            now.year()
        ))
}

fn container(tag: &str, _now: DateTime<Utc>) -> Element {
    Element::new(tag)
        .with_style("padding", "20px")
        .with_style("margin", "15px 0")
        .with_style("border", "2px dashed #e9ecef")
        .with_style("border-radius", "12px")
        .with_text("Container content")
}
