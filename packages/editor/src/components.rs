//! Prebuilt multi-node blocks inserted verbatim into the tree

use crate::mutations::MutationError;
use sitecraft_parser::{parse_fragment, Node};
use std::collections::BTreeMap;

const HERO: &str = concat!(
    r#"<section style="padding: 80px 20px; text-align: center; background: #f8f9fa; border-radius: 12px;">"#,
    r#"<h1>Welcome to Our Website</h1>"#,
    r#"<p style="max-width: 600px; margin: 20px auto; font-size: 1.2rem;">This is a hero section. You can customize it with your own content.</p>"#,
    r##"<a href="#" class="btn">Get Started</a>"##,
    r#"</section>"#,
);

const NAV: &str = concat!(
    r#"<nav style="display: flex; justify-content: space-between; align-items: center; padding: 20px; background: #f8f9fa; border-radius: 12px; margin-bottom: 30px;">"#,
    r#"<div style="font-weight: bold; font-size: 1.5rem;">Logo</div>"#,
    r#"<ul style="display: flex; list-style: none; gap: 20px;">"#,
    r##"<li><a href="#">Home</a></li><li><a href="#">About</a></li><li><a href="#">Services</a></li><li><a href="#">Contact</a></li>"##,
    r#"</ul>"#,
    r#"</nav>"#,
);

const CONTACT: &str = concat!(
    r#"<section style="padding: 40px; background: #f8f9fa; border-radius: 12px;">"#,
    r#"<h2>Contact Us</h2>"#,
    r#"<form style="display: grid; gap: 15px; max-width: 600px;">"#,
    r#"<input type="text" placeholder="Your Name" style="padding: 12px; border: 1px solid #ddd; border-radius: 6px;">"#,
    r#"<input type="email" placeholder="Your Email" style="padding: 12px; border: 1px solid #ddd; border-radius: 6px;">"#,
    r#"<textarea placeholder="Your Message" rows="4" style="padding: 12px; border: 1px solid #ddd; border-radius: 6px;"></textarea>"#,
    r#"<button type="submit" class="btn">Send Message</button>"#,
    r#"</form>"#,
    r#"</section>"#,
);

const PRICING_CARD: &str = r#"padding: 30px; background: white; border-radius: 12px; box-shadow: 0 5px 15px rgba(0,0,0,0.08); text-align: center;"#;

/// Named fragment registry
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    fragments: BTreeMap<String, String>,
}

impl ComponentRegistry {
    pub fn empty() -> Self {
        Self {
            fragments: BTreeMap::new(),
        }
    }

    /// Registry with the built-in blocks
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("hero", HERO);
        registry.register("nav", NAV);
        registry.register("contact", CONTACT);
        registry.register("pricing", pricing());
        registry
    }

    pub fn register(&mut self, kind: impl Into<String>, markup: impl Into<String>) {
        self.fragments.insert(kind.into(), markup.into());
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    pub fn markup(&self, kind: &str) -> Option<&str> {
        self.fragments.get(kind).map(String::as_str)
    }

    /// Parse a fragment into fresh nodes (no identifiers yet)
    pub fn expand(&self, kind: &str) -> Result<Vec<Node>, MutationError> {
        let markup = self
            .markup(kind)
            .ok_or_else(|| MutationError::UnknownComponent(kind.to_string()))?;
        parse_fragment(markup).map_err(|source| MutationError::InvalidFragment {
            kind: kind.to_string(),
            source,
        })
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn pricing() -> String {
    let tiers = [("Basic", "$9.99", 3), ("Pro", "$19.99", 4), ("Enterprise", "$29.99", 5)];

    let mut html = String::from(
        r#"<section style="display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px; margin: 40px 0;">"#,
    );
    for (name, price, features) in tiers {
        html.push_str(&format!(r#"<div style="{}">"#, PRICING_CARD));
        html.push_str(&format!("<h3>{}</h3>", name));
        html.push_str(&format!(
            r#"<p style="font-size: 2rem; margin: 20px 0;">{}<span style="font-size: 1rem;">/month</span></p>"#,
            price
        ));
        html.push_str(r#"<ul style="list-style: none; padding: 0; margin: 20px 0;">"#);
        for n in 1..=features {
            html.push_str(&format!("<li>Feature {}</li>", n));
        }
        html.push_str("</ul>");
        html.push_str(r##"<a href="#" class="btn">Get Started</a>"##);
        html.push_str("</div>");
    }
    html.push_str("</section>");
    html
}
