use super::open_session;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sitecraft_editor::{EditorSession, StyleSheet};
use sitecraft_parser::{Element, Node};
use std::fmt::Write;
use std::path::PathBuf;

const TEXT_PREVIEW_CHARS: usize = 40;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Snapshot record to inspect (defaults to the autosave record)
    #[arg(short, long)]
    pub record: Option<PathBuf>,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let session = open_session(args.record.as_deref(), &config, cwd)?;

    print!("{}", outline(&session));
    println!();
    println!(
        "{} {} elements, {} style rules, accent {}",
        "Total:".bright_white().bold(),
        session.element_count(),
        session.styles().len(),
        session.theme().to_hex()
    );

    Ok(())
}

/// Indented tree listing, one element per line
pub fn outline(session: &EditorSession) -> String {
    let mut out = String::new();
    write_element(&mut out, session.document().root(), session.styles(), 0);
    out
}

fn write_element(out: &mut String, el: &Element, styles: &StyleSheet, depth: usize) {
    let indent = "  ".repeat(depth);
    let id = el.id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
    let _ = write!(out, "{}<{}> [{}]", indent, el.tag, id);

    if let Some(html_id) = el.attributes.get("id") {
        let _ = write!(out, " #{}", html_id);
    }
    if let Some(class) = el.attributes.get("class") {
        for name in class.split_whitespace() {
            let _ = write!(out, " .{}", name);
        }
    }
    if let Some(rules) = el.id.as_ref().and_then(|id| styles.rules_for(id)) {
        let _ = write!(out, " {{{} rules}}", rules.declarations.len());
    }

    let text = direct_text(el);
    if !text.is_empty() {
        let _ = write!(out, " \"{}\"", preview(&text));
    }
    out.push('\n');

    for child in el.elements() {
        write_element(out, child, styles, depth + 1);
    }
}

fn direct_text(el: &Element) -> String {
    el.children
        .iter()
        .filter_map(|child| match child {
            Node::Text { content } => Some(content.trim()),
            Node::Element(_) => None,
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn preview(text: &str) -> String {
    if text.chars().count() <= TEXT_PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecraft_editor::styles::property_map;
    use sitecraft_editor::EditorConfig;

    #[test]
    fn test_outline_lists_ids_and_rules() {
        let mut session = EditorSession::new(EditorConfig::default());
        session.clear_selection();
        session.insert_element("h2").unwrap();
        let id = session.selection().primary().unwrap().clone();
        session
            .set_style_properties(&id, property_map([("fontSize", "24px"), ("color", "red")]))
            .unwrap();

        let text = outline(&session);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("<div> [root] #designRoot"));
        assert!(lines[1].starts_with("  <h1> ["));
        assert!(lines[1].contains("\"Welcome to Website Builder\""));
        let h2 = lines.iter().find(|l| l.contains(&format!("[{}]", id))).unwrap();
        assert!(h2.starts_with("  <h2>"));
        assert!(h2.contains("{2 rules}"));
        assert_eq!(lines.len(), session.element_count() + 1);
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "a".repeat(60);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), TEXT_PREVIEW_CHARS + 1);
        assert!(cut.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }
}
