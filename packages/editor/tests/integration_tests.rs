//! Integration tests for the editor session

use chrono::{DateTime, Utc};
use sitecraft_editor::styles::property_map;
use sitecraft_editor::{
    EditorConfig, EditorEvent, EditorSession, ManualClock, MutationError, NodeId, PropertyFields,
    SelectionDisplay, SnapshotRecord, StyleSheet, Theme,
};

fn session_with(markup: &str) -> EditorSession {
    let mut session = EditorSession::with_clock(EditorConfig::default(), ManualClock::default());
    session
        .load_record(SnapshotRecord {
            html: markup.to_string(),
            theme: Theme::default(),
            styles: StyleSheet::new(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        })
        .unwrap();
    session.drain_events();
    session
}

fn id(s: &str) -> NodeId {
    NodeId::new(s)
}

fn root_tags(session: &EditorSession) -> Vec<String> {
    session
        .document()
        .root()
        .elements()
        .map(|el| el.tag.clone())
        .collect()
}

#[test]
fn test_heading_style_export_scenario() {
    let mut session = session_with("");

    session.insert_element("h1").unwrap();
    let h1 = session.selection().primary().unwrap().clone();
    session
        .set_style_properties(&h1, property_map([("fontSize", "32px")]))
        .unwrap();

    let html = session.export();
    println!("{}", html);

    assert!(html.contains(&format!(r#"<h1 data-node-id="{}">Heading 1</h1>"#, h1)));
    assert!(html.contains(&format!("{} {{", h1.selector())));
    assert!(html.contains("font-size: 32px;"));
}

#[test]
fn test_wrap_non_adjacent_paragraphs_scenario() {
    let mut session = session_with(
        r#"<p data-node-id="a">First</p><h2 data-node-id="b">Between</h2><p data-node-id="c">Second</p>"#,
    );

    // selection order is the reverse of document order
    session.select(&id("c"), true);
    session.select(&id("a"), true);
    session.wrap_selection().unwrap();

    assert_eq!(root_tags(&session), vec!["div", "h2"]);

    let wrapper = session.document().root().elements().next().unwrap();
    let children: Vec<&str> = wrapper
        .elements()
        .filter_map(|el| el.id.as_ref().map(NodeId::as_str))
        .collect();
    assert_eq!(children, vec!["a", "c"]);

    let wrapper_id = wrapper.id.clone().unwrap();
    assert_eq!(session.selection().ids(), &[wrapper_id]);
}

#[test]
fn test_delete_with_nothing_selected_scenario() {
    let mut session = session_with(r#"<p data-node-id="a">x</p>"#);
    let markup = session.document().markup();
    let entries = session.history().len();

    assert_eq!(session.delete_selection(), Err(MutationError::EmptySelection));

    assert_eq!(session.document().markup(), markup);
    assert_eq!(session.history().len(), entries);
    assert!(session.drain_events().is_empty());
}

#[test]
fn test_style_idempotence() {
    let mut session = session_with(r#"<p data-node-id="a">x</p>"#);

    for _ in 0..2 {
        session
            .set_style_properties(&id("a"), property_map([("color", "#fff")]))
            .unwrap();
    }

    let css = session.styles().css_text();
    assert_eq!(css.matches(&id("a").selector()).count(), 1);
    assert_eq!(css.matches("color: #fff;").count(), 1);
}

#[test]
fn test_selecting_root_is_a_noop() {
    let mut session = session_with(r#"<p data-node-id="a">x</p>"#);
    session.select(&id("a"), false);

    assert!(!session.select(&NodeId::new(sitecraft_editor::ROOT_ID), false));
    assert_eq!(session.selection().ids(), &[id("a")]);
    assert!(session.drain_events().iter().all(|e| !matches!(e, EditorEvent::TreeChanged { .. })));
}

#[test]
fn test_delete_removes_from_selection_and_rules() {
    let mut session = session_with(r#"<p data-node-id="a">x</p><p data-node-id="b">y</p>"#);
    session
        .set_style_properties(&id("a"), property_map([("color", "red")]))
        .unwrap();

    session.select(&id("a"), false);
    session.delete_selection().unwrap();

    assert!(session.selection().is_empty());
    assert!(session.styles().rules_for(&id("a")).is_none());
    assert_eq!(session.element_count(), 1);
}

#[test]
fn test_undo_redo_round_trip() {
    let mut session = session_with(r#"<section data-node-id="s"><p data-node-id="p">x</p></section>"#);
    let before = session.document().markup();

    session.select(&id("s"), false);
    session.insert_component("pricing").unwrap();
    let after = session.document().markup();
    assert_ne!(before, after);

    assert!(session.undo());
    assert_eq!(session.document().markup(), before);
    assert!(session.selection().is_empty());

    assert!(session.redo());
    assert_eq!(session.document().markup(), after);
    assert!(!session.redo());
}

#[test]
fn test_undo_restores_theme_and_rules() {
    let mut session = session_with(r#"<p data-node-id="a">x</p>"#);

    session
        .set_style_properties(&id("a"), property_map([("color", "red")]))
        .unwrap();
    session.set_theme("#e63946").unwrap();
    assert!(session.export().contains("#c81b28"));

    session.undo();
    assert_eq!(session.theme(), Theme::default());
    assert_eq!(session.styles().property(&id("a"), "color"), Some("red"));

    session.undo();
    assert!(session.styles().is_empty());
    assert_eq!(session.document().resolve(&id("a")).unwrap().inline_style("color"), None);
}

#[test]
fn test_invalid_theme_rejected() {
    let mut session = session_with("");
    assert!(matches!(
        session.set_theme("banana"),
        Err(MutationError::InvalidTheme(_))
    ));
    assert_eq!(session.theme(), Theme::default());
}

#[test]
fn test_retag_keeps_identity_children_and_rules() {
    let mut session = session_with(
        r#"<p data-node-id="a" class="lead">Hello <strong data-node-id="s">there</strong></p><p data-node-id="b">x</p>"#,
    );
    session
        .set_style_properties(&id("a"), property_map([("color", "red")]))
        .unwrap();

    session.select(&id("a"), false);
    session.select(&id("b"), true);
    session.retag("H2").unwrap();

    let a = session.document().resolve(&id("a")).unwrap();
    assert_eq!(a.tag, "h2");
    assert_eq!(a.attributes.get("class"), Some("lead"));
    assert!(a.contains(&id("s")));
    assert_eq!(session.document().resolve(&id("b")).unwrap().tag, "h2");
    assert_eq!(session.selection().ids(), &[id("a"), id("b")]);
    assert_eq!(session.styles().property(&id("a"), "color"), Some("red"));
}

#[test]
fn test_retag_invalid_changes_nothing() {
    let mut session = session_with(r#"<p data-node-id="a">x</p>"#);
    session.select(&id("a"), false);
    let markup = session.document().markup();

    assert!(matches!(
        session.retag("h1><script"),
        Err(MutationError::InvalidTag(_))
    ));
    assert_eq!(session.document().markup(), markup);
    assert_eq!(session.selection().ids(), &[id("a")]);
}

#[test]
fn test_bulk_apply_hits_every_selected_node() {
    let mut session = session_with(
        r#"<p data-node-id="a">x</p><a data-node-id="l" href="/old">y</a><img data-node-id="i" src="a.png">"#,
    );
    for node in ["a", "l", "i"] {
        session.select(&id(node), true);
    }

    session
        .apply_bulk_properties(PropertyFields {
            class: Some("note".to_string()),
            href: Some("/new".to_string()),
            color: Some("navy".to_string()),
            padding: Some("auto".to_string()),
            ..Default::default()
        })
        .unwrap();

    let doc = session.document();
    for node in ["a", "l", "i"] {
        let el = doc.resolve(&id(node)).unwrap();
        assert_eq!(el.attributes.get("class"), Some("note"));
        assert_eq!(session.styles().property(&id(node), "color"), Some("navy"));
        assert_eq!(session.styles().property(&id(node), "padding"), None);
    }
    assert_eq!(doc.resolve(&id("l")).unwrap().attributes.get("href"), Some("/new"));
    assert!(!doc.resolve(&id("a")).unwrap().attributes.contains("href"));
}

#[test]
fn test_bulk_text_overwrite_drops_nested_targets() {
    let mut session = session_with(r#"<div data-node-id="d"><p data-node-id="p">x</p></div>"#);
    session.select(&id("d"), false);
    session.select(&id("p"), true);

    session
        .apply_bulk_properties(PropertyFields {
            text: Some("flat".to_string()),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(session.document().resolve(&id("d")).unwrap().text(), "flat");
    assert_eq!(session.selection().ids(), &[id("d")]);
}

#[test]
fn test_duplicate_inserts_after_source() {
    let mut session = session_with(
        r#"<section data-node-id="s"><h2 data-node-id="h">T</h2></section><p data-node-id="p">x</p>"#,
    );
    session
        .set_style_properties(&id("h"), property_map([("color", "red")]))
        .unwrap();

    session.duplicate(&id("s")).unwrap();

    assert_eq!(root_tags(&session), vec!["section", "section", "p"]);
    let copy = session.document().root().elements().nth(1).unwrap();
    let copy_heading = copy.elements().next().unwrap().id.clone().unwrap();
    assert_ne!(copy_heading, id("h"));
    assert_eq!(session.styles().property(&copy_heading, "color"), Some("red"));
}

#[test]
fn test_clear_document_is_undoable() {
    let mut session = session_with(r#"<p data-node-id="a">x</p>"#);
    session
        .set_style_properties(&id("a"), property_map([("color", "red")]))
        .unwrap();

    session.clear_document().unwrap();
    assert!(session.document().markup().contains("Welcome to Website Builder"));
    assert!(session.styles().is_empty());

    session.undo();
    assert!(session.document().contains(&id("a")));
    assert!(!session.styles().is_empty());
}

#[test]
fn test_insert_component_targets_primary_without_selecting() {
    let mut session = session_with(r#"<section data-node-id="s"></section>"#);
    session.select(&id("s"), false);

    session.insert_component("nav").unwrap();

    let section = session.document().resolve(&id("s")).unwrap();
    assert_eq!(section.elements().next().map(|el| el.tag.as_str()), Some("nav"));
    assert_eq!(session.selection().ids(), &[id("s")]);
    assert!(matches!(
        session.insert_component("carousel"),
        Err(MutationError::UnknownComponent(_))
    ));
}

#[test]
fn test_operation_events() {
    let mut session = session_with("");
    session.insert_element("button").unwrap();

    let events = session.drain_events();
    assert!(events.contains(&EditorEvent::TreeChanged { element_count: 1 }));
    assert!(events.contains(&EditorEvent::HistoryChanged {
        can_undo: true,
        can_redo: false
    }));
    let selection = events.iter().find_map(|e| match e {
        EditorEvent::SelectionChanged { summary, fields } => Some((summary.clone(), fields.clone())),
        _ => None,
    });
    let (summary, fields) = selection.unwrap();
    assert_eq!(summary, "Selected: <button>");
    assert_eq!(fields.and_then(|f| f.text), Some("Click Me".to_string()));
}

#[test]
fn test_selection_display_modes() {
    let mut session = session_with(r#"<p data-node-id="a">x</p><p data-node-id="b">y</p>"#);
    assert_eq!(session.selection().display(), SelectionDisplay::None);

    session.select(&id("a"), false);
    session.select(&id("b"), true);
    assert_eq!(
        session.selection().display(),
        SelectionDisplay::Group(vec![id("a"), id("b")])
    );
    assert_eq!(session.summary(), "Selected: 2 elements");

    assert!(session.clear_selection());
    assert_eq!(session.summary(), "No element selected");
}

#[test]
fn test_spacing_edit_through_session() {
    let mut session = session_with(r#"<div data-node-id="d"></div>"#);
    let edit = sitecraft_editor::SpacingEdit::Linked {
        property: sitecraft_editor::SpacingProperty::Margin,
        value: "12px".to_string(),
    };

    session.apply_spacing(&id("d"), &edit).unwrap();

    assert_eq!(session.styles().property(&id("d"), "margin"), Some("12px"));
    assert_eq!(
        session.field_values(),
        None,
        "nothing selected, so no prefill"
    );
    session.select(&id("d"), false);
    assert_eq!(session.field_values().and_then(|f| f.margin), Some("12px".to_string()));
}
