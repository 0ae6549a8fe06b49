//! Autosave and restore through snapshot stores

use anyhow::Result;
use sitecraft_editor::styles::property_map;
use sitecraft_editor::{
    EditorConfig, EditorSession, FileStore, ManualClock, MemoryStore, SnapshotRecord, SnapshotStore,
};

#[test]
fn test_autosave_round_trip_through_file_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = EditorConfig::default();

    let clock = ManualClock::default();
    let mut session = EditorSession::with_clock(config.clone(), clock.clone())
        .with_store(FileStore::new(dir.path()));

    session.insert_element("h2")?;
    let id = session.selection().primary().cloned().unwrap();
    session.set_style_properties(&id, property_map([("letterSpacing", "2px")]))?;
    session.set_theme("#2a9d8f")?;

    clock.advance_ms(config.autosave_debounce_ms as i64);
    session.tick();
    assert!(!session.is_autosave_pending());

    let mut restored = EditorSession::with_clock(config.clone(), ManualClock::default())
        .with_store(FileStore::new(dir.path()));
    assert!(restored.load_from_store());

    assert_eq!(restored.document().markup(), session.document().markup());
    assert_eq!(restored.theme().to_hex(), "#2a9d8f");
    assert_eq!(restored.styles().property(&id, "letter-spacing"), Some("2px"));
    assert!(!restored.can_undo());
    Ok(())
}

#[test]
fn test_missing_record_keeps_default_document() {
    let mut session = EditorSession::with_clock(EditorConfig::default(), ManualClock::default())
        .with_store(MemoryStore::new());
    let markup = session.document().markup();

    assert!(!session.load_from_store());
    assert_eq!(session.document().markup(), markup);
}

#[test]
fn test_malformed_record_is_ignored() -> Result<()> {
    let config = EditorConfig::default();
    let mut store = MemoryStore::new();
    store.save(&config.storage_key, "{not json")?;

    let mut session = EditorSession::with_clock(config.clone(), ManualClock::default()).with_store(store);
    assert!(!session.load_from_store());
    assert!(session.document().markup().contains("Welcome to Website Builder"));

    let mut store = MemoryStore::new();
    let broken = r##"{"html":"<p>1 < 2</p>","theme":"#4361ee","timestamp":"2024-01-01T00:00:00Z"}"##;
    store.save(&config.storage_key, broken)?;
    let mut session = EditorSession::with_clock(config, ManualClock::default()).with_store(store);
    assert!(!session.load_from_store());
    assert_eq!(session.element_count(), 2);
    Ok(())
}

#[test]
fn test_store_failure_does_not_stop_editing() {
    let mut session = EditorSession::with_clock(EditorConfig::default(), ManualClock::default())
        .with_store(MemoryStore::with_quota(16));

    session.insert_element("p").unwrap();
    assert!(!session.persist());

    session.insert_element("p").unwrap();
    assert!(session.can_undo());
}

#[test]
fn test_persist_without_store() {
    let mut session = EditorSession::with_clock(EditorConfig::default(), ManualClock::default());
    session.insert_element("p").unwrap();
    assert!(!session.persist());
}

#[test]
fn test_record_reload_keeps_ids_unique() -> Result<()> {
    let mut session = EditorSession::with_clock(EditorConfig::default(), ManualClock::default());
    session.insert_element("p")?;
    let record = session.snapshot_record();
    let json = record.to_json()?;

    let mut reloaded = EditorSession::with_clock(EditorConfig::default(), ManualClock::default());
    reloaded.load_record(SnapshotRecord::from_json(&json)?)?;
    reloaded.insert_element("p")?;

    let ids = reloaded.document().root().ids();
    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len());
    Ok(())
}
