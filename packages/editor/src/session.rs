//! # Editor Session
//!
//! Owns the four artifacts that must stay consistent while editing: the
//! document tree, the selection, the style rule table and the history. Every
//! inbound operation runs to completion synchronously and ends by queueing
//! notifications for the host.
//!
//! ## Commit cycle
//!
//! ```text
//! operation ─► Mutation::apply ─► prune selection/rules ─► history.record
//!                                                        ─► schedule autosave
//!                                                        ─► queue events
//! ```
//!
//! Rejected operations return an error and leave everything untouched.
//!
//! ## Deferred work
//!
//! Staged style edits and autosave are debounced. The session never sleeps;
//! the host calls [`EditorSession::tick`] and due work runs then.

use crate::components::ComponentRegistry;
use crate::config::EditorConfig;
use crate::debounce::{Clock, Debounced, SystemClock};
use crate::defaults::{is_text_bearing, TagDefaults};
use crate::document::Document;
use crate::errors::EditorError;
use crate::events::{EditorEvent, EventQueue};
use crate::fields::PropertyFields;
use crate::history::{History, HistoryEntry};
use crate::mutations::{EditContext, Mutation, MutationError};
use crate::persistence::{SnapshotRecord, SnapshotStore};
use crate::selection::SelectionManager;
use crate::styles::{PropertyMap, SpacingEdit, StyleSheet};
use sitecraft_compiler_html::{base_css, compile_to_html, CompileOptions, Theme};
use sitecraft_parser::NodeId;
use tracing::{debug, info, warn};

const INITIAL_LABEL: &str = "Initial";
const STYLE_LABEL: &str = "Style";

/// Transient in-place text edit
#[derive(Debug, Clone, PartialEq)]
pub struct InlineEdit {
    pub node_id: NodeId,
    pub draft: String,
    original: String,
}

impl InlineEdit {
    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }
}

pub struct EditorSession {
    config: EditorConfig,
    document: Document,
    selection: SelectionManager,
    styles: StyleSheet,
    theme: Theme,
    history: History,
    tags: TagDefaults,
    components: ComponentRegistry,
    inline_edit: Option<InlineEdit>,
    pending_style: Debounced<()>,
    pending_autosave: Debounced<()>,
    store: Option<Box<dyn SnapshotStore>>,
    clock: Box<dyn Clock>,
    events: EventQueue,
}

impl EditorSession {
    /// New session on the default document, using the wall clock
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: EditorConfig, clock: impl Clock + 'static) -> Self {
        let theme = Theme::parse(&config.default_theme).unwrap_or_else(|e| {
            warn!(error = %e, "invalid default theme, using built-in accent");
            Theme::default()
        });

        let mut session = Self {
            document: Document::new(&config.session_name),
            selection: SelectionManager::new(),
            styles: StyleSheet::new(),
            theme,
            history: History::new(config.history_limit),
            tags: TagDefaults::standard(),
            components: ComponentRegistry::standard(),
            inline_edit: None,
            pending_style: Debounced::from_millis(config.style_debounce_ms),
            pending_autosave: Debounced::from_millis(config.autosave_debounce_ms),
            store: None,
            clock: Box::new(clock),
            events: EventQueue::default(),
            config,
        };
        session.reset_history();
        session
    }

    /// Attach the store autosave writes to
    pub fn with_store(mut self, store: impl SnapshotStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    // ---- Inbound operations ----

    /// Apply a mutation, record history and notify. On error nothing changed.
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), MutationError> {
        self.settle_pending_style();
        if mutation.is_structural() {
            self.inline_edit = None;
        }

        let mut ctx = EditContext {
            document: &mut self.document,
            selection: &mut self.selection,
            styles: &mut self.styles,
            theme: &mut self.theme,
            tags: &self.tags,
            components: &self.components,
            now: self.clock.now(),
        };
        if let Err(e) = mutation.apply(&mut ctx) {
            debug!(error = %e, mutation = mutation.label(), "mutation rejected");
            return Err(e);
        }

        self.commit(mutation.label());
        Ok(())
    }

    pub fn insert_element(&mut self, tag: &str) -> Result<(), MutationError> {
        self.apply(Mutation::InsertElement { tag: tag.to_string() })
    }

    pub fn insert_component(&mut self, kind: &str) -> Result<(), MutationError> {
        self.apply(Mutation::InsertComponent {
            kind: kind.to_string(),
        })
    }

    pub fn delete_selection(&mut self) -> Result<(), MutationError> {
        self.apply(Mutation::DeleteSelection)
    }

    pub fn clear_document(&mut self) -> Result<(), MutationError> {
        self.apply(Mutation::ClearDocument)
    }

    pub fn retag(&mut self, tag: &str) -> Result<(), MutationError> {
        self.apply(Mutation::Retag { tag: tag.to_string() })
    }

    pub fn wrap_selection(&mut self) -> Result<(), MutationError> {
        self.apply(Mutation::WrapSelection)
    }

    pub fn duplicate(&mut self, id: &NodeId) -> Result<(), MutationError> {
        self.apply(Mutation::Duplicate { node_id: id.clone() })
    }

    pub fn apply_bulk_properties(&mut self, fields: PropertyFields) -> Result<(), MutationError> {
        self.apply(Mutation::ApplyProperties { fields })
    }

    pub fn set_style_properties(
        &mut self,
        id: &NodeId,
        properties: PropertyMap,
    ) -> Result<(), MutationError> {
        self.apply(Mutation::SetStyle {
            node_id: id.clone(),
            properties,
        })
    }

    pub fn apply_spacing(&mut self, id: &NodeId, edit: &SpacingEdit) -> Result<(), MutationError> {
        self.set_style_properties(id, edit.to_properties())
    }

    pub fn set_theme(&mut self, color: &str) -> Result<(), MutationError> {
        self.apply(Mutation::SetTheme {
            color: color.to_string(),
        })
    }

    /// Style edit from a panel field: applied live now, recorded once the
    /// quiet period passes without another staged edit.
    pub fn stage_style_edit(
        &mut self,
        id: &NodeId,
        properties: PropertyMap,
    ) -> Result<(), MutationError> {
        let mutation = Mutation::SetStyle {
            node_id: id.clone(),
            properties,
        };
        let mut ctx = EditContext {
            document: &mut self.document,
            selection: &mut self.selection,
            styles: &mut self.styles,
            theme: &mut self.theme,
            tags: &self.tags,
            components: &self.components,
            now: self.clock.now(),
        };
        mutation.apply(&mut ctx)?;

        self.pending_style.schedule(self.clock.now(), ());
        Ok(())
    }

    /// Select a node. Returns true if the selection changed.
    pub fn select(&mut self, id: &NodeId, additive: bool) -> bool {
        if !self.selection.select(&self.document, id, additive) {
            return false;
        }

        let editing_elsewhere = self
            .inline_edit
            .as_ref()
            .is_some_and(|edit| !self.selection.contains(&edit.node_id));
        if editing_elsewhere {
            self.inline_edit = None;
        }

        self.notify_selection();
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if !self.selection.clear() {
            return false;
        }
        self.notify_selection();
        true
    }

    /// Single-node pointer kept for hosts that track one node
    pub fn set_legacy_pointer(&mut self, id: Option<NodeId>) {
        self.selection.set_legacy_pointer(id);
    }

    /// Step back one entry. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        self.settle_pending_style();
        self.inline_edit = None;

        let Some(entry) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(entry);
        true
    }

    /// Step forward one entry. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        self.settle_pending_style();
        self.inline_edit = None;

        let Some(entry) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(entry);
        true
    }

    // ---- Inline text editing ----

    pub fn begin_inline_edit(&mut self, id: &NodeId) -> Result<(), MutationError> {
        if self.document.is_root(id) {
            return Err(MutationError::RootNotEditable);
        }
        let el = self
            .document
            .resolve(id)
            .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
        if !is_text_bearing(&el.tag) {
            return Err(MutationError::NotTextBearing(el.tag.clone()));
        }

        let text = el.text();
        self.inline_edit = Some(InlineEdit {
            node_id: id.clone(),
            draft: text.clone(),
            original: text,
        });
        Ok(())
    }

    /// Replace the draft. Nothing is recorded until commit.
    pub fn update_inline_edit(&mut self, text: impl Into<String>) -> Result<(), MutationError> {
        let edit = self.inline_edit.as_mut().ok_or(MutationError::NoInlineEdit)?;
        edit.draft = text.into();
        Ok(())
    }

    /// Leave edit mode and record the draft. Returns false if the text was
    /// unchanged (nothing recorded).
    pub fn commit_inline_edit(&mut self) -> Result<bool, MutationError> {
        let edit = self.inline_edit.take().ok_or(MutationError::NoInlineEdit)?;
        if !edit.is_dirty() {
            return Ok(false);
        }
        self.apply(Mutation::CommitText {
            node_id: edit.node_id,
            text: edit.draft,
        })?;
        Ok(true)
    }

    pub fn cancel_inline_edit(&mut self) -> bool {
        self.inline_edit.take().is_some()
    }

    pub fn inline_edit(&self) -> Option<&InlineEdit> {
        self.inline_edit.as_ref()
    }

    // ---- Deferred work ----

    /// Run debounced work that has come due
    pub fn tick(&mut self) {
        if self.pending_style.take_due(self.clock.now()).is_some() {
            self.commit(STYLE_LABEL);
        }
        if self.pending_autosave.take_due(self.clock.now()).is_some() {
            self.persist();
        }
    }

    /// Run all pending debounced work now
    pub fn flush(&mut self) {
        self.settle_pending_style();
        if self.pending_autosave.flush().is_some() {
            self.persist();
        }
    }

    pub fn has_pending_style(&self) -> bool {
        self.pending_style.is_pending()
    }

    pub fn is_autosave_pending(&self) -> bool {
        self.pending_autosave.is_pending()
    }

    // ---- Persistence ----

    /// Write the autosave record. Failures are logged; editing continues.
    pub fn persist(&mut self) -> bool {
        let json = match self.snapshot_record().to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize autosave record");
                return false;
            }
        };
        let key = self.config.storage_key.as_str();
        let Some(store) = self.store.as_mut() else {
            return false;
        };

        match store.save(key, &json) {
            Ok(()) => {
                debug!(key = %key, bytes = json.len(), "autosaved");
                true
            }
            Err(e) => {
                warn!(key = %key, error = %e, "autosave failed");
                false
            }
        }
    }

    /// Restore the autosave record if one exists. Missing or unreadable
    /// records leave the current document in place.
    pub fn load_from_store(&mut self) -> bool {
        let key = self.config.storage_key.as_str();
        let Some(store) = self.store.as_ref() else {
            return false;
        };

        let json = match store.load(key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                debug!(key = %key, "no autosave record");
                return false;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read autosave record");
                return false;
            }
        };

        let record = match SnapshotRecord::from_json(&json) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "ignoring malformed autosave record");
                return false;
            }
        };

        match self.load_record(record) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "ignoring unparseable autosave record");
                false
            }
        }
    }

    /// Replace the whole session state with a record. History restarts.
    pub fn load_record(&mut self, record: SnapshotRecord) -> Result<(), EditorError> {
        let document = Document::from_markup(&self.config.session_name, &record.html)?;

        self.document = document;
        self.styles = record.styles;
        self.styles.prune(self.document.root());
        self.theme = record.theme;
        self.selection = SelectionManager::new();
        self.inline_edit = None;
        self.pending_style.cancel();
        self.pending_autosave.cancel();
        self.reset_history();

        info!(
            elements = self.document.element_count(),
            rules = self.styles.len(),
            "loaded document"
        );
        self.notify_tree();
        self.notify_selection();
        Ok(())
    }

    pub fn snapshot_record(&self) -> SnapshotRecord {
        SnapshotRecord {
            html: self.document.markup(),
            theme: self.theme,
            styles: self.styles.clone(),
            timestamp: self.clock.now(),
        }
    }

    // ---- Reads ----

    /// Standalone HTML document
    pub fn export(&self) -> String {
        self.export_with(CompileOptions {
            title: self.config.title.clone(),
            ..CompileOptions::default()
        })
    }

    pub fn export_with(&self, options: CompileOptions) -> String {
        let tree = self.styles.project_for_export(self.document.root());
        compile_to_html(&tree, &self.styles.css_text(), &self.theme, options)
    }

    /// Stylesheet for the live canvas (base rules plus the rule table)
    pub fn preview_css(&self) -> String {
        let rules = self.styles.css_text();
        if rules.is_empty() {
            return base_css(&self.theme);
        }
        format!("{}\n{}", base_css(&self.theme), rules)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn element_count(&self) -> usize {
        self.document.element_count()
    }

    pub fn summary(&self) -> String {
        self.selection.summary(&self.document)
    }

    pub fn field_values(&self) -> Option<PropertyFields> {
        self.selection.field_values(&self.document, &self.styles)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn tag_defaults_mut(&mut self) -> &mut TagDefaults {
        &mut self.tags
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// Take queued notifications
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    // ---- Internals ----

    fn commit(&mut self, label: &str) {
        self.selection.prune(&self.document);
        let pruned = self.styles.prune(self.document.root());
        if pruned > 0 {
            debug!(pruned, "dropped rules for removed nodes");
        }

        let entry = self.snapshot_entry(label);
        if self.history.record(entry) {
            debug!(label, entries = self.history.len(), "recorded history");
        }

        self.pending_autosave.schedule(self.clock.now(), ());
        self.notify_tree();
        self.notify_selection();
        self.notify_history();
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.history.begin_restore();
        self.pending_style.cancel();

        if let Err(e) = self.document.replace_content(&entry.markup) {
            warn!(label = %entry.label, error = %e, "failed to restore snapshot");
        }
        self.styles = entry.styles;
        self.theme = entry.theme;
        self.selection.clear();
        self.selection.set_legacy_pointer(None);

        self.history.end_restore();
        debug!(label = %entry.label, cursor = ?self.history.cursor(), "restored snapshot");

        self.pending_autosave.schedule(self.clock.now(), ());
        self.notify_tree();
        self.notify_selection();
        self.notify_history();
    }

    fn settle_pending_style(&mut self) {
        if self.pending_style.flush().is_some() {
            self.commit(STYLE_LABEL);
        }
    }

    fn reset_history(&mut self) {
        self.history.clear();
        let entry = self.snapshot_entry(INITIAL_LABEL);
        self.history.record(entry);
        self.notify_history();
    }

    fn snapshot_entry(&self, label: &str) -> HistoryEntry {
        HistoryEntry {
            markup: self.document.markup(),
            theme: self.theme,
            styles: self.styles.clone(),
            label: label.to_string(),
            timestamp: self.clock.now(),
        }
    }

    fn notify_selection(&mut self) {
        let summary = self.selection.summary(&self.document);
        let fields = self.selection.field_values(&self.document, &self.styles);
        self.events.push(EditorEvent::SelectionChanged { summary, fields });
    }

    fn notify_tree(&mut self) {
        self.events.push(EditorEvent::TreeChanged {
            element_count: self.document.element_count(),
        });
    }

    fn notify_history(&mut self) {
        self.events.push(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }
}
