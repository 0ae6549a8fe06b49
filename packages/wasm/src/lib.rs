//! Browser bindings for [`EditorSession`].
//!
//! Structured values cross the boundary as JSON strings. Autosave records
//! are handed to the page through [`WasmEditor::take_autosave`]; the page
//! owns the actual storage.

use serde::Serialize;
use serde_json::Value;
use sitecraft_editor::{
    EditorConfig, EditorSession, Mutation, NodeId, PropertyFields, PropertyMap, SnapshotRecord,
    SnapshotStore, SpacingEdit, StoreError,
};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(prefix: &str, err: impl Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", prefix, err))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

/// Style properties from a JSON object. `null` clears a property.
pub fn parse_properties(json: &str) -> Result<PropertyMap, serde_json::Error> {
    let object: serde_json::Map<String, Value> = serde_json::from_str(json)?;
    Ok(object
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::Null => String::new(),
                Value::String(s) => s,
                other => other.to_string(),
            };
            (name, value)
        })
        .collect())
}

/// Store backed by the page: reads come from the record the page passed
/// in, writes land in an outbox the page drains.
#[derive(Debug, Default)]
struct HostStore {
    saved: Option<String>,
    outbox: Rc<RefCell<Option<String>>>,
}

impl SnapshotStore for HostStore {
    fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, _key: &str, value: &str) -> Result<(), StoreError> {
        self.saved = Some(value.to_string());
        *self.outbox.borrow_mut() = Some(value.to_string());
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        self.saved = None;
        self.outbox.borrow_mut().take();
        Ok(())
    }
}

#[wasm_bindgen]
pub struct WasmEditor {
    session: EditorSession,
    outbox: Rc<RefCell<Option<String>>>,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor. `config` is an `EditorConfig` JSON object, `saved`
    /// the last autosave record; a missing or broken record starts fresh.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>, saved: Option<String>) -> Result<WasmEditor, JsValue> {
        let config = match config {
            Some(json) => serde_json::from_str::<EditorConfig>(&json)
                .map_err(|e| js_error("Config error", e))?,
            None => EditorConfig::default(),
        };

        let outbox = Rc::new(RefCell::new(None));
        let store = HostStore {
            saved,
            outbox: Rc::clone(&outbox),
        };
        let mut session = EditorSession::new(config).with_store(store);
        session.load_from_store();

        Ok(WasmEditor { session, outbox })
    }

    /// Apply a serialized `Mutation`
    pub fn apply(&mut self, mutation: &str) -> Result<(), JsValue> {
        let mutation: Mutation =
            serde_json::from_str(mutation).map_err(|e| js_error("Invalid mutation", e))?;
        self.session.apply(mutation).map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = insertElement)]
    pub fn insert_element(&mut self, tag: &str) -> Result<(), JsValue> {
        self.session.insert_element(tag).map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = insertComponent)]
    pub fn insert_component(&mut self, kind: &str) -> Result<(), JsValue> {
        self.session.insert_component(kind).map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = deleteSelection)]
    pub fn delete_selection(&mut self) -> Result<(), JsValue> {
        self.session.delete_selection().map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = clearDocument)]
    pub fn clear_document(&mut self) -> Result<(), JsValue> {
        self.session.clear_document().map_err(|e| js_error("Rejected", e))
    }

    pub fn retag(&mut self, tag: &str) -> Result<(), JsValue> {
        self.session.retag(tag).map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = wrapSelection)]
    pub fn wrap_selection(&mut self) -> Result<(), JsValue> {
        self.session.wrap_selection().map_err(|e| js_error("Rejected", e))
    }

    pub fn duplicate(&mut self, id: &str) -> Result<(), JsValue> {
        self.session
            .duplicate(&NodeId::new(id))
            .map_err(|e| js_error("Rejected", e))
    }

    /// Apply property panel values (a `PropertyFields` JSON object) to the selection
    #[wasm_bindgen(js_name = applyProperties)]
    pub fn apply_properties(&mut self, fields: &str) -> Result<(), JsValue> {
        let fields: PropertyFields =
            serde_json::from_str(fields).map_err(|e| js_error("Invalid fields", e))?;
        self.session
            .apply_bulk_properties(fields)
            .map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = setStyleProperties)]
    pub fn set_style_properties(&mut self, id: &str, properties: &str) -> Result<(), JsValue> {
        let properties =
            parse_properties(properties).map_err(|e| js_error("Invalid properties", e))?;
        self.session
            .set_style_properties(&NodeId::new(id), properties)
            .map_err(|e| js_error("Rejected", e))
    }

    /// Live style edit; history records once the edits go quiet
    #[wasm_bindgen(js_name = stageStyleEdit)]
    pub fn stage_style_edit(&mut self, id: &str, properties: &str) -> Result<(), JsValue> {
        let properties =
            parse_properties(properties).map_err(|e| js_error("Invalid properties", e))?;
        self.session
            .stage_style_edit(&NodeId::new(id), properties)
            .map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = applySpacing)]
    pub fn apply_spacing(&mut self, id: &str, edit: &str) -> Result<(), JsValue> {
        let edit: SpacingEdit =
            serde_json::from_str(edit).map_err(|e| js_error("Invalid spacing", e))?;
        self.session
            .apply_spacing(&NodeId::new(id), &edit)
            .map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, color: &str) -> Result<(), JsValue> {
        self.session.set_theme(color).map_err(|e| js_error("Rejected", e))
    }

    pub fn select(&mut self, id: &str, additive: bool) -> bool {
        self.session.select(&NodeId::new(id), additive)
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) -> bool {
        self.session.clear_selection()
    }

    #[wasm_bindgen(js_name = setLegacyPointer)]
    pub fn set_legacy_pointer(&mut self, id: Option<String>) {
        self.session.set_legacy_pointer(id.map(NodeId::new));
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    #[wasm_bindgen(js_name = beginInlineEdit)]
    pub fn begin_inline_edit(&mut self, id: &str) -> Result<(), JsValue> {
        self.session
            .begin_inline_edit(&NodeId::new(id))
            .map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = updateInlineEdit)]
    pub fn update_inline_edit(&mut self, text: String) -> Result<(), JsValue> {
        self.session
            .update_inline_edit(text)
            .map_err(|e| js_error("Rejected", e))
    }

    /// Returns whether the text changed
    #[wasm_bindgen(js_name = commitInlineEdit)]
    pub fn commit_inline_edit(&mut self) -> Result<bool, JsValue> {
        self.session
            .commit_inline_edit()
            .map_err(|e| js_error("Rejected", e))
    }

    #[wasm_bindgen(js_name = cancelInlineEdit)]
    pub fn cancel_inline_edit(&mut self) -> bool {
        self.session.cancel_inline_edit()
    }

    /// Run debounced work whose deadline has passed. Call from a timer.
    pub fn tick(&mut self) {
        self.session.tick();
    }

    pub fn flush(&mut self) {
        self.session.flush();
    }

    /// Latest autosave record written since the last call
    #[wasm_bindgen(js_name = takeAutosave)]
    pub fn take_autosave(&mut self) -> Option<String> {
        self.outbox.borrow_mut().take()
    }

    /// Storage key the page should file autosave records under
    #[wasm_bindgen(js_name = storageKey)]
    pub fn storage_key(&self) -> String {
        self.session.config().storage_key.clone()
    }

    #[wasm_bindgen(js_name = snapshotRecord)]
    pub fn snapshot_record(&self) -> Result<String, JsValue> {
        to_json(&self.session.snapshot_record())
    }

    #[wasm_bindgen(js_name = loadRecord)]
    pub fn load_record(&mut self, json: &str) -> Result<(), JsValue> {
        let record = SnapshotRecord::from_json(json).map_err(|e| js_error("Invalid record", e))?;
        self.session
            .load_record(record)
            .map_err(|e| js_error("Invalid record", e))
    }

    /// Standalone HTML document
    pub fn export(&self) -> String {
        self.session.export()
    }

    /// Canvas markup, identifiers included
    pub fn markup(&self) -> String {
        self.session.document().markup()
    }

    #[wasm_bindgen(js_name = previewCss)]
    pub fn preview_css(&self) -> String {
        self.session.preview_css()
    }

    #[wasm_bindgen(js_name = elementCount)]
    pub fn element_count(&self) -> usize {
        self.session.element_count()
    }

    pub fn summary(&self) -> String {
        self.session.summary()
    }

    /// Selected identifiers as a JSON array, primary first
    #[wasm_bindgen(js_name = selectedIds)]
    pub fn selected_ids(&self) -> Result<String, JsValue> {
        to_json(&self.session.selection().ids())
    }

    /// Property panel prefill for the primary selection, `undefined` when empty
    #[wasm_bindgen(js_name = fieldValues)]
    pub fn field_values(&self) -> Result<Option<String>, JsValue> {
        self.session
            .field_values()
            .map(|fields| to_json(&fields))
            .transpose()
    }

    /// Pending `EditorEvent`s as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        to_json(&self.session.drain_events())
    }
}
