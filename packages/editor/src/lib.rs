//! # Sitecraft Editor
//!
//! Editing state machine for the visual page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host glue: panels, canvas, buttons          │
//! └─────────────────────────────────────────────┘
//!            ↓ operations        ↑ events
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorSession                       │
//! │  - Document tree + stable IDs               │
//! │  - Selection                                │
//! │  - Style rule table                         │
//! │  - Snapshot history                         │
//! │  - Debounced style settle + autosave        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: standalone document export   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **IDs, not references**: components look nodes up by stable ID and
//!    treat a stale ID as a no-op
//! 2. **All or nothing**: a rejected operation changes nothing
//! 3. **Whole-state snapshots**: undo restores, it never replays
//! 4. **Explicit notifications**: every operation ends by queueing events
//!
//! ## Usage
//!
//! ```rust
//! use sitecraft_editor::{EditorConfig, EditorSession};
//! use sitecraft_editor::styles::property_map;
//!
//! let mut session = EditorSession::new(EditorConfig::default());
//! session.clear_selection();
//! session.insert_element("h1").unwrap();
//!
//! let id = session.selection().primary().unwrap().clone();
//! session
//!     .set_style_properties(&id, property_map([("fontSize", "32px")]))
//!     .unwrap();
//!
//! let html = session.export();
//! assert!(html.contains("font-size: 32px;"));
//!
//! assert!(session.undo());
//! ```

pub mod components;
pub mod config;
pub mod debounce;
pub mod defaults;
pub mod document;
pub mod errors;
pub mod events;
pub mod fields;
pub mod history;
pub mod mutations;
pub mod persistence;
pub mod selection;
pub mod session;
pub mod styles;

pub use components::ComponentRegistry;
pub use config::EditorConfig;
pub use debounce::{Clock, Debounced, ManualClock, SystemClock};
pub use defaults::{is_text_bearing, TagDefaults};
pub use document::{Document, DEFAULT_MARKUP, ROOT_ID};
pub use errors::{EditorError, StoreError};
pub use events::EditorEvent;
pub use fields::PropertyFields;
pub use history::{History, HistoryEntry};
pub use mutations::{validate_tag, Mutation, MutationError};
pub use persistence::{FileStore, MemoryStore, SnapshotRecord, SnapshotStore};
pub use selection::{SelectionDisplay, SelectionManager};
pub use session::{EditorSession, InlineEdit};
pub use styles::{PropertyMap, SpacingEdit, SpacingProperty, StyleSheet};

pub use sitecraft_compiler_html::Theme;
pub use sitecraft_parser::NodeId;
