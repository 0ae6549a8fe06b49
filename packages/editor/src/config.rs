use serde::{Deserialize, Serialize};

/// Editor session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum retained history entries (oldest evicted first)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Quiet period before a staged style edit settles into history
    #[serde(default = "default_style_debounce_ms")]
    pub style_debounce_ms: u64,

    /// Quiet period before the autosave record is written
    #[serde(default = "default_autosave_debounce_ms")]
    pub autosave_debounce_ms: u64,

    /// Accent color for new documents
    #[serde(default = "default_theme")]
    pub default_theme: String,

    /// Fixed key the autosave record is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Seeds stable identifiers minted by this session
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Title written into exported documents
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_history_limit() -> usize {
    50
}

fn default_style_debounce_ms() -> u64 {
    300
}

fn default_autosave_debounce_ms() -> u64 {
    1000
}

fn default_theme() -> String {
    sitecraft_compiler_html::DEFAULT_ACCENT.to_string()
}

fn default_storage_key() -> String {
    "sitecraft-autosave".to_string()
}

fn default_session_name() -> String {
    "sitecraft".to_string()
}

fn default_title() -> String {
    "My Website".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            style_debounce_ms: default_style_debounce_ms(),
            autosave_debounce_ms: default_autosave_debounce_ms(),
            default_theme: default_theme(),
            storage_key: default_storage_key(),
            session_name: default_session_name(),
            title: default_title(),
        }
    }
}
