//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] sitecraft_parser::ParseError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Theme error: {0}")]
    Theme(#[from] sitecraft_compiler_html::ThemeError),
}

/// Snapshot store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Quota exceeded: {needed} bytes requested, {quota} available")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Invalid storage key `{0}`")]
    InvalidKey(String),
}
