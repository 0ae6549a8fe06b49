pub mod export;
pub mod init;
pub mod inspect;

pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use sitecraft_editor::{EditorSession, FileStore, SnapshotRecord};
use std::path::Path;
use tracing::info;

/// Build a session from an explicit record file, or from the autosave
/// record in the configured store. Without either the session holds the
/// welcome document.
pub(crate) fn open_session(record: Option<&Path>, config: &Config, cwd: &str) -> Result<EditorSession> {
    let mut session = EditorSession::new(config.editor.clone());

    match record {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read record {}", path.display()))?;
            let record = SnapshotRecord::from_json(&json)
                .with_context(|| format!("{} is not a snapshot record", path.display()))?;
            session.load_record(record)?;
            info!(path = %path.display(), "loaded record file");
        }
        None => {
            let store_dir = config.get_store_dir(cwd);
            session = session.with_store(FileStore::new(store_dir.clone()));
            if !session.load_from_store() {
                info!(dir = %store_dir.display(), "no saved document, using the default page");
            }
        }
    }

    Ok(session)
}
