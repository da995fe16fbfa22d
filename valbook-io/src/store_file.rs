//! Best-effort persisted state: the whole store as one pretty-printed
//! JSON document, read at startup and written after every mutation.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use valbook_core::RecordStore;

/// Load the store from disk. Missing files seed an empty store;
/// unreadable or corrupt files warn and seed likewise, never fail.
pub fn load_store(path: &Path) -> RecordStore {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no store file yet, starting empty");
            return RecordStore::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable store file, starting empty");
            return RecordStore::default();
        }
    };
    match serde_json::from_str::<RecordStore>(&text) {
        Ok(mut store) => {
            store.ensure_consistent();
            store
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt store file, starting empty");
            RecordStore::default()
        }
    }
}

/// Write the store back, creating the parent directory on demand.
pub fn save_store(path: &Path, store: &RecordStore) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(store).map_err(io::Error::other)?;
    fs::write(path, json)
}
