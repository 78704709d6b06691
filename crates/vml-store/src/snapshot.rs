//! JSON snapshot persistence for [`InMemoryKvStore`].
//!
//! On-disk format:
//! ```text
//! {"version": 1, "entries": {"<key>": "<value>", ...}}
//! ```
//! Values are ledger text (decimals, names, JSON records) and must be valid
//! UTF-8. Saving writes to a temporary file in the target directory and
//! renames it over the destination, so a crash never leaves a torn file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryKvStore;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// Load a store from `path`. A missing file yields an empty store.
pub fn load_snapshot(path: &Path) -> StoreResult<InMemoryKvStore> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no snapshot; starting empty");
            return Ok(InMemoryKvStore::new());
        }
        Err(e) => return Err(e.into()),
    };

    let file: SnapshotFile =
        serde_json::from_slice(&raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
    if file.version != SNAPSHOT_VERSION {
        return Err(StoreError::Serialization(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            file.version
        )));
    }

    info!(path = %path.display(), keys = file.entries.len(), "snapshot loaded");
    Ok(InMemoryKvStore::from_entries(
        file.entries
            .into_iter()
            .map(|(k, v)| (k, v.into_bytes())),
    ))
}

/// Atomically write every entry of `store` to `path`.
pub fn save_snapshot(store: &InMemoryKvStore, path: &Path) -> StoreResult<()> {
    let mut entries = BTreeMap::new();
    for (key, value) in store.entries()? {
        let text = String::from_utf8(value).map_err(|_| StoreError::InvalidValue {
            key: key.clone(),
            reason: "value is not valid UTF-8".into(),
        })?;
        entries.insert(key, text);
    }
    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        entries,
    };
    let bytes =
        serde_json::to_vec_pretty(&file).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    debug!(path = %path.display(), keys = file.entries.len(), "snapshot saved");
    Ok(())
}
