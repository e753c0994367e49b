use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::cli::output;
use crate::core::errors::{KvaultError, Result};
use crate::core::models::entry::Entry;
use crate::core::services::editor::EditorSnapshot;
use crate::core::traits::gateway::PersistenceGateway;

const ITEMS_FILE: &str = "items.json";
const DRAFT_FILE: &str = "draft.json";

/// File-backed item store inside the kvault directory.
///
/// - `items.json` is the source of truth the editor loads from and the
///   target of the persistence gateway.
/// - `draft.json` carries the editing session between invocations.
///   It can hold plaintext, so `kvault init` adds it to `.gitignore`.
///
/// Both files are replaced atomically through a temp file in the same
/// directory.
#[derive(Debug, Clone)]
pub struct JsonItemStore {
    dir: PathBuf,
}

impl JsonItemStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn items_path(&self) -> PathBuf {
        self.dir.join(ITEMS_FILE)
    }

    pub fn draft_path(&self) -> PathBuf {
        self.dir.join(DRAFT_FILE)
    }

    /// Read the stored items. A missing file is an empty list.
    pub fn load_items(&self) -> Result<Vec<Entry>> {
        let path = self.items_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| KvaultError::ParseError {
            file: path,
            detail: format!("invalid item list: {e}"),
        })
    }

    pub fn save_items(&self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| KvaultError::InvalidConfig {
            detail: format!("Failed to serialize items: {e}"),
        })?;
        self.write_atomic(&self.items_path(), &json)
    }

    /// Stored items with the configured required keys applied.
    pub fn load_source(&self, required: &[String]) -> Result<Vec<Entry>> {
        Ok(apply_required(self.load_items()?, required))
    }

    pub fn load_draft(&self) -> Result<Option<EditorSnapshot>> {
        let path = self.draft_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| KvaultError::SessionError {
                detail: format!("{} is unreadable: {e}", path.display()),
            })
    }

    pub fn save_draft(&self, snapshot: &EditorSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot).map_err(|e| KvaultError::SessionError {
            detail: format!("Failed to serialize draft: {e}"),
        })?;
        self.write_atomic(&self.draft_path(), &json)
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(path).map_err(|e| KvaultError::Io(e.error))?;
        Ok(())
    }
}

impl PersistenceGateway for JsonItemStore {
    fn items_changed(&self, entries: &[Entry]) {
        match self.save_items(entries) {
            Ok(()) => tracing::debug!(count = entries.len(), "items persisted"),
            Err(e) => {
                tracing::error!(error = %e, "failed to persist items");
                output::warning(&format!("Could not write {}: {e}", self.items_path().display()));
            }
        }
    }
}

/// Set the `required` flag from the configured keys and append a row
/// for every required key that is missing.
///
/// The stored flag is ignored, so a key dropped from config becomes an
/// ordinary row again.
pub fn apply_required(mut items: Vec<Entry>, required: &[String]) -> Vec<Entry> {
    for entry in &mut items {
        entry.required = required.contains(&entry.key);
    }

    for key in required {
        if !items.iter().any(|e| &e.key == key) {
            items.push(Entry::required(key));
        }
    }

    items
}

/// SHA-256 over the serialized list, recorded in the audit log.
pub fn state_hash(entries: &[Entry]) -> Option<String> {
    let json = serde_json::to_vec(entries).ok()?;
    Some(format!("{:x}", Sha256::digest(&json)))
}
