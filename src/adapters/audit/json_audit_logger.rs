use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::core::errors::{KvaultError, Result};
use crate::core::models::audit_entry::{AuditEntry, AuditFilter};
use crate::core::traits::audit::AuditLogger;

/// Append-only audit trail, one JSON `AuditEntry` per line.
pub struct JsonAuditLogger {
    log_path: PathBuf,
}

impl JsonAuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Every entry in file order. A missing log reads as empty.
    fn read_all(&self) -> Result<Vec<AuditEntry>> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(KvaultError::AuditError {
                    detail: format!("Cannot read {}: {e}", self.log_path.display()),
                });
            }
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| KvaultError::AuditError {
                detail: format!("line {} of {} is not an audit entry: {e}", index + 1, self.log_path.display()),
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

impl AuditLogger for JsonAuditLogger {
    fn log_event(&self, entry: &AuditEntry) -> Result<()> {
        let line = serde_json::to_string(entry).map_err(|e| KvaultError::AuditError {
            detail: format!("Failed to serialize audit entry: {e}"),
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| KvaultError::AuditError {
                detail: format!("Cannot open {}: {e}", self.log_path.display()),
            })?;
        writeln!(file, "{line}")?;

        tracing::debug!(action = entry.action.as_str(), keys = entry.keys.len(), "audit entry written");
        Ok(())
    }

    fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        entries.retain(|entry| filter.matches(entry));
        Ok(entries)
    }

    fn last_state_hash(&self) -> Result<Option<String>> {
        Ok(self
            .read_all()?
            .into_iter()
            .rev()
            .filter(|entry| entry.action.changes_items())
            .find_map(|entry| entry.state_hash))
    }
}
