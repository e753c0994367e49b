use crate::core::errors::Result;
use crate::core::models::audit_entry::{AuditEntry, AuditFilter};

/// Port for recording and querying audit events.
pub trait AuditLogger: Send + Sync {
    /// Append an entry to the audit log.
    fn log_event(&self, entry: &AuditEntry) -> Result<()>;

    /// Entries matching `filter`, oldest first.
    fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>>;

    /// Hash of `items.json` recorded by the most recent change to it.
    fn last_state_hash(&self) -> Result<Option<String>>;
}
