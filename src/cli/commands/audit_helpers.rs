use std::path::Path;
use std::process::Command;

use chrono::Utc;

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::cli::output;
use crate::config::app_config::{AppConfig, DEFAULT_AUDIT_LOG};
use crate::core::models::audit_entry::{AuditAction, AuditEntry};
use crate::core::traits::audit::AuditLogger;

/// Read the git user name and email from the local/global config.
/// Returns `("unknown", None)` if git is not available.
pub fn git_author() -> (String, Option<String>) {
    let read = |field: &str| -> Option<String> {
        Command::new("git")
            .args(["config", field])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let name = read("user.name").unwrap_or_else(|| "unknown".to_string());
    let email = read("user.email");
    (name, email)
}

/// The project's audit log. Without a config (during `init`) the
/// default file is used.
pub fn audit_logger(kvault_dir: &Path, config: Option<&AppConfig>) -> JsonAuditLogger {
    let name = config.map_or(DEFAULT_AUDIT_LOG, |c| c.audit_log_name());
    JsonAuditLogger::new(kvault_dir.join(name))
}

/// Record an audit event unless auditing is switched off. Failures
/// are reported as warnings and never fail the command.
pub fn log_audit(
    kvault_dir: &Path,
    config: Option<&AppConfig>,
    action: AuditAction,
    keys: Vec<String>,
    detail: Option<String>,
    state_hash: Option<String>,
) {
    if !config.is_none_or(AppConfig::audit_enabled) {
        return;
    }

    let logger = audit_logger(kvault_dir, config);
    let (author, email) = git_author();

    let entry = AuditEntry {
        timestamp: Utc::now(),
        author,
        email,
        action,
        keys,
        detail,
        state_hash,
    };

    if let Err(e) = logger.log_event(&entry) {
        tracing::warn!(error = %e, "audit write failed");
        output::warning(&format!("Could not write audit log: {e}"));
    }
}
