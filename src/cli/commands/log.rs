use colored::Colorize;

use crate::adapters::store::json_item_store::{self, JsonItemStore};
use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::{KvaultError, Result};
use crate::core::models::audit_entry::{AuditAction, AuditEntry, AuditFilter};
use crate::core::traits::audit::AuditLogger;

/// Execute the `kvault log` command.
///
/// Shows the audit entries matching `filter`, limited to the last
/// `last` of them.
pub fn execute(filter: &AuditFilter, last: Option<usize>) -> Result<()> {
    let kvault_dir = context::require_initialized()?;
    let config = AppConfig::load(kvault_dir)?;
    let logger = super::audit_helpers::audit_logger(kvault_dir, Some(&config));

    let entries = logger.query(filter)?;

    if entries.is_empty() {
        output::header("kvault log");
        output::warning("No audit entries found");
        if !filter.is_empty() {
            println!("  Try removing filters to see all entries.");
        }
        return Ok(());
    }

    let skip = last.map_or(0, |n| entries.len().saturating_sub(n));
    let display = &entries[skip..];

    output::header(&format!("kvault log ({} entries)", display.len()));
    println!();

    for entry in display {
        print_entry(entry);
    }

    Ok(())
}

/// Execute `kvault log --verify`.
///
/// Compares the hash of `items.json` with the one recorded by the last
/// init, submit or remove, which catches edits made outside kvault.
pub fn verify() -> Result<()> {
    let kvault_dir = context::require_initialized()?;
    let config = AppConfig::load(kvault_dir)?;
    let logger = super::audit_helpers::audit_logger(kvault_dir, Some(&config));

    let Some(recorded) = logger.last_state_hash()? else {
        output::warning(&format!(
            "No recorded state in {} to verify against",
            logger.path().display()
        ));
        return Ok(());
    };

    let items = JsonItemStore::new(kvault_dir).load_items()?;
    let current = json_item_store::state_hash(&items).unwrap_or_default();

    if current != recorded {
        return Err(KvaultError::AuditError {
            detail: format!(
                "items.json does not match the last recorded state ({} != {})",
                short(&current),
                short(&recorded)
            ),
        });
    }

    output::success(&format!(
        "items.json matches the last recorded state ({})",
        short(&recorded)
    ));
    Ok(())
}

fn short(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

fn print_entry(entry: &AuditEntry) {
    let date = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
    let keys = if entry.keys.is_empty() {
        "-".dimmed().to_string()
    } else {
        entry.keys.join(", ")
    };
    let hash = entry
        .state_hash
        .as_deref()
        .map(|h| format!("#{}", short(h)).dimmed().to_string())
        .unwrap_or_default();
    let detail = entry.detail.as_deref().unwrap_or("").dimmed().to_string();

    println!(
        "  {} {} {:<8} {:<16} {} {} {}",
        date.to_string().dimmed(),
        "│".dimmed(),
        format_action(&entry.action),
        entry.author,
        keys,
        detail,
        hash,
    );
}

fn format_action(action: &AuditAction) -> String {
    let name = action.as_str();
    match action {
        AuditAction::Init | AuditAction::KeySetup => name.cyan().to_string(),
        AuditAction::Import | AuditAction::Export => name.blue().to_string(),
        AuditAction::Edit | AuditAction::Discard => name.yellow().to_string(),
        AuditAction::Remove => name.red().to_string(),
        AuditAction::Submit => name.green().to_string(),
    }
}
