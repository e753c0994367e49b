use crate::cli::commands::session::Session;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;

/// Execute the `kvault set` command.
///
/// Without a value the row keeps its current one, so a rename does not
/// turn ciphertext back into plaintext.
pub fn execute_set(index: usize, key: &str, value: Option<&str>) -> Result<()> {
    let mut session = Session::open()?;

    let value = match value {
        Some(v) => v.to_string(),
        None => session
            .editor
            .entries()
            .get(index)
            .map(|e| e.value.clone())
            .unwrap_or_default(),
    };

    session.editor.edit_field(index, key, value)?;
    output::success(&format!("Row {index} updated"));
    record_edit(&session, key);
    session.finish()
}

/// Execute the `kvault add` command by filling the trailing blank row.
pub fn execute_add(key: &str, value: Option<&str>) -> Result<()> {
    let mut session = Session::open()?;

    let index = session.editor.entries().len().saturating_sub(1);
    session
        .editor
        .edit_field(index, key, value.unwrap_or_default())?;
    output::success(&format!("Added {key}"));
    record_edit(&session, key);
    session.finish()
}

fn record_edit(session: &Session, key: &str) {
    super::audit_helpers::log_audit(
        session.dir,
        Some(&session.config),
        AuditAction::Edit,
        vec![key.to_string()],
        None,
        None,
    );
}
