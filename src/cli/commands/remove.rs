use crate::adapters::store::json_item_store;
use crate::cli::commands::session::Session;
use crate::cli::output;
use crate::core::errors::{KvaultError, Result};
use crate::core::models::audit_entry::AuditAction;
use crate::core::services::editor::{KeyValueEditor, RemoveOutcome};

/// Execute the `kvault remove` command.
///
/// A removal is saved to the item store immediately, together with
/// every other row, so it is refused while the draft holds plaintext
/// that was never submitted.
pub fn execute(index: usize) -> Result<()> {
    let mut session = Session::open()?;

    if has_unsubmitted_plaintext(&session.editor) {
        return Err(KvaultError::PendingPlaintext);
    }

    let key = session
        .editor
        .entries()
        .get(index)
        .map(|e| e.key.clone())
        .unwrap_or_default();

    match session.editor.remove_or_clear(index, &session.store)? {
        RemoveOutcome::Propagated => {
            output::success(&format!("Removed {key} and saved"));
            let saved = session.store.load_items()?;
            super::audit_helpers::log_audit(
                session.dir,
                Some(&session.config),
                AuditAction::Remove,
                vec![key],
                None,
                json_item_store::state_hash(&saved),
            );
        }
        RemoveOutcome::Withheld => {
            output::warning("Duplicate keys remain; the removal stays in the draft until they are fixed");
        }
    }

    session.finish()
}

/// Rows with a plaintext value that the stored list does not already hold.
fn has_unsubmitted_plaintext(editor: &KeyValueEditor) -> bool {
    editor
        .entries()
        .iter()
        .filter(|e| !e.encrypted && !e.value.is_empty())
        .any(|e| !editor.source().contains(e))
}
