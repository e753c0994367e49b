use crate::adapters::store::json_item_store::{self, JsonItemStore};
use crate::cli::commands::crypto_helpers::{self, Cipher};
use crate::cli::commands::session::Session;
use crate::cli::{CryptoArgs, output};
use crate::core::errors::{KvaultError, Result};
use crate::core::models::audit_entry::AuditAction;
use crate::core::models::entry::Entry;
use crate::core::services::editor::{KeyValueEditor, SubmitOutcome};
use crate::core::traits::cipher::EncryptionProvider;

/// Execute the `kvault submit` command.
///
/// Encrypts every plaintext row and writes the full list to the item
/// store. Nothing is written if a single encryption fails.
pub fn execute(crypto: &CryptoArgs) -> Result<()> {
    let mut session = Session::open()?;

    if !session.editor.is_dirty() {
        output::warning("Nothing to submit");
        return session.finish();
    }

    let cipher = Cipher::select(crypto, &session.config)?;
    let public_key = crypto_helpers::resolve_public_key(crypto, &session.config, &cipher)?;
    output::detail(&format!("Encrypting with {} for {public_key}", cipher.name()));

    let keys: Vec<String> = session
        .editor
        .entries()
        .iter()
        .filter(|e| !e.is_completely_empty() && !e.encrypted)
        .map(|e| e.key.clone())
        .collect();

    let sp = output::spinner("Encrypting values...");
    let result = crypto_helpers::block_on(session.editor.submit(
        &cipher,
        &public_key,
        &session.store,
    ))?;

    match result {
        Ok(SubmitOutcome::Submitted(count)) => {
            sp.finish_and_clear();
            // The draft is left untouched so the edits survive a failed write.
            let saved = confirm_saved(&session.store, &session.editor)?;
            output::success(&format!("Encrypted and saved {count} rows"));
            super::audit_helpers::log_audit(
                session.dir,
                Some(&session.config),
                AuditAction::Submit,
                keys,
                Some(format!("{count} rows via {}", cipher.name())),
                json_item_store::state_hash(&saved),
            );
        }
        Ok(SubmitOutcome::Blocked) => {
            sp.finish_and_clear();
            output::warning("Duplicate keys must be fixed before submitting");
        }
        Err(e) => {
            sp.finish_and_clear();
            return Err(e);
        }
    }

    session.finish()
}

/// The stored items, provided they are exactly the rows the editor
/// just submitted.
fn confirm_saved(store: &JsonItemStore, editor: &KeyValueEditor) -> Result<Vec<Entry>> {
    let submitted: Vec<&Entry> = editor
        .entries()
        .iter()
        .filter(|e| !e.is_completely_empty())
        .collect();
    let saved = store.load_items()?;

    if saved.iter().ne(submitted.iter().copied()) {
        return Err(KvaultError::ItemsNotSaved {
            path: store.items_path(),
        });
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sealed(key: &str) -> Entry {
        let mut entry = Entry::new(key, "-----BEGIN AGE ENCRYPTED FILE-----");
        entry.encrypted = true;
        entry
    }

    #[test]
    fn stale_items_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonItemStore::new(dir.path());
        store.save_items(&[]).unwrap();
        let editor = KeyValueEditor::with_source(vec![sealed("API_KEY")], true);

        let err = confirm_saved(&store, &editor).unwrap_err();
        assert!(matches!(err, KvaultError::ItemsNotSaved { .. }));
    }

    #[test]
    fn written_items_are_confirmed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonItemStore::new(dir.path());
        let rows = vec![sealed("API_KEY"), sealed("DB_URL")];
        store.save_items(&rows).unwrap();
        let editor = KeyValueEditor::with_source(rows.clone(), true);

        assert_eq!(confirm_saved(&store, &editor).unwrap(), rows);
    }
}
