use std::path::Path;

use crate::adapters::parsers::dotenv_parser::DotenvParser;
use crate::cli::commands::session::Session;
use crate::cli::output;
use crate::core::errors::{KvaultError, Result};
use crate::core::models::audit_entry::AuditAction;
use crate::core::traits::parser::ConfigParser;

/// Execute the `kvault import` command.
///
/// Rows whose key already exists get the imported value, other keys
/// are appended. Everything lands in the draft; run `kvault submit` to
/// encrypt and save.
pub fn execute(file: Option<&str>) -> Result<()> {
    let path = Path::new(file.unwrap_or(".env"));
    if !path.exists() {
        return Err(KvaultError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut session = Session::open()?;
    let content = std::fs::read_to_string(path)?;
    let document = DotenvParser::for_file(path).parse(&content)?;

    let mut added = 0usize;
    let mut updated = 0usize;
    let mut keys = Vec::new();

    for (key, value) in document.pairs() {
        let existing = session.editor.entries().iter().position(|e| e.key == key);
        match existing {
            Some(index) => {
                if session.editor.entries()[index].value == value {
                    continue;
                }
                session.editor.edit_field(index, key, value)?;
                updated += 1;
            }
            None => {
                let index = session.editor.entries().len().saturating_sub(1);
                session.editor.edit_field(index, key, value)?;
                added += 1;
            }
        }
        keys.push(key.to_string());
    }

    output::success(&format!(
        "Imported {}: {added} added, {updated} updated",
        path.display()
    ));
    if added + updated > 0 {
        output::detail("Values are plaintext in the draft until you run 'kvault submit'");
    }

    super::audit_helpers::log_audit(
        session.dir,
        Some(&session.config),
        AuditAction::Import,
        keys,
        Some(format!("from {}", path.display())),
        None,
    );

    session.finish()
}
