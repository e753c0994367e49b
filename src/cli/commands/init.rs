use std::path::Path;

use crate::adapters::cipher::age_backend::AgeBackend;
use crate::adapters::store::json_item_store::{self, JsonItemStore};
use crate::cli::commands::crypto_helpers;
use crate::cli::{CryptoArgs, context, output};
use crate::core::errors::{KvaultError, Result};
use crate::core::models::audit_entry::AuditAction;

/// Execute the `kvault init` command.
///
/// Creates the kvault directory with a default config, an empty item
/// list and a `.gitignore` that keeps the draft out of version control.
pub fn execute(generate_key: bool, crypto: &CryptoArgs) -> Result<()> {
    let kvault_dir = context::kvault_dir();

    if kvault_dir.exists() {
        return Err(KvaultError::InvalidConfig {
            detail: format!(
                "kvault is already initialized in this project ({} exists)",
                kvault_dir.display()
            ),
        });
    }

    output::header("kvault: initializing project");

    std::fs::create_dir_all(kvault_dir)?;
    output::success(&format!("Created {}", kvault_dir.display()));

    let public_key = if generate_key {
        Some(setup_age_key(crypto)?)
    } else {
        crypto.public_key.clone()
    };

    std::fs::write(
        kvault_dir.join("config.toml"),
        default_config(public_key.as_deref()),
    )?;
    output::success("Generated config.toml with defaults");

    let store = JsonItemStore::new(kvault_dir);
    store.save_items(&[])?;
    output::success("Created empty items.json");

    std::fs::write(
        kvault_dir.join(".gitignore"),
        "# kvault: the draft may hold plaintext\ndraft.json\n",
    )?;
    output::success("Excluded draft.json from git");

    super::audit_helpers::log_audit(
        kvault_dir,
        None,
        AuditAction::Init,
        vec![],
        Some("project initialized".to_string()),
        json_item_store::state_hash(&[]),
    );

    if public_key.is_none() {
        output::warning("No public key configured");
        println!("  Run 'kvault keys setup' or set `public_key` in config.toml before submitting.");
    }

    output::success("Project ready.\n");
    print_next_steps(kvault_dir);
    Ok(())
}

/// Reuse the local age identity, or generate one.
fn setup_age_key(crypto: &CryptoArgs) -> Result<String> {
    let identity_path = crypto_helpers::identity_path(crypto)?;

    if identity_path.exists() {
        let public_key = AgeBackend::read_public_key(&identity_path)?;
        output::success(&format!("Age key found at {}", identity_path.display()));
        output::success(&format!("Public key: {public_key}"));
        return Ok(public_key);
    }

    let public_key = AgeBackend::generate_identity(&identity_path)?;
    output::success(&format!(
        "Private key saved to: {}",
        identity_path.display()
    ));
    output::success(&format!("Public key: {public_key}"));
    output::warning("Never share the private key. Back it up; without it nothing can be decrypted.");
    Ok(public_key)
}

fn default_config(public_key: Option<&str>) -> String {
    let public_key_line = match public_key {
        Some(key) => format!("public_key = \"{key}\""),
        None => "# public_key = \"age1...\"".to_string(),
    };

    format!(
        r#"[kvault]
version = "{version}"
format_version = 1
cipher = "age"
{public_key_line}
unique = true
# template = ".env.template"
required = []

[audit]
enabled = true
log_file = "audit.log"
"#,
        version = env!("CARGO_PKG_VERSION"),
    )
}

fn print_next_steps(kvault_dir: &Path) {
    println!("  Next steps:");
    println!("     1. Add secrets: kvault add DATABASE_URL postgres://...");
    println!("        or import a file: kvault import .env");
    println!("     2. Encrypt and save them: kvault submit");
    println!(
        "     3. Commit {} (draft.json is ignored)",
        kvault_dir.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app_config::AppConfig;

    #[test]
    fn default_config_is_loadable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            default_config(Some("age1example")),
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.kvault.public_key.as_deref(), Some("age1example"));
        assert!(config.kvault.unique);
        assert!(config.audit.unwrap().enabled);
    }

    #[test]
    fn default_config_without_key_leaves_it_unset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), default_config(None)).unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert!(config.kvault.public_key.is_none());
    }
}
