use crate::adapters::cipher::age_backend::AgeBackend;
use crate::cli::commands::crypto_helpers;
use crate::cli::{CryptoArgs, KeysAction, context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::{KvaultError, Result};
use crate::core::models::audit_entry::AuditAction;

/// Execute the `kvault keys` command.
pub fn execute(action: &KeysAction, crypto: &CryptoArgs) -> Result<()> {
    match action {
        KeysAction::Setup => execute_setup(crypto),
        KeysAction::Show => execute_show(crypto),
    }
}

/// Generate an age identity unless one already exists.
fn execute_setup(crypto: &CryptoArgs) -> Result<()> {
    output::header("Key configuration for kvault");

    let identity_path = crypto_helpers::identity_path(crypto)?;

    if identity_path.exists() {
        let public_key = AgeBackend::read_public_key(&identity_path)?;
        output::success(&format!(
            "Age key already exists at {}",
            identity_path.display()
        ));
        output::success(&format!("Public key: {public_key}"));
        print_next_step(&public_key);
        return Ok(());
    }

    let public_key = AgeBackend::generate_identity(&identity_path)?;
    output::success(&format!("Private key: {}", identity_path.display()));
    output::success(&format!("Public key: {public_key}"));
    print_next_step(&public_key);

    // Only projects that already exist get an audit entry.
    let kvault_dir = context::kvault_dir();
    if kvault_dir.exists() {
        let config = AppConfig::load(kvault_dir).ok();
        super::audit_helpers::log_audit(
            kvault_dir,
            config.as_ref(),
            AuditAction::KeySetup,
            vec![],
            Some(format!("generated {public_key}")),
            None,
        );
    }

    Ok(())
}

/// Print the public half of the local identity.
fn execute_show(crypto: &CryptoArgs) -> Result<()> {
    let identity_path = crypto_helpers::identity_path(crypto)?;
    if !identity_path.exists() {
        return Err(KvaultError::FileNotFound {
            path: identity_path,
        });
    }

    // Bare output so it can be piped into config or a teammate's shell.
    println!("{}", AgeBackend::read_public_key(&identity_path)?);
    Ok(())
}

fn print_next_step(public_key: &str) {
    println!();
    println!("  Next step:");
    println!("  Add this line under [kvault] in .kvault/config.toml:");
    println!("  public_key = \"{public_key}\"");
}
