use std::path::Path;

use futures::future::try_join_all;

use crate::adapters::parsers::dotenv_parser::DotenvParser;
use crate::adapters::store::json_item_store::JsonItemStore;
use crate::cli::commands::crypto_helpers::{self, Cipher};
use crate::cli::{CryptoArgs, context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;
use crate::core::models::entry::Entry;
use crate::core::models::env_document::EnvDocument;
use crate::core::traits::cipher::EncryptionProvider;
use crate::core::traits::parser::ConfigParser;

/// Execute the `kvault export` command.
///
/// Decrypts the stored items (not the draft) into dotenv format,
/// written to `output` or printed to stdout.
pub fn execute(output_path: Option<&str>, crypto: &CryptoArgs) -> Result<()> {
    let kvault_dir = context::require_initialized()?;
    let config = AppConfig::load(kvault_dir)?;
    let store = JsonItemStore::new(kvault_dir);
    let items = store.load_items()?;
    let cipher = Cipher::select(crypto, &config)?;

    let pairs = crypto_helpers::block_on(reveal_all(&cipher, &items))??;
    let document = EnvDocument::from_pairs(pairs);
    let content = DotenvParser::new().serialize(&document)?;

    let keys: Vec<String> = document.pairs().map(|(k, _)| k.to_string()).collect();

    match output_path {
        Some(path) => {
            std::fs::write(Path::new(path), &content)?;
            output::success(&format!("Exported {} keys to {path}", keys.len()));
        }
        None => print!("{content}"),
    }

    super::audit_helpers::log_audit(
        kvault_dir,
        Some(&config),
        AuditAction::Export,
        keys,
        output_path.map(|p| format!("to {p}")),
        None,
    );

    Ok(())
}

/// Decrypt every stored row concurrently, failing on the first error.
async fn reveal_all<P: EncryptionProvider>(
    provider: &P,
    items: &[Entry],
) -> Result<Vec<(String, String)>> {
    let pending = items
        .iter()
        .filter(|e| !e.is_completely_empty())
        .map(|entry| reveal(provider, entry));
    try_join_all(pending).await
}

async fn reveal<P: EncryptionProvider>(provider: &P, entry: &Entry) -> Result<(String, String)> {
    let value = if entry.encrypted && !entry.value.is_empty() {
        provider.decrypt(&entry.value).await?
    } else {
        entry.value.clone()
    };
    Ok((entry.key.clone(), value))
}
