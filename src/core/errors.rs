use std::path::PathBuf;

/// All domain errors for kvault.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum KvaultError {
    #[error(
        "File not found: {path}\n\n  \
         Check that the path is correct and the file exists.\n  \
         Run 'kvault init' if this project has no .kvault/ directory yet."
    )]
    FileNotFound { path: PathBuf },

    #[error("Encryption failed: {reason}")]
    EncryptionFailed { reason: String },

    #[error(
        "Decryption failed: no matching key found\n\n  \
         The stored values were encrypted for a different public key.\n\n  \
         Solutions:\n    \
         → Point kvault at the right identity: --identity <path> or KVAULT_IDENTITY\n    \
         → Check the configured public key in .kvault/config.toml"
    )]
    DecryptionNoKey,

    #[error(
        "Parse error in {file}: {detail}\n\n  \
         Expected format: KEY=value (one per line).\n  \
         Comments (#) and blank lines are allowed."
    )]
    ParseError { file: PathBuf, detail: String },

    #[error(
        "No entry at index {index} (the list has {len} rows)\n\n  \
         Run 'kvault list' to see the current row numbers."
    )]
    InvalidIndex { index: usize, len: usize },

    #[error("Row {index} is empty; there is nothing to remove")]
    EmptyEntry { index: usize },

    #[error(
        "Key '{key}' is required and cannot be renamed\n\n  \
         Required keys are listed under `required` in .kvault/config.toml.\n  \
         You can still change or clear its value."
    )]
    RequiredKeyLocked { key: String },

    #[error(
        "No public key configured for encryption\n\n  \
         Solutions:\n    \
         → Set `public_key` in .kvault/config.toml\n    \
         → Pass --public-key <key> or set KVAULT_PUBLIC_KEY\n    \
         → Generate a key pair: kvault keys setup"
    )]
    MissingPublicKey,

    #[error(
        "The draft has plaintext edits that were never submitted\n\n  \
         Removing a row saves the whole list right away, which would store them unencrypted.\n\n  \
         Solutions:\n    \
         → Encrypt and save them first: kvault submit\n    \
         → Or drop them: kvault discard"
    )]
    PendingPlaintext,

    #[error(
        "Values were encrypted but {path} was not updated\n\n  \
         Your edits are still in the draft. Check that the file is writable, then run 'kvault submit' again."
    )]
    ItemsNotSaved { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Audit log error: {detail}")]
    AuditError { detail: String },

    #[error(
        "Editing session error: {detail}\n\n  \
         Run 'kvault discard' to reset pending edits, or delete .kvault/draft.json."
    )]
    SessionError { detail: String },

    #[error(
        "This project uses format version {project_version}, but your kvault \
         only supports up to version {supported_version}.\n\n  \
         Solution:\n    \
         → Install the latest release: cargo install kvault --force"
    )]
    FormatVersionTooNew {
        project_version: u32,
        supported_version: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KvaultError>;
