use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::errors::{KvaultError, Result};

static KVAULT_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the global kvault directory path.
/// If `custom` is provided, uses that path; otherwise defaults to `.kvault`.
pub fn init(custom: Option<&str>) {
    let dir = custom
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".kvault"));
    let _ = KVAULT_DIR.set(dir);
}

/// Get the current kvault directory path.
pub fn kvault_dir() -> &'static Path {
    KVAULT_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new(".kvault"))
}

/// Directory that holds the kvault directory; templates are looked up here.
pub fn project_root() -> &'static Path {
    match kvault_dir().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Fail unless `kvault init` has been run.
pub fn require_initialized() -> Result<&'static Path> {
    let dir = kvault_dir();
    if !dir.exists() {
        return Err(KvaultError::InvalidConfig {
            detail: "kvault not initialized. Run 'kvault init' first.".into(),
        });
    }
    Ok(dir)
}

/// Reject anything but a bare file name (no separators, no `..`).
pub fn validate_simple_filename(name: &str, what: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');

    if invalid {
        return Err(KvaultError::InvalidConfig {
            detail: format!("Invalid {what} '{name}': must be a plain file name"),
        });
    }
    Ok(())
}
