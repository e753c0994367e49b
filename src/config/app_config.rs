use serde::Deserialize;
use std::path::Path;

use crate::core::errors::{KvaultError, Result};

/// Top-level kvault configuration read from `.kvault/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub kvault: KvaultSection,
    pub audit: Option<AuditSection>,
}

impl AppConfig {
    /// Load the configuration from `{kvault_dir}/config.toml`.
    ///
    /// After parsing, checks the format version and validates the audit
    /// log filename so a tampered config cannot write outside the
    /// project directory.
    pub fn load(kvault_dir: &Path) -> Result<Self> {
        let config_path = kvault_dir.join("config.toml");
        if !config_path.exists() {
            return Err(KvaultError::InvalidConfig {
                detail: "config.toml not found. Run 'kvault init' first.".into(),
            });
        }
        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content).map_err(|e| KvaultError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.kvault.format_version > CURRENT_FORMAT_VERSION {
            return Err(KvaultError::FormatVersionTooNew {
                project_version: config.kvault.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }

        if let Some(audit) = &config.audit {
            crate::cli::context::validate_simple_filename(&audit.log_file, "audit log file")?;
        }

        for key in &config.kvault.required {
            if key.trim().is_empty() {
                return Err(KvaultError::InvalidConfig {
                    detail: "`required` contains an empty key".into(),
                });
            }
        }

        Ok(config)
    }

    /// False only when `[audit] enabled = false`.
    pub fn audit_enabled(&self) -> bool {
        self.audit.as_ref().is_none_or(|a| a.enabled)
    }

    /// File name of the audit log inside the kvault directory.
    pub fn audit_log_name(&self) -> &str {
        self.audit
            .as_ref()
            .map_or(DEFAULT_AUDIT_LOG, |a| a.log_file.as_str())
    }
}

/// Audit log used when the config has no `[audit]` section.
pub const DEFAULT_AUDIT_LOG: &str = "audit.log";

/// Current format version supported by this build of kvault.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// The `[kvault]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct KvaultSection {
    pub version: String,
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    /// Encryption backend: "age" or "gpg".
    #[serde(default = "default_cipher")]
    pub cipher: String,
    /// Recipient that submitted values are encrypted for.
    pub public_key: Option<String>,
    /// Flag repeated keys in `kvault list`.
    #[serde(default = "default_unique")]
    pub unique: bool,
    /// Template file whose keys count as defined (optional).
    pub template: Option<String>,
    /// Keys that can be cleared but never removed.
    #[serde(default)]
    pub required: Vec<String>,
}

fn default_format_version() -> u32 {
    1
}

fn default_cipher() -> String {
    "age".to_string()
}

fn default_unique() -> bool {
    true
}

/// The `[audit]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditSection {
    pub enabled: bool,
    pub log_file: String,
}
