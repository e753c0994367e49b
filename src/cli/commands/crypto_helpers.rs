use std::future::Future;
use std::path::PathBuf;

use crate::adapters::cipher::age_backend::AgeBackend;
use crate::adapters::cipher::gpg_backend::GpgBackend;
use crate::cli::CryptoArgs;
use crate::config::app_config::AppConfig;
use crate::core::errors::{KvaultError, Result};
use crate::core::traits::cipher::EncryptionProvider;

/// The configured encryption backend.
pub enum Cipher {
    Age(AgeBackend),
    Gpg(GpgBackend),
}

impl Cipher {
    /// Pick the backend from `--cipher`, falling back to config.
    pub fn select(args: &CryptoArgs, config: &AppConfig) -> Result<Self> {
        let name = args.cipher.as_deref().unwrap_or(&config.kvault.cipher);
        match name {
            "age" => Ok(Self::Age(AgeBackend::new(identity_path(args)?))),
            "gpg" => {
                let backend = GpgBackend::new();
                if !block_on(backend.is_available())? {
                    return Err(KvaultError::EncryptionFailed {
                        reason: "gpg not found on PATH. Install GnuPG or use --cipher age".into(),
                    });
                }
                Ok(Self::Gpg(backend))
            }
            other => Err(KvaultError::InvalidConfig {
                detail: format!("Unknown cipher backend: '{other}'. Use 'age' or 'gpg'."),
            }),
        }
    }
}

impl EncryptionProvider for Cipher {
    async fn encrypt(&self, plaintext: &str, public_key: &str) -> Result<String> {
        match self {
            Self::Age(backend) => backend.encrypt(plaintext, public_key).await,
            Self::Gpg(backend) => backend.encrypt(plaintext, public_key).await,
        }
    }

    async fn decrypt(&self, ciphertext: &str) -> Result<String> {
        match self {
            Self::Age(backend) => backend.decrypt(ciphertext).await,
            Self::Gpg(backend) => backend.decrypt(ciphertext).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Age(backend) => backend.name(),
            Self::Gpg(backend) => backend.name(),
        }
    }
}

/// `--identity`/`KVAULT_IDENTITY`, or the platform default.
pub fn identity_path(args: &CryptoArgs) -> Result<PathBuf> {
    match &args.identity {
        Some(path) => Ok(path.clone()),
        None => AgeBackend::default_identity_path(),
    }
}

/// The recipient to encrypt for.
///
/// Resolution order:
/// 1. `--public-key` / `KVAULT_PUBLIC_KEY`
/// 2. `public_key` in config
/// 3. The public half of the local age identity (age only)
pub fn resolve_public_key(args: &CryptoArgs, config: &AppConfig, cipher: &Cipher) -> Result<String> {
    if let Some(key) = args
        .public_key
        .as_deref()
        .or(config.kvault.public_key.as_deref())
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        return Ok(key.to_string());
    }

    if let Cipher::Age(_) = cipher {
        let path = identity_path(args)?;
        if path.exists() {
            return AgeBackend::read_public_key(&path);
        }
    }

    Err(KvaultError::MissingPublicKey)
}

/// Run a future to completion on a single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}
