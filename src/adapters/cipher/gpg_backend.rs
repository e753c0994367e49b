use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::core::errors::{KvaultError, Result};
use crate::core::traits::cipher::EncryptionProvider;

/// GPG encryption backend that shells out to the system `gpg` binary.
///
/// The public key is anything `gpg --recipient` accepts (fingerprint,
/// key id or email) and must already be in the local keyring. Each
/// value runs in its own `gpg` process, so a submit with many rows
/// encrypts them in parallel.
pub struct GpgBackend {
    /// Path to the gpg binary (defaults to "gpg").
    gpg_path: PathBuf,
}

impl GpgBackend {
    pub fn new() -> Self {
        Self {
            gpg_path: PathBuf::from("gpg"),
        }
    }

    /// Check if GPG is available on the system.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.gpg_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|s| s.success())
    }

    /// Run gpg with `input` on stdin and return stdout.
    async fn run_gpg(&self, args: &[&str], input: &[u8]) -> Result<Vec<u8>> {
        let failed = |reason: String| KvaultError::EncryptionFailed { reason };

        let mut child = Command::new(&self.gpg_path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| failed(format!("Failed to run gpg: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input)
                .await
                .map_err(|e| failed(format!("Failed to write to gpg stdin: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| failed(format!("gpg process failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("gpg exited with error: {}", stderr.trim())));
        }

        Ok(output.stdout)
    }
}

impl Default for GpgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EncryptionProvider for GpgBackend {
    async fn encrypt(&self, plaintext: &str, public_key: &str) -> Result<String> {
        let recipient = public_key.trim();
        if recipient.is_empty() {
            return Err(KvaultError::EncryptionFailed {
                reason: "No recipient provided".into(),
            });
        }

        let args = [
            "--encrypt",
            "--armor",
            "--batch",
            "--yes",
            "--trust-model",
            "always",
            "--recipient",
            recipient,
        ];
        let stdout = self.run_gpg(&args, plaintext.as_bytes()).await?;

        String::from_utf8(stdout).map_err(|e| KvaultError::EncryptionFailed {
            reason: format!("gpg produced non-UTF-8 output: {e}"),
        })
    }

    async fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let args = ["--decrypt", "--batch", "--yes", "--quiet"];
        let stdout = self
            .run_gpg(&args, ciphertext.as_bytes())
            .await
            .map_err(|_| KvaultError::DecryptionNoKey)?;

        String::from_utf8(stdout).map_err(|_| KvaultError::DecryptionNoKey)
    }

    fn name(&self) -> &str {
        "gpg"
    }
}
