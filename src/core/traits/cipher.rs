use crate::core::errors::Result;

/// Port for the encryption provider used on submit.
///
/// Implementations live in `adapters::cipher` (AgeBackend, GpgBackend).
/// The editor only depends on this trait. From its point of view
/// `encrypt` is a pure function of plaintext and public key.
pub trait EncryptionProvider: Send + Sync {
    /// Encrypt `plaintext` for `public_key`, returning armored ciphertext.
    async fn encrypt(&self, plaintext: &str, public_key: &str) -> Result<String>;

    /// Decrypt armored ciphertext with the local private key.
    async fn decrypt(&self, ciphertext: &str) -> Result<String>;

    /// Human-readable name of this backend (e.g. "age", "gpg").
    fn name(&self) -> &str;
}
