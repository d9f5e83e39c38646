use std::sync::Arc;

use async_trait::async_trait;

use crate::security::model::{DerivedKey, EncryptionError, KeyHash, Passphrase, Salt, Session};

/// Holder of the current [`Session`].
///
/// Re-keying replaces the whole `Arc<Session>`; readers never observe a
/// half-updated session.
#[async_trait]
pub trait SessionPort: Send + Sync {
    /// Returns whether a session is currently installed.
    async fn is_ready(&self) -> bool;

    /// Get the current session, or `EncryptionError::NoSession`.
    async fn current(&self) -> Result<Arc<Session>, EncryptionError>;

    /// Set or replace the session.
    async fn install(&self, session: Session) -> Result<(), EncryptionError>;

    /// Drop the session from memory.
    async fn clear(&self) -> Result<(), EncryptionError>;
}

/// Envelope encryption bound to the current session.
#[async_trait]
pub trait EnvelopeCryptoPort: Send + Sync {
    /// Encrypt `plaintext` into clipboard-safe envelope text.
    ///
    /// Failure mapping:
    /// - no session installed -> EncryptionError::NoSession
    async fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError>;

    /// Decrypt envelope text. All-or-nothing.
    ///
    /// Failure mapping:
    /// - no session installed                 -> EncryptionError::NoSession
    /// - bad encoding / auth failure / not UTF-8 -> EncryptionError::DecryptionFailed
    async fn decrypt(&self, envelope: &str) -> Result<String, EncryptionError>;

    /// True iff `decrypt(text)` would succeed. Never errors.
    async fn is_encrypted_text(&self, text: &str) -> bool;
}

/// Password-based key derivation and password fingerprinting.
pub trait KeyDerivationPort: Send + Sync {
    /// Derive a 32-byte key. `None` salt means generate a fresh random one.
    ///
    /// Deterministic per (passphrase, salt).
    fn derive_key(
        &self,
        passphrase: &Passphrase,
        salt: Option<Salt>,
    ) -> Result<(DerivedKey, Salt), EncryptionError>;

    /// Hex SHA-256 over `passphrase || hex(salt)`.
    fn key_hash(&self, passphrase: &Passphrase, salt: &Salt) -> KeyHash;
}
