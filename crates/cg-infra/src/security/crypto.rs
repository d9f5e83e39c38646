//! Password-based clipboard envelope encryption.
//!
//! Envelope layout, encoded as URL-safe base64 (padded):
//!
//! ```text
//! | nonce (24) | ciphertext (n) | poly1305 tag (16) |
//! ```
//!
//! The envelope carries no format marker: something is an envelope iff it
//! decrypts under the current key.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{KeyInit, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroize;

use cg_core::ports::{EnvelopeCryptoPort, KeyDerivationPort, SessionPort};
use cg_core::security::model::{DerivedKey, EncryptionError, KeyHash, Passphrase, Salt};

/// PBKDF2-HMAC-SHA256 rounds used in production.
pub const KDF_ITERATIONS: u32 = 100_000;

const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

pub struct CryptoEngine {
    session: Arc<dyn SessionPort>,
    kdf_iterations: u32,
}

impl CryptoEngine {
    pub fn new(session: Arc<dyn SessionPort>) -> Self {
        Self {
            session,
            kdf_iterations: KDF_ITERATIONS,
        }
    }

    /// Lower the KDF cost. Only meant for tests; keys derived with a different
    /// iteration count are incompatible with production keys.
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    fn cipher(key: &DerivedKey) -> Result<XChaCha20Poly1305, EncryptionError> {
        XChaCha20Poly1305::new_from_slice(key.as_bytes()).map_err(|_| EncryptionError::CryptoFailure)
    }

    /// Encrypt under an explicit key.
    pub fn seal(key: &DerivedKey, plaintext: &str) -> Result<String, EncryptionError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let ciphertext = Self::cipher(key)?
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| EncryptionError::EncryptFailed)?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);

        Ok(URL_SAFE.encode(raw))
    }

    /// Decrypt under an explicit key. Any failure maps to `DecryptionFailed`.
    pub fn open(key: &DerivedKey, envelope: &str) -> Result<String, EncryptionError> {
        let raw = URL_SAFE
            .decode(envelope.trim())
            .map_err(|_| EncryptionError::DecryptionFailed)?;

        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(EncryptionError::DecryptionFailed);
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);

        let mut plaintext = Self::cipher(key)?
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| EncryptionError::DecryptionFailed)?;

        match String::from_utf8(plaintext) {
            Ok(text) => Ok(text),
            Err(err) => {
                plaintext = err.into_bytes();
                plaintext.zeroize();
                Err(EncryptionError::DecryptionFailed)
            }
        }
    }
}

impl KeyDerivationPort for CryptoEngine {
    fn derive_key(
        &self,
        passphrase: &Passphrase,
        salt: Option<Salt>,
    ) -> Result<(DerivedKey, Salt), EncryptionError> {
        if self.kdf_iterations == 0 {
            return Err(EncryptionError::InvalidParameter(
                "kdf iterations must be positive".into(),
            ));
        }

        let salt = salt.unwrap_or_else(|| {
            let mut bytes = [0u8; Salt::LEN];
            rand::rng().fill_bytes(&mut bytes);
            Salt(bytes)
        });

        let mut okm = [0u8; DerivedKey::LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(
            passphrase.as_bytes(),
            salt.as_bytes(),
            self.kdf_iterations,
            &mut okm,
        );
        let key = DerivedKey(okm);
        okm.zeroize();

        debug!(iterations = self.kdf_iterations, "derived clipboard key");
        Ok((key, salt))
    }

    fn key_hash(&self, passphrase: &Passphrase, salt: &Salt) -> KeyHash {
        let mut hasher = Sha256::new();
        hasher.update(passphrase.as_bytes());
        hasher.update(salt.to_hex().as_bytes());
        KeyHash(hex::encode(hasher.finalize()))
    }
}

#[async_trait]
impl EnvelopeCryptoPort for CryptoEngine {
    async fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        let session = self.session.current().await?;
        Self::seal(session.key(), plaintext)
    }

    async fn decrypt(&self, envelope: &str) -> Result<String, EncryptionError> {
        let session = self.session.current().await?;
        Self::open(session.key(), envelope)
    }

    async fn is_encrypted_text(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.decrypt(text).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::InMemorySession;
    use cg_core::security::model::Session;

    const TEST_ITERATIONS: u32 = 1_000;

    async fn engine_with_password(password: &str, salt: Option<Salt>) -> CryptoEngine {
        let session = Arc::new(InMemorySession::new());
        let engine = CryptoEngine::new(session.clone()).with_kdf_iterations(TEST_ITERATIONS);
        let pass = Passphrase(password.to_string());
        let (key, salt) = engine.derive_key(&pass, salt).unwrap();
        let hash = engine.key_hash(&pass, &salt);
        session.install(Session::new(salt, key, hash)).await.unwrap();
        engine
    }

    #[test]
    fn production_iteration_count() {
        let engine = CryptoEngine::new(Arc::new(InMemorySession::new()));
        assert_eq!(engine.kdf_iterations, 100_000);
    }

    #[test]
    fn derive_key_is_deterministic_per_password_and_salt() {
        let engine = CryptoEngine::new(Arc::new(InMemorySession::new()))
            .with_kdf_iterations(TEST_ITERATIONS);
        let pass = Passphrase("correct horse".into());
        let salt = Salt([3u8; Salt::LEN]);

        let (a, _) = engine.derive_key(&pass, Some(salt)).unwrap();
        let (b, _) = engine.derive_key(&pass, Some(salt)).unwrap();
        let (c, _) = engine
            .derive_key(&Passphrase("other".into()), Some(salt))
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn derive_key_without_salt_generates_a_fresh_one() {
        let engine = CryptoEngine::new(Arc::new(InMemorySession::new()))
            .with_kdf_iterations(TEST_ITERATIONS);
        let pass = Passphrase("pw".into());

        let (_, s1) = engine.derive_key(&pass, None).unwrap();
        let (_, s2) = engine.derive_key(&pass, None).unwrap();

        assert_ne!(s1, s2);
    }

    #[test]
    fn key_hash_is_sha256_of_password_and_hex_salt() {
        let engine = CryptoEngine::new(Arc::new(InMemorySession::new()));
        let salt = Salt([0u8; Salt::LEN]);

        let hash = engine.key_hash(&Passphrase("abc".into()), &salt);

        let mut expected = Sha256::new();
        expected.update(b"abc");
        expected.update("0".repeat(32).as_bytes());
        assert_eq!(hash.as_str(), hex::encode(expected.finalize()));
        assert_eq!(hash.as_str().len(), 64);
    }

    #[tokio::test]
    async fn encrypt_without_session_fails() {
        let engine = CryptoEngine::new(Arc::new(InMemorySession::new()));

        let err = engine.encrypt("hello").await.unwrap_err();
        assert!(matches!(err, EncryptionError::NoSession));
        assert!(!engine.is_encrypted_text("anything").await);
    }

    #[tokio::test]
    async fn round_trips_empty_long_and_unicode_text() {
        let engine = engine_with_password("secret-pw", None).await;
        let long = "x".repeat(200_000);

        for plaintext in ["", "hello", "héllo wörld ✓ 你好 🎉\n\t", long.as_str()] {
            let envelope = engine.encrypt(plaintext).await.unwrap();
            assert_eq!(engine.decrypt(&envelope).await.unwrap(), plaintext);
        }
    }

    #[tokio::test]
    async fn envelope_is_clipboard_safe_and_nonce_is_fresh() {
        let engine = engine_with_password("secret-pw", None).await;

        let a = engine.encrypt("same").await.unwrap();
        let b = engine.encrypt("same").await.unwrap();

        assert_ne!(a, b);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    }

    #[tokio::test]
    async fn detection_is_sound() {
        let engine = engine_with_password("secret-pw", None).await;
        let envelope = engine.encrypt("payload").await.unwrap();

        assert!(engine.is_encrypted_text(&envelope).await);
        assert!(engine.is_encrypted_text(&format!("  {envelope}\n")).await);
        assert!(!engine.is_encrypted_text("meet me at noon").await);
        assert!(!engine.is_encrypted_text("").await);
        // valid base64 but not an envelope
        assert!(!engine.is_encrypted_text("aGVsbG8gd29ybGQgaGVsbG8gd29ybGQgaGVsbG8gd29ybGQ=").await);
    }

    #[tokio::test]
    async fn wrong_password_with_correct_salt_fails_to_decrypt() {
        let salt = Salt([5u8; Salt::LEN]);
        let alice = engine_with_password("right-password", Some(salt)).await;
        let mallory = engine_with_password("wrong-password", Some(salt)).await;

        let envelope = alice.encrypt("top secret").await.unwrap();

        let err = mallory.decrypt(&envelope).await.unwrap_err();
        assert!(matches!(err, EncryptionError::DecryptionFailed));
        assert!(!mallory.is_encrypted_text(&envelope).await);
    }

    #[tokio::test]
    async fn tampered_envelope_is_rejected() {
        let engine = engine_with_password("secret-pw", None).await;
        let envelope = engine.encrypt("payload").await.unwrap();

        let mut raw = URL_SAFE.decode(&envelope).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = URL_SAFE.encode(raw);

        assert!(matches!(
            engine.decrypt(&tampered).await,
            Err(EncryptionError::DecryptionFailed)
        ));
    }
}
