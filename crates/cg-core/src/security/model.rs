//! Security / Encryption domain models.
//!
//! This module contains pure domain models used by encryption-related use cases.
//! It does NOT implement crypto algorithms or persistence.
//!
//! Design: password-derived key only.
//! - Passphrase + Salt -> KDF -> DerivedKey
//! - DerivedKey encrypts/decrypts clipboard text into envelopes
//! - KeyHash (fast, one-way) verifies the passphrase before derivation

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Secrets (newtypes)
/// =========================

/// Passphrase provided by user. Only used to derive the key and the key hash.
/// Avoid storing this beyond the set-password/unlock flow.
#[derive(Clone)]
pub struct Passphrase(pub String);

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passphrase([REDACTED])")
    }
}

impl Passphrase {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Number of characters (not bytes) in the passphrase.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl Drop for Passphrase {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// KDF salt. Generated once per installation and persisted next to the key hash.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt(pub [u8; Salt::LEN]);

impl Salt {
    pub const LEN: usize = 16;

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncryptionError> {
        if bytes.len() != Self::LEN {
            return Err(EncryptionError::InvalidParameter(format!(
                "invalid salt length: expected {}, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        let mut salt = [0u8; Self::LEN];
        salt.copy_from_slice(bytes);
        Ok(Salt(salt))
    }

    /// Lowercase hex, as fed into the key hash.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", self.to_hex())
    }
}

/// The 32-byte symmetric key derived from passphrase + salt.
///
/// - Do NOT implement Serialize/Deserialize.
/// - Wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey(pub [u8; DerivedKey::LEN]);

impl DerivedKey {
    pub const LEN: usize = 32;

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncryptionError> {
        if bytes.len() != Self::LEN {
            return Err(EncryptionError::InvalidParameter(format!(
                "invalid key length: expected {}, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        let mut key = [0u8; Self::LEN];
        key.copy_from_slice(bytes);
        Ok(DerivedKey(key))
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey([REDACTED])")
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// One-way password fingerprint (hex SHA-256 over `password || hex(salt)`).
///
/// NOT key material: safe to persist alongside the salt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyHash(pub String);

impl KeyHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session
/// =========================
///
/// In-memory holder of the key material for the engine's lifetime.
/// Never mutated in place; re-keying builds a new `Session` and swaps it.
pub struct Session {
    salt: Salt,
    key: DerivedKey,
    key_hash: KeyHash,
}

impl Session {
    pub fn new(salt: Salt, key: DerivedKey, key_hash: KeyHash) -> Self {
        Self {
            salt,
            key,
            key_hash,
        }
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn key(&self) -> &DerivedKey {
        &self.key
    }

    pub fn key_hash(&self) -> &KeyHash {
        &self.key_hash
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("salt", &self.salt)
            .field("key", &self.key)
            .field("key_hash", &self.key_hash)
            .finish()
    }
}

/// KeyFile (persistent; no passphrase, no key)
/// =========================
///
/// On-disk schema: `{ "salt": base64(16 bytes), "key_hash": hex }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub salt: String,
    pub key_hash: KeyHash,
}

impl KeyFile {
    pub fn new(salt: &Salt, key_hash: KeyHash) -> Self {
        Self {
            salt: STANDARD.encode(salt.as_bytes()),
            key_hash,
        }
    }

    pub fn decode_salt(&self) -> Result<Salt, EncryptionError> {
        let bytes = STANDARD
            .decode(self.salt.trim())
            .map_err(|_| EncryptionError::KeyFileCorrupt)?;
        Salt::from_bytes(&bytes).map_err(|_| EncryptionError::KeyFileCorrupt)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("no session: set or unlock a password first")]
    NoSession,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("encryption failed")]
    EncryptFailed,

    #[error("KDF operation failed")]
    KdfFailed,

    #[error("internal crypto failure")]
    CryptoFailure,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("key file is corrupt")]
    KeyFileCorrupt,
}
