//! Use case for unlocking the session with the stored password.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use cg_core::ports::{KeyDerivationPort, KeyFilePort, SessionPort};
use cg_core::security::model::{EncryptionError, Passphrase, Session};

use super::errors::PasswordError;

/// Verifies the password against the persisted key hash, then derives the key
/// under the persisted salt and installs the session.
///
/// A wrong password is caught by the hash check, so a session holding a wrong
/// key is never installed.
pub struct UnlockSession {
    kdf: Arc<dyn KeyDerivationPort>,
    session: Arc<dyn SessionPort>,
    key_file: Arc<dyn KeyFilePort>,
}

impl UnlockSession {
    pub fn new(
        kdf: Arc<dyn KeyDerivationPort>,
        session: Arc<dyn SessionPort>,
        key_file: Arc<dyn KeyFilePort>,
    ) -> Self {
        Self {
            kdf,
            session,
            key_file,
        }
    }

    /// Whether a password has been set on this machine.
    pub async fn is_configured(&self) -> Result<bool, PasswordError> {
        Ok(self
            .key_file
            .load()
            .await
            .map_err(|e| PasswordError::Storage(format!("{e:#}")))?
            .is_some())
    }

    pub async fn execute(&self, passphrase: Passphrase) -> Result<(), PasswordError> {
        let span = info_span!("usecase.unlock_session.execute");

        async {
            let key_file = self
                .key_file
                .load()
                .await
                .map_err(|e| PasswordError::Storage(format!("{e:#}")))?
                .ok_or(PasswordError::NotConfigured)?;
            let salt = key_file.decode_salt()?;

            if self.kdf.key_hash(&passphrase, &salt) != key_file.key_hash {
                warn!("unlock rejected: password does not match stored key hash");
                return Err(PasswordError::WrongPassword);
            }

            let kdf = self.kdf.clone();
            let (key, salt) = tokio::task::spawn_blocking(move || kdf.derive_key(&passphrase, Some(salt)))
                .await
                .map_err(|_| EncryptionError::CryptoFailure)??;

            self.session
                .install(Session::new(salt, key, key_file.key_hash))
                .await?;

            info!("session unlocked");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
