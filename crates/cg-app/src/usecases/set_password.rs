//! Use case for setting (or replacing) the clipboard password.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use cg_core::ports::{KeyDerivationPort, KeyFilePort, SessionPort};
use cg_core::security::model::{EncryptionError, KeyFile, Passphrase, Session};

use super::errors::PasswordError;

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Derives a key under a fresh salt, persists `{salt, key_hash}` and installs
/// the new session.
///
/// Replacing an existing password re-keys: envelopes produced under the old
/// key no longer decrypt.
pub struct SetPassword {
    kdf: Arc<dyn KeyDerivationPort>,
    session: Arc<dyn SessionPort>,
    key_file: Arc<dyn KeyFilePort>,
}

impl SetPassword {
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

    pub async fn execute(&self, passphrase: Passphrase) -> Result<(), PasswordError> {
        let span = info_span!("usecase.set_password.execute");

        async {
            if passphrase.char_len() < MIN_PASSWORD_CHARS {
                return Err(PasswordError::TooShort {
                    min: MIN_PASSWORD_CHARS,
                });
            }

            let replacing = self
                .key_file
                .load()
                .await
                .map_err(|e| PasswordError::Storage(format!("{e:#}")))?
                .is_some();
            if replacing {
                warn!("replacing existing password; old envelopes will not decrypt");
            }

            // PBKDF2 at production cost takes a noticeable slice of a second
            let kdf = self.kdf.clone();
            let (key, salt, key_hash) = tokio::task::spawn_blocking(move || {
                let (key, salt) = kdf.derive_key(&passphrase, None)?;
                let key_hash = kdf.key_hash(&passphrase, &salt);
                Ok::<_, EncryptionError>((key, salt, key_hash))
            })
            .await
            .map_err(|_| EncryptionError::CryptoFailure)??;

            self.key_file
                .save(&KeyFile::new(&salt, key_hash.clone()))
                .await
                .map_err(|e| PasswordError::Storage(format!("{e:#}")))?;

            self.session
                .install(Session::new(salt, key, key_hash))
                .await?;

            info!(replacing, "password set, session installed");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
