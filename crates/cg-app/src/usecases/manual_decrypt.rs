//! Use case for permanently decrypting the clipboard.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use cg_core::clipboard::GuardedClipboard;
use cg_core::ports::{ClipboardObserver, EnvelopeCryptoPort};
use cg_core::security::model::EncryptionError;

use super::errors::ManualOperationError;

/// Replaces the envelope on the clipboard with its plaintext. No reversion is
/// scheduled; see [`crate::usecases::RevealClipboard`] for the time-boxed
/// variant.
pub struct ManualDecrypt {
    clipboard: Arc<GuardedClipboard>,
    crypto: Arc<dyn EnvelopeCryptoPort>,
    observer: Arc<dyn ClipboardObserver>,
}

impl ManualDecrypt {
    pub fn new(
        clipboard: Arc<GuardedClipboard>,
        crypto: Arc<dyn EnvelopeCryptoPort>,
        observer: Arc<dyn ClipboardObserver>,
    ) -> Self {
        Self {
            clipboard,
            crypto,
            observer,
        }
    }

    /// Returns the plaintext now on the clipboard.
    pub async fn execute(&self) -> Result<String, ManualOperationError> {
        let span = info_span!("usecase.manual_decrypt.execute");

        async {
            let envelope = self.clipboard.read_text()?;
            if envelope.trim().is_empty() {
                return Err(ManualOperationError::EmptyClipboard);
            }

            let plaintext = match self.crypto.decrypt(&envelope).await {
                Ok(plaintext) => plaintext,
                Err(EncryptionError::NoSession) => {
                    return Err(ManualOperationError::Encryption(EncryptionError::NoSession))
                }
                Err(_) => return Err(ManualOperationError::NotEncrypted),
            };

            self.clipboard.write_text(&plaintext).await?;
            self.observer.on_decryption_performed(&plaintext);

            info!(plaintext_len = plaintext.len(), "clipboard decrypted on request");
            Ok(plaintext)
        }
        .instrument(span)
        .await
    }
}
