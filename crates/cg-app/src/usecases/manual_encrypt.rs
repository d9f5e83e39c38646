//! Use case for encrypting the clipboard on demand.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use cg_core::clipboard::GuardedClipboard;
use cg_core::ports::{ClipboardObserver, EnvelopeCryptoPort};

use super::errors::ManualOperationError;

/// Replaces the clipboard plaintext with its envelope, whether or not
/// auto-encryption is enabled.
pub struct ManualEncrypt {
    clipboard: Arc<GuardedClipboard>,
    crypto: Arc<dyn EnvelopeCryptoPort>,
    observer: Arc<dyn ClipboardObserver>,
}

impl ManualEncrypt {
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

    /// Returns the envelope now on the clipboard.
    pub async fn execute(&self) -> Result<String, ManualOperationError> {
        let span = info_span!("usecase.manual_encrypt.execute");

        async {
            let plaintext = self.clipboard.read_text()?;
            if plaintext.trim().is_empty() {
                return Err(ManualOperationError::EmptyClipboard);
            }
            if self.crypto.is_encrypted_text(&plaintext).await {
                return Err(ManualOperationError::AlreadyEncrypted);
            }

            let envelope = self.crypto.encrypt(&plaintext).await?;
            self.clipboard.write_text(&envelope).await?;
            self.observer.on_encryption_performed(&plaintext);

            info!(
                plaintext_len = plaintext.len(),
                envelope_len = envelope.len(),
                "clipboard encrypted on request"
            );
            Ok(envelope)
        }
        .instrument(span)
        .await
    }
}
