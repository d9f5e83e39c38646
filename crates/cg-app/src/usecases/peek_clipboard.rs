//! Use case for looking at the clipboard plaintext without changing it.

use std::sync::Arc;

use tracing::{debug, info_span, Instrument};

use cg_core::clipboard::GuardedClipboard;
use cg_core::ports::{ClipboardIoError, EnvelopeCryptoPort};

use crate::exposure::TemporaryExposureScheduler;

/// Never writes to the clipboard and fires no observer event.
///
/// - blank clipboard: `""`
/// - envelope: its plaintext, or `""` if it stops decrypting in between
/// - anything else: returned as is
pub struct PeekClipboard {
    clipboard: Arc<GuardedClipboard>,
    crypto: Arc<dyn EnvelopeCryptoPort>,
    exposure: Arc<TemporaryExposureScheduler>,
}

impl PeekClipboard {
    pub fn new(
        clipboard: Arc<GuardedClipboard>,
        crypto: Arc<dyn EnvelopeCryptoPort>,
        exposure: Arc<TemporaryExposureScheduler>,
    ) -> Self {
        Self {
            clipboard,
            crypto,
            exposure,
        }
    }

    pub async fn execute(&self) -> Result<String, ClipboardIoError> {
        let span = info_span!("usecase.peek_clipboard.execute");

        async {
            let content = self.clipboard.read_text()?;
            if content.trim().is_empty() {
                return Ok(String::new());
            }

            if self.crypto.is_encrypted_text(&content).await {
                debug!(envelope_len = content.len(), "peeking at envelope");
                Ok(self.exposure.peek(&content).await)
            } else {
                Ok(content)
            }
        }
        .instrument(span)
        .await
    }
}
