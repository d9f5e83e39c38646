//! Use case for revealing the clipboard envelope for a limited time.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use cg_core::clipboard::GuardedClipboard;
use cg_core::policy::{EncryptionPolicy, ExposureDuration};

use crate::exposure::{ExposureError, TemporaryExposureScheduler};

/// Reads the envelope off the clipboard and hands it to the exposure
/// scheduler. `None` uses the policy's default duration.
pub struct RevealClipboard {
    clipboard: Arc<GuardedClipboard>,
    exposure: Arc<TemporaryExposureScheduler>,
    policy: Arc<EncryptionPolicy>,
}

impl RevealClipboard {
    pub fn new(
        clipboard: Arc<GuardedClipboard>,
        exposure: Arc<TemporaryExposureScheduler>,
        policy: Arc<EncryptionPolicy>,
    ) -> Self {
        Self {
            clipboard,
            exposure,
            policy,
        }
    }

    pub async fn execute(&self, duration_secs: Option<u64>) -> Result<String, ExposureError> {
        let duration = match duration_secs {
            Some(secs) => ExposureDuration::new(secs)?,
            None => self.policy.default_exposure(),
        };
        let span = info_span!("usecase.reveal_clipboard.execute", secs = duration.secs());

        async {
            let envelope = self.clipboard.read_text()?;
            if envelope.trim().is_empty() {
                return Err(ExposureError::EmptyClipboard);
            }

            let plaintext = self
                .exposure
                .reveal_temporarily(duration.secs(), &envelope)
                .await?;

            info!(plaintext_len = plaintext.len(), "clipboard revealed temporarily");
            Ok(plaintext)
        }
        .instrument(span)
        .await
    }
}
