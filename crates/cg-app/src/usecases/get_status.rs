//! Use case for reporting engine and clipboard state.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info_span, Instrument};

use cg_core::clipboard::GuardedClipboard;
use cg_core::policy::EncryptionPolicy;
use cg_core::ports::{EnvelopeCryptoPort, KeyFilePort, MonitorControlPort, SessionPort};

use crate::exposure::TemporaryExposureScheduler;

/// What is on the clipboard right now, without its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardInfo {
    /// Length in characters.
    pub length: usize,
    pub has_content: bool,
    /// `None` while no session is unlocked: detection needs the key, so an
    /// envelope cannot be told apart from plaintext.
    pub is_encrypted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStatus {
    pub password_configured: bool,
    pub session_ready: bool,
    pub encryption_enabled: bool,
    pub monitor_running: bool,
    pub default_exposure_secs: u64,
    /// Wall-clock millis at which a pending reveal re-encrypts.
    pub exposure_expires_at_ms: Option<i64>,
    pub clipboard: ClipboardInfo,
}

pub struct GetStatus {
    clipboard: Arc<GuardedClipboard>,
    crypto: Arc<dyn EnvelopeCryptoPort>,
    session: Arc<dyn SessionPort>,
    key_file: Arc<dyn KeyFilePort>,
    monitor: Arc<dyn MonitorControlPort>,
    policy: Arc<EncryptionPolicy>,
    exposure: Arc<TemporaryExposureScheduler>,
}

impl GetStatus {
    pub fn new(
        clipboard: Arc<GuardedClipboard>,
        crypto: Arc<dyn EnvelopeCryptoPort>,
        session: Arc<dyn SessionPort>,
        key_file: Arc<dyn KeyFilePort>,
        monitor: Arc<dyn MonitorControlPort>,
        policy: Arc<EncryptionPolicy>,
        exposure: Arc<TemporaryExposureScheduler>,
    ) -> Self {
        Self {
            clipboard,
            crypto,
            session,
            key_file,
            monitor,
            policy,
            exposure,
        }
    }

    /// Only the clipboard read and the key file lookup can fail.
    pub async fn execute(&self) -> Result<AppStatus> {
        let span = info_span!("usecase.get_status.execute");

        async {
            let clipboard = self.clipboard_info().await?;
            let password_configured = self
                .key_file
                .load()
                .await
                .context("failed to read key file")?
                .is_some();

            let status = AppStatus {
                password_configured,
                session_ready: self.session.is_ready().await,
                encryption_enabled: self.policy.encryption_enabled(),
                monitor_running: self.monitor.is_running(),
                default_exposure_secs: self.policy.default_exposure().secs(),
                exposure_expires_at_ms: self.exposure.pending().map(|job| job.expires_at_ms),
                clipboard,
            };
            debug!(?status, "status collected");
            Ok(status)
        }
        .instrument(span)
        .await
    }

    pub async fn clipboard_info(&self) -> Result<ClipboardInfo> {
        let content = self
            .clipboard
            .read_text()
            .context("failed to read clipboard")?;
        let has_content = !content.trim().is_empty();

        let is_encrypted = if !has_content {
            Some(false)
        } else if self.session.is_ready().await {
            Some(self.crypto.is_encrypted_text(&content).await)
        } else {
            None
        };

        Ok(ClipboardInfo {
            length: content.chars().count(),
            has_content,
            is_encrypted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::Harness;

    #[tokio::test]
    async fn fresh_install_reports_nothing_configured() {
        let h = Harness::new();

        let status = h.ctx.usecases().get_status().execute().await.unwrap();

        assert_eq!(
            status,
            AppStatus {
                password_configured: false,
                session_ready: false,
                encryption_enabled: false,
                monitor_running: false,
                default_exposure_secs: 10,
                exposure_expires_at_ms: None,
                clipboard: ClipboardInfo {
                    length: 0,
                    has_content: false,
                    is_encrypted: Some(false),
                },
            }
        );
    }

    #[tokio::test]
    async fn reports_envelope_and_session() {
        let h = Harness::unlocked().await;
        let envelope = h.crypto.encrypt("abc").await.unwrap();
        h.clipboard.user_copy(envelope.clone());

        let status = h.ctx.usecases().get_status().execute().await.unwrap();

        assert!(status.password_configured);
        assert!(status.session_ready);
        assert_eq!(status.clipboard.length, envelope.len());
        assert!(status.clipboard.has_content);
        assert_eq!(status.clipboard.is_encrypted, Some(true));
    }

    #[tokio::test]
    async fn envelope_is_unknown_rather_than_plaintext_while_locked() {
        let h = Harness::unlocked().await;
        let envelope = h.crypto.encrypt("abc").await.unwrap();
        h.clipboard.user_copy(envelope);
        h.ctx.usecases().lock_session().execute().await.unwrap();

        let status = h.ctx.usecases().get_status().execute().await.unwrap();

        assert!(status.password_configured);
        assert!(!status.session_ready);
        assert!(status.clipboard.has_content);
        assert_eq!(status.clipboard.is_encrypted, None);
    }

    #[tokio::test]
    async fn length_counts_characters() {
        let h = Harness::unlocked().await;
        h.clipboard.user_copy("héllo");

        let info = h
            .ctx
            .usecases()
            .get_status()
            .clipboard_info()
            .await
            .unwrap();

        assert_eq!(info.length, 5);
        assert_eq!(info.is_encrypted, Some(false));
    }

    #[tokio::test]
    async fn monitor_and_pending_reveal_are_visible() {
        let h = Harness::unlocked().await;
        let envelope = h.crypto.encrypt("abc").await.unwrap();
        h.clipboard.user_copy(envelope);
        h.ctx.usecases().start_clipboard_monitor().execute().await.unwrap();
        h.ctx
            .usecases()
            .reveal_clipboard()
            .execute(Some(30))
            .await
            .unwrap();

        let status = h.ctx.usecases().get_status().execute().await.unwrap();

        assert!(status.monitor_running);
        assert!(status.exposure_expires_at_ms.is_some());

        h.ctx.usecases().stop_clipboard_monitor().execute().await.unwrap();
        h.ctx.exposure().cancel_pending();
    }
}
