//! Use case for switching auto-encryption on or off.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use cg_core::policy::EncryptionPolicy;
use cg_core::ports::{SessionPort, SettingsPort};

use super::errors::SettingsUpdateError;

/// Flips `encryption_enabled`, persists it and publishes it to the live
/// policy read by the poll loop.
///
/// Requires a session in both directions.
pub struct ToggleEncryption {
    session: Arc<dyn SessionPort>,
    settings: Arc<dyn SettingsPort>,
    policy: Arc<EncryptionPolicy>,
}

impl ToggleEncryption {
    pub fn new(
        session: Arc<dyn SessionPort>,
        settings: Arc<dyn SettingsPort>,
        policy: Arc<EncryptionPolicy>,
    ) -> Self {
        Self {
            session,
            settings,
            policy,
        }
    }

    /// Returns the new value.
    pub async fn execute(&self) -> Result<bool, SettingsUpdateError> {
        self.set(!self.policy.encryption_enabled()).await
    }

    pub async fn set(&self, enabled: bool) -> Result<bool, SettingsUpdateError> {
        let span = info_span!("usecase.toggle_encryption.execute", enabled);

        async {
            if !self.session.is_ready().await {
                return Err(SettingsUpdateError::NoSession);
            }

            let mut settings = self
                .settings
                .load()
                .await
                .map_err(|e| SettingsUpdateError::Storage(format!("{e:#}")))?;
            settings.security.encryption_enabled = enabled;
            self.settings
                .save(&settings)
                .await
                .map_err(|e| SettingsUpdateError::Storage(format!("{e:#}")))?;

            self.policy.set_encryption_enabled(enabled);
            info!("auto-encryption {}", if enabled { "enabled" } else { "disabled" });
            Ok(enabled)
        }
        .instrument(span)
        .await
    }
}
