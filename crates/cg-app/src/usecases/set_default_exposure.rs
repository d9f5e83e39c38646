//! Use case for changing the default plaintext window.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use cg_core::policy::{EncryptionPolicy, ExposureDuration};
use cg_core::ports::SettingsPort;

use super::errors::SettingsUpdateError;

pub struct SetDefaultExposure {
    settings: Arc<dyn SettingsPort>,
    policy: Arc<EncryptionPolicy>,
}

impl SetDefaultExposure {
    pub fn new(settings: Arc<dyn SettingsPort>, policy: Arc<EncryptionPolicy>) -> Self {
        Self { settings, policy }
    }

    /// Validates `secs` against [5, 300] before anything is written.
    pub async fn execute(&self, secs: u64) -> Result<ExposureDuration, SettingsUpdateError> {
        let span = info_span!("usecase.set_default_exposure.execute", secs);

        async {
            let duration = ExposureDuration::new(secs)?;

            let mut settings = self
                .settings
                .load()
                .await
                .map_err(|e| SettingsUpdateError::Storage(format!("{e:#}")))?;
            settings.exposure.default_duration_secs = duration.secs();
            self.settings
                .save(&settings)
                .await
                .map_err(|e| SettingsUpdateError::Storage(format!("{e:#}")))?;

            self.policy.set_default_exposure(duration);
            info!("default exposure duration updated");
            Ok(duration)
        }
        .instrument(span)
        .await
    }
}
