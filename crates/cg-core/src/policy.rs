//! Live encryption policy shared by the monitor and the use cases.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::settings::Settings;

pub const MIN_EXPOSURE_SECS: u64 = 5;
pub const MAX_EXPOSURE_SECS: u64 = 300;
pub const DEFAULT_EXPOSURE_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("exposure duration must be between 5 and 300 seconds, got {0}")]
pub struct InvalidDurationError(pub u64);

/// A plaintext exposure window, validated to lie in [5, 300] seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposureDuration(u64);

impl ExposureDuration {
    pub fn new(secs: u64) -> Result<Self, InvalidDurationError> {
        if (MIN_EXPOSURE_SECS..=MAX_EXPOSURE_SECS).contains(&secs) {
            Ok(Self(secs))
        } else {
            Err(InvalidDurationError(secs))
        }
    }

    pub fn secs(self) -> u64 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for ExposureDuration {
    fn default() -> Self {
        Self(DEFAULT_EXPOSURE_SECS)
    }
}

/// Runtime view of the user's policy. Cheap to read from the poll loop.
#[derive(Debug)]
pub struct EncryptionPolicy {
    encryption_enabled: AtomicBool,
    default_exposure_secs: AtomicU64,
}

impl EncryptionPolicy {
    pub fn new(encryption_enabled: bool, default_exposure: ExposureDuration) -> Self {
        Self {
            encryption_enabled: AtomicBool::new(encryption_enabled),
            default_exposure_secs: AtomicU64::new(default_exposure.secs()),
        }
    }

    /// Out-of-range durations on disk fall back to the default.
    pub fn from_settings(settings: &Settings) -> Self {
        let exposure = ExposureDuration::new(settings.exposure.default_duration_secs)
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "invalid default exposure in settings, using default");
                ExposureDuration::default()
            });
        Self::new(settings.security.encryption_enabled, exposure)
    }

    pub fn encryption_enabled(&self) -> bool {
        self.encryption_enabled.load(Ordering::Acquire)
    }

    pub fn set_encryption_enabled(&self, enabled: bool) {
        self.encryption_enabled.store(enabled, Ordering::Release);
    }

    pub fn default_exposure(&self) -> ExposureDuration {
        ExposureDuration(self.default_exposure_secs.load(Ordering::Acquire))
    }

    pub fn set_default_exposure(&self, duration: ExposureDuration) {
        self.default_exposure_secs
            .store(duration.secs(), Ordering::Release);
    }
}

impl Default for EncryptionPolicy {
    fn default() -> Self {
        Self::new(false, ExposureDuration::default())
    }
}
