use super::model::*;
use crate::policy::DEFAULT_EXPOSURE_SECS;

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            show_notifications: true,
        }
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            encryption_enabled: false,
        }
    }
}

impl Default for ExposureSettings {
    fn default() -> Self {
        Self {
            default_duration_secs: DEFAULT_EXPOSURE_SECS,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            general: GeneralSettings::default(),
            security: SecuritySettings::default(),
            exposure: ExposureSettings::default(),
        }
    }
}
