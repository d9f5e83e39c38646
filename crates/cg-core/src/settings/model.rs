use serde::{Deserialize, Serialize};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Whether adapters should surface engine events to the user.
    pub show_notifications: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SecuritySettings {
    /// Auto-encrypt user-copied plaintext.
    pub encryption_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExposureSettings {
    /// Default plaintext window for reveal, in seconds. Expected in [5, 300];
    /// out-of-range values on disk fall back to the default when applied.
    pub default_duration_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub general: GeneralSettings,

    #[serde(default)]
    pub security: SecuritySettings,

    #[serde(default)]
    pub exposure: ExposureSettings,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "schema_version": 1 }"#).unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_keeps_known_values() {
        let json = r#"{ "security": { "encryption_enabled": true } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert!(settings.security.encryption_enabled);
        assert_eq!(settings.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(settings.exposure.default_duration_secs, 10);
    }
}
