//! # Pure Data Module - Data Transfer Objects Only
//!
//! Maps the optional `config.toml` onto [`AppConfig`]. Missing keys take the
//! production defaults; no validation happens here.

/// Poll interval used in production.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Pause after a clipboard read/write failure before the next tick.
pub const DEFAULT_ERROR_BACKOFF_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll_interval_ms: u64,
    pub error_backoff_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            error_backoff_ms: DEFAULT_ERROR_BACKOFF_MS,
        }
    }
}

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let monitor = toml_value.get("monitor");
        let read_u64 = |key: &str, fallback: u64| {
            monitor
                .and_then(|m| m.get(key))
                .and_then(|v| v.as_integer())
                .and_then(|v| u64::try_from(v).ok())
                .unwrap_or(fallback)
        };

        Ok(Self {
            monitor: MonitorConfig {
                poll_interval_ms: read_u64("poll_interval_ms", DEFAULT_POLL_INTERVAL_MS),
                error_backoff_ms: read_u64("error_backoff_ms", DEFAULT_ERROR_BACKOFF_MS),
            },
        })
    }
}
