use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::warn;

use cg_core::{
    ports::SettingsPort,
    settings::model::{Settings, CURRENT_SCHEMA_VERSION},
};

use crate::fs::atomic_write;

/// JSON-backed settings store.
pub struct FileSettingsRepository {
    path: PathBuf,
}

impl FileSettingsRepository {
    /// Creates a repository that reads and writes the given settings file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsPort for FileSettingsRepository {
    /// Loads settings from disk.
    ///
    /// If the settings file does not exist, returns `Settings::default()`.
    async fn load(&self) -> Result<Settings> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read settings failed: {}", self.path.display()))
            }
        };

        let mut settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("parse settings failed: {}", self.path.display()))?;

        if settings.schema_version != CURRENT_SCHEMA_VERSION {
            warn!(
                found = settings.schema_version,
                expected = CURRENT_SCHEMA_VERSION,
                "unknown settings schema version, reading known fields only"
            );
            settings.schema_version = CURRENT_SCHEMA_VERSION;
        }

        Ok(settings)
    }

    /// Persist settings as pretty-printed JSON, atomically.
    async fn save(&self, settings: &Settings) -> Result<()> {
        let content =
            serde_json::to_string_pretty(settings).context("serialize settings failed")?;

        atomic_write(&self.path, &content).await
    }
}
