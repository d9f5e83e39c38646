use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use cg_core::ports::KeyFilePort;
use cg_core::security::model::KeyFile;

use super::atomic_write;

pub const KEY_FILE_NAME: &str = "key.json";

/// Stores `{ salt, key_hash }` as JSON in the config directory.
pub struct FileKeyFileStore {
    path: PathBuf,
}

impl FileKeyFileStore {
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            path: config_dir.as_ref().join(KEY_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl KeyFilePort for FileKeyFileStore {
    async fn load(&self) -> Result<Option<KeyFile>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read key file failed: {}", self.path.display()))
            }
        };

        let key_file: KeyFile = serde_json::from_str(&content)
            .with_context(|| format!("parse key file failed: {}", self.path.display()))?;

        Ok(Some(key_file))
    }

    async fn save(&self, key_file: &KeyFile) -> Result<()> {
        let json = serde_json::to_string_pretty(key_file).context("serialize key file failed")?;
        atomic_write(&self.path, &json).await
    }

    async fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("delete key file failed: {}", self.path.display())),
        }
    }
}
