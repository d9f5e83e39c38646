use std::path::{Path, PathBuf};

use anyhow::Context;

const APP_DIR_NAME: &str = "clipguard";

/// Every on-disk location the binary touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub settings_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    /// `override_root` wins; otherwise `<platform config dir>/clipguard`.
    pub fn resolve(override_root: Option<PathBuf>) -> anyhow::Result<Self> {
        let root = match override_root {
            Some(root) => root,
            None => dirs::config_dir()
                .context("could not determine the user config directory")?
                .join(APP_DIR_NAME),
        };
        Ok(Self::from_root(root))
    }

    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            config_path: root.join("config.toml"),
            settings_path: root.join("settings.json"),
            logs_dir: root.join("logs"),
            root,
        }
    }

    /// The key file lives directly under the root as `key.json`.
    pub fn key_file_dir(&self) -> &Path {
        &self.root
    }

    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.logs_dir)
            .with_context(|| format!("failed to create {}", self.logs_dir.display()))
    }
}
