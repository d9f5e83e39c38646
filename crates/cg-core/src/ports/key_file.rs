use async_trait::async_trait;

use crate::security::model::KeyFile;

/// Persistence of the salt + key hash pair.
#[async_trait]
pub trait KeyFilePort: Send + Sync {
    /// `Ok(None)` when no password has been set yet.
    async fn load(&self) -> anyhow::Result<Option<KeyFile>>;
    async fn save(&self, key_file: &KeyFile) -> anyhow::Result<()>;
    async fn delete(&self) -> anyhow::Result<()>;
}
