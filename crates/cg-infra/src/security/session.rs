use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cg_core::ports::SessionPort;
use cg_core::security::model::{EncryptionError, Session};

/// Process-lifetime session store. The session is swapped whole, never edited.
pub struct InMemorySession {
    session: RwLock<Option<Arc<Session>>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self {
            session: RwLock::new(None),
        }
    }
}

impl Default for InMemorySession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionPort for InMemorySession {
    async fn is_ready(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn current(&self) -> Result<Arc<Session>, EncryptionError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(EncryptionError::NoSession)
    }

    async fn install(&self, session: Session) -> Result<(), EncryptionError> {
        *self.session.write().await = Some(Arc::new(session));
        Ok(())
    }

    async fn clear(&self) -> Result<(), EncryptionError> {
        *self.session.write().await = None;
        Ok(())
    }
}
