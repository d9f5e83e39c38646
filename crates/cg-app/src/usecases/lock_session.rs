//! Use case for dropping the session key from memory.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use cg_core::ports::SessionPort;
use cg_core::security::model::EncryptionError;

/// Clears the session. Afterwards encrypt/decrypt fail with `NoSession` and
/// the monitor stops recognising envelopes until the next unlock.
///
/// A pending exposure job is not touched: it restores its stored envelope
/// text and needs no key.
pub struct LockSession {
    session: Arc<dyn SessionPort>,
}

impl LockSession {
    pub fn new(session: Arc<dyn SessionPort>) -> Self {
        Self { session }
    }

    pub async fn execute(&self) -> Result<(), EncryptionError> {
        let span = info_span!("usecase.lock_session.execute");

        async {
            self.session.clear().await?;
            info!("session locked");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
