use std::sync::Arc;

use tokio::sync::Mutex;

use super::guard::{GuardError, RecursionGuard};
use crate::ports::{ClipboardIoError, ClipboardPort};

#[derive(Debug, thiserror::Error)]
pub enum GuardedWriteError {
    #[error(transparent)]
    Busy(#[from] GuardError),

    #[error(transparent)]
    Io(#[from] ClipboardIoError),
}

/// Clipboard handle that routes every engine write through the
/// [`RecursionGuard`].
///
/// Writers from the monitor and the exposure scheduler are serialized, so at
/// most one guarded write is ever in progress.
pub struct GuardedClipboard {
    clipboard: Arc<dyn ClipboardPort>,
    guard: Arc<RecursionGuard>,
    write_lock: Mutex<()>,
}

impl GuardedClipboard {
    pub fn new(clipboard: Arc<dyn ClipboardPort>, guard: Arc<RecursionGuard>) -> Self {
        Self {
            clipboard,
            guard,
            write_lock: Mutex::new(()),
        }
    }

    pub fn guard(&self) -> &Arc<RecursionGuard> {
        &self.guard
    }

    pub fn read_text(&self) -> Result<String, ClipboardIoError> {
        self.clipboard.read_text()
    }

    /// begin_write -> OS write -> end_write. `end_write` runs even when the OS
    /// write fails so the guard is never left mid-write by us.
    pub async fn write_text(&self, text: &str) -> Result<(), GuardedWriteError> {
        let _permit = self.write_lock.lock().await;

        self.guard.begin_write(text)?;
        let result = self.clipboard.write_text(text);
        self.guard.end_write();

        result.map_err(GuardedWriteError::from)
    }
}
