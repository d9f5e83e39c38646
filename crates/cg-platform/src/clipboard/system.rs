use std::sync::Mutex;

use arboard::Clipboard;
use tracing::debug;

use cg_core::ports::{ClipboardIoError, ClipboardPort};

/// OS clipboard, text only.
pub struct SystemClipboard {
    inner: Mutex<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardIoError> {
        let clipboard = Clipboard::new().map_err(|e| {
            debug!(error = %e, "failed to open system clipboard");
            ClipboardIoError::Unavailable
        })?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }

    fn with_clipboard<T>(
        &self,
        f: impl FnOnce(&mut Clipboard) -> Result<T, ClipboardIoError>,
    ) -> Result<T, ClipboardIoError> {
        let mut clipboard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut clipboard)
    }
}

impl ClipboardPort for SystemClipboard {
    fn read_text(&self) -> Result<String, ClipboardIoError> {
        self.with_clipboard(|cb| match cb.get_text() {
            Ok(text) => Ok(text),
            // empty clipboard or a non-text format
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipboardIoError::Read(e.to_string())),
        })
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardIoError> {
        self.with_clipboard(|cb| {
            cb.set_text(text)
                .map_err(|e| ClipboardIoError::Write(e.to_string()))
        })
    }
}
