use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use cg_core::ports::{ClipboardIoError, ClipboardPort};

/// Bound on the recorded write history; older writes are dropped.
pub const WRITE_HISTORY: usize = 64;

/// Process-local clipboard for headless environments and tests.
///
/// Supports failure injection and keeps the last [`WRITE_HISTORY`] writes.
#[derive(Default)]
pub struct InMemoryClipboard {
    content: Mutex<String>,
    writes: Mutex<VecDeque<String>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryClipboard {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(initial.into()),
            ..Default::default()
        }
    }

    /// Simulate a copy by the user (not recorded as a write).
    pub fn user_copy(&self, text: impl Into<String>) {
        *self.lock_content() = text.into();
    }

    pub fn content(&self) -> String {
        self.lock_content().clone()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Recent writes through [`ClipboardPort::write_text`], oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    fn lock_content(&self) -> std::sync::MutexGuard<'_, String> {
        self.content.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl ClipboardPort for InMemoryClipboard {
    fn read_text(&self) -> Result<String, ClipboardIoError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClipboardIoError::Read("injected read failure".into()));
        }
        Ok(self.content())
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardIoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClipboardIoError::Write("injected write failure".into()));
        }
        *self.lock_content() = text.to_string();

        let mut writes = self.writes.lock().unwrap_or_else(|p| p.into_inner());
        if writes.len() == WRITE_HISTORY {
            writes.pop_front();
        }
        writes.push_back(text.to_string());
        Ok(())
    }
}
