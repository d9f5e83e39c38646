use tokio::sync::mpsc;
use tracing::trace;

use cg_core::ports::ClipboardObserver;

use crate::ipc::MonitorEvent;

/// Observer that forwards engine events into an in-process channel.
///
/// Sending never blocks the acting task; events are dropped once the
/// receiver is gone.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<MonitorEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MonitorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: MonitorEvent) {
        if self.tx.send(event).is_err() {
            trace!("monitor event receiver dropped");
        }
    }
}

impl ClipboardObserver for ChannelObserver {
    fn on_clipboard_changed(&self, old: &str, new: &str) {
        self.emit(MonitorEvent::ClipboardChanged {
            old_len: old.len(),
            new_len: new.len(),
        });
    }

    fn on_encryption_performed(&self, original_plaintext: &str) {
        self.emit(MonitorEvent::EncryptionPerformed {
            plaintext_len: original_plaintext.len(),
        });
    }

    fn on_decryption_performed(&self, plaintext: &str) {
        self.emit(MonitorEvent::DecryptionPerformed {
            plaintext_len: plaintext.len(),
        });
    }

    fn on_envelope_observed(&self, envelope_len: usize) {
        self.emit(MonitorEvent::EnvelopeObserved { envelope_len });
    }

    fn on_error(&self, message: &str) {
        self.emit(MonitorEvent::Error {
            message: message.to_string(),
        });
    }
}
