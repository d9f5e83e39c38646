//! Observer contract for clipboard engine events.
//!
//! Every method is fired at most once per event, synchronously from the task
//! that performed the action. Implementations must not block.

/// Receives engine notifications. All methods default to no-ops so adapters
/// only implement what they display.
pub trait ClipboardObserver: Send + Sync {
    /// A user-originated clipboard change was detected.
    fn on_clipboard_changed(&self, _old: &str, _new: &str) {}

    /// Plaintext was replaced by its envelope.
    fn on_encryption_performed(&self, _original_plaintext: &str) {}

    /// An envelope was decrypted and the plaintext handed out.
    fn on_decryption_performed(&self, _plaintext: &str) {}

    /// The monitor observed an envelope on the clipboard and left it alone.
    fn on_envelope_observed(&self, _envelope_len: usize) {}

    fn on_error(&self, _message: &str) {}
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ClipboardObserver for NoopObserver {}
