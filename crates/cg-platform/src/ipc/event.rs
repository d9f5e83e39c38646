/// Engine notifications forwarded out of the monitor task.
///
/// Carries lengths only; clipboard contents never leave the engine through
/// this channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    ClipboardChanged { old_len: usize, new_len: usize },
    EncryptionPerformed { plaintext_len: usize },
    DecryptionPerformed { plaintext_len: usize },
    EnvelopeObserved { envelope_len: usize },
    Error { message: String },
}
