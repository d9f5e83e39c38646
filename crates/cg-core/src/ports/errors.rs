use thiserror::Error;

/// Failure talking to the OS clipboard.
///
/// Never fatal to the monitor loop: reported to observers, then retried after
/// the error backoff.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardIoError {
    #[error("clipboard read failed: {0}")]
    Read(String),

    #[error("clipboard write failed: {0}")]
    Write(String),

    #[error("clipboard unavailable")]
    Unavailable,
}
