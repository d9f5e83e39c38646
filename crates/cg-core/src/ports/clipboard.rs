//! Clipboard port - abstracts OS clipboard text access
//!
//! Only plain text is in scope. An empty clipboard (or one holding a
//! non-text format) reads as the empty string.

use super::errors::ClipboardIoError;

/// Synchronous text clipboard.
///
/// Implementations must be cheap to call from the poll loop; no timeouts are
/// applied to individual calls.
pub trait ClipboardPort: Send + Sync {
    /// Read current clipboard text. Returns `""` when nothing textual is present.
    fn read_text(&self) -> Result<String, ClipboardIoError>;

    /// Replace clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), ClipboardIoError>;
}

#[cfg(test)]
mockall::mock! {
    pub Clipboard {}

    impl ClipboardPort for Clipboard {
        fn read_text(&self) -> Result<String, ClipboardIoError>;
        fn write_text(&self, text: &str) -> Result<(), ClipboardIoError>;
    }
}
