/// Last clipboard text seen by the monitor.
///
/// Only kept as "previous" for diffing; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    pub content: String,
    pub observed_at_ms: i64,
}

impl ClipboardSnapshot {
    pub fn new(content: impl Into<String>, observed_at_ms: i64) -> Self {
        Self {
            content: content.into(),
            observed_at_ms,
        }
    }

    pub fn differs_from(&self, content: &str) -> bool {
        self.content != content
    }
}
