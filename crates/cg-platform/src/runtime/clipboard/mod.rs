mod runtime;
mod watcher;

pub use runtime::PollingMonitorRuntime;
pub use watcher::{ClipboardMonitor, MonitorError, MonitorState, TickOutcome};
