pub mod adapters;
pub mod clipboard;
pub mod ipc;
pub mod runtime;

pub use adapters::ChannelObserver;
pub use clipboard::{InMemoryClipboard, SystemClipboard};
pub use ipc::MonitorEvent;
pub use runtime::clipboard::{ClipboardMonitor, MonitorError, MonitorState, PollingMonitorRuntime};
