mod event;

pub use event::MonitorEvent;
