//! Process bootstrap: paths, configuration, tracing and dependency wiring.
//!
//! Nothing here makes product decisions; it only assembles the pieces the
//! commands drive.

pub mod config;
pub mod observer;
pub mod paths;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_default};
pub use paths::AppPaths;
pub use wiring::{wire_app, wire_system_app, WiredApp};
