//! Port interfaces for the application layer
//!
//! Ports define the contract between the clipboard engine (monitor, exposure
//! scheduler, use cases) and infrastructure/platform implementations. The
//! engine only ever talks to the OS, the disk and the crypto primitives
//! through these traits.

pub mod clipboard;
mod clock;
pub mod errors;
pub mod key_file;
pub mod monitor_control;
pub mod observer;
pub mod security;
pub mod settings;

pub use clipboard::ClipboardPort;
pub use clock::*;
pub use errors::ClipboardIoError;
pub use key_file::KeyFilePort;
pub use monitor_control::{MonitorControlError, MonitorControlPort};
pub use observer::{ClipboardObserver, NoopObserver};
pub use security::{EnvelopeCryptoPort, KeyDerivationPort, SessionPort};
pub use settings::SettingsPort;
