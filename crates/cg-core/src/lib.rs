//! # cg-core
//!
//! Core domain models and port interfaces for ClipGuard.
//!
//! This crate contains pure domain logic (the recursion guard, exposure
//! policy, key material newtypes) without any OS or file-system dependencies.

pub mod clipboard;
pub mod config;
pub mod policy;
pub mod ports;
pub mod security;
pub mod settings;

// Re-export commonly used types at the crate root
pub use clipboard::{
    ClipboardSnapshot, GuardError, GuardedClipboard, GuardedWriteError, Observation,
    RecursionGuard,
};
pub use config::{AppConfig, MonitorConfig};
pub use policy::{EncryptionPolicy, ExposureDuration, InvalidDurationError};
pub use security::{DerivedKey, EncryptionError, KeyFile, KeyHash, Passphrase, Salt, Session};
pub use settings::Settings;
