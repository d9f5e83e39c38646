//! # Application Dependencies
//!
//! Dependency grouping for [`crate::AppContext`] construction.
//!
//! **Note**: This is NOT a Builder pattern. No build steps, no default values,
//! no hidden logic; just parameter grouping.

use std::sync::Arc;

use cg_core::clipboard::GuardedClipboard;
use cg_core::ports::*;

/// Application dependency grouping (non-Builder, just parameter grouping)
///
/// All dependencies are required.
pub struct AppDeps {
    // Clipboard
    pub clipboard: Arc<GuardedClipboard>,
    pub monitor: Arc<dyn MonitorControlPort>,
    pub observer: Arc<dyn ClipboardObserver>,

    // Security
    pub crypto: Arc<dyn EnvelopeCryptoPort>,
    pub kdf: Arc<dyn KeyDerivationPort>,
    pub session: Arc<dyn SessionPort>,
    pub key_file: Arc<dyn KeyFilePort>,

    // Settings
    pub settings: Arc<dyn SettingsPort>,

    // System
    pub clock: Arc<dyn ClockPort>,
}
