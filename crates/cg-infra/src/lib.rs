pub mod fs;
pub mod security;
pub mod settings;
pub mod time;

pub use fs::FileKeyFileStore;
pub use security::{CryptoEngine, InMemorySession};
pub use settings::FileSettingsRepository;
pub use time::SystemClock;
