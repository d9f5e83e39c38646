mod crypto;
mod session;

pub use crypto::{CryptoEngine, KDF_ITERATIONS};
pub use session::InMemorySession;
