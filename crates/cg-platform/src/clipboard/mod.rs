mod in_memory;
mod system;

pub use in_memory::InMemoryClipboard;
pub use system::SystemClipboard;
