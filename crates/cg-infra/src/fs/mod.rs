mod atomic;
pub mod key_file_store;

pub(crate) use atomic::atomic_write;
pub use key_file_store::FileKeyFileStore;
