mod guard;
mod guarded;
mod snapshot;

pub use guard::{GuardError, Observation, RecursionGuard, STALE_WRITE_GRACE_MS};
pub use guarded::{GuardedClipboard, GuardedWriteError};
pub use snapshot::ClipboardSnapshot;
