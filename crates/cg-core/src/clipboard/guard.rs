//! Anti-recursion guard for clipboard writes.
//!
//! The engine both reads and writes the OS clipboard, and the only way it
//! learns about changes is by polling. Every write the engine performs would
//! therefore be observed on a later tick as a "change". The guard remembers
//! what the engine itself wrote so the monitor can tell its own echoes apart
//! from user copies.
//!
//! ```text
//!            begin_write(c)                end_write()
//!   Idle ───────────────────▶ WritePending ───────────▶ Idle
//!    │                          │    ▲                  (or IgnoreNext if
//!    │ mark_ignore_next()       │    │ stale (>5s):      marked meanwhile)
//!    ▼                          │    │ begin_write may
//!   IgnoreNext ─ consumed by ───┘    │ replace it
//!                one observation
//! ```
//!
//! Coordination is advisory: the clipboard offers no compare-and-swap, so a
//! user copy landing inside the same poll interval as a guarded write can be
//! misclassified.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::ports::ClockPort;

/// A write that began longer ago than this is considered abandoned and no
/// longer blocks processing.
pub const STALE_WRITE_GRACE_MS: i64 = 5_000;

/// How the guard classifies an observed clipboard change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The ignore-next flag was set; it has now been consumed.
    IgnoredOnce,
    /// A guarded write is in progress.
    InFlightWrite,
    /// Matches the content of our last write, inside the grace period.
    OwnEcho,
    /// Nothing the guard knows about: treat as user-originated.
    External,
}

impl Observation {
    pub fn is_external(self) -> bool {
        matches!(self, Observation::External)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("another clipboard write is still in progress")]
    WriteInProgress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GuardState {
    Idle,
    WritePending {
        content: String,
        started_at_ms: i64,
        /// `mark_ignore_next` arrived while the write was pending.
        ignore_after: bool,
    },
    IgnoreNext,
}

#[derive(Debug, Clone)]
struct WriteRecord {
    content: String,
    started_at_ms: i64,
}

#[derive(Debug)]
struct Inner {
    state: GuardState,
    last_write: Option<WriteRecord>,
}

/// Shared by reference between the monitor and the exposure scheduler.
pub struct RecursionGuard {
    inner: Mutex<Inner>,
    clock: Arc<dyn ClockPort>,
}

impl RecursionGuard {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: GuardState::Idle,
                last_write: None,
            }),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The state is always left consistent between statements, so a
        // poisoned lock is still usable.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_stale(&self, started_at_ms: i64, now_ms: i64) -> bool {
        now_ms.saturating_sub(started_at_ms) > STALE_WRITE_GRACE_MS
    }

    /// Call immediately before the OS write.
    ///
    /// Fails when a non-stale write is still pending. A stale pending write is
    /// replaced.
    pub fn begin_write(&self, content: &str) -> Result<(), GuardError> {
        let now = self.clock.now_ms();
        let mut inner = self.lock();

        let ignore_after = match &inner.state {
            GuardState::WritePending { started_at_ms, .. }
                if !self.is_stale(*started_at_ms, now) =>
            {
                return Err(GuardError::WriteInProgress);
            }
            GuardState::WritePending {
                started_at_ms,
                ignore_after,
                ..
            } => {
                warn!(
                    age_ms = now.saturating_sub(*started_at_ms),
                    "replacing stale pending clipboard write"
                );
                *ignore_after
            }
            GuardState::IgnoreNext => true,
            GuardState::Idle => false,
        };

        inner.state = GuardState::WritePending {
            content: content.to_string(),
            started_at_ms: now,
            ignore_after,
        };
        inner.last_write = Some(WriteRecord {
            content: content.to_string(),
            started_at_ms: now,
        });

        debug!(len = content.len(), "guarded write started");
        Ok(())
    }

    /// Call immediately after the OS write, whether it succeeded or not.
    pub fn end_write(&self) {
        let mut inner = self.lock();
        let next = match &inner.state {
            GuardState::WritePending {
                ignore_after: true, ..
            } => GuardState::IgnoreNext,
            GuardState::WritePending { .. } => GuardState::Idle,
            other => {
                debug!("end_write without a pending write");
                other.clone()
            }
        };
        inner.state = next;
    }

    /// Skip exactly one subsequent observed change.
    pub fn mark_ignore_next(&self) {
        let mut inner = self.lock();
        match &mut inner.state {
            GuardState::WritePending { ignore_after, .. } => *ignore_after = true,
            state => *state = GuardState::IgnoreNext,
        }
    }

    /// True while a guarded write is pending and has not gone stale.
    pub fn is_mid_write(&self) -> bool {
        let now = self.clock.now_ms();
        let inner = self.lock();
        matches!(
            &inner.state,
            GuardState::WritePending { started_at_ms, .. } if !self.is_stale(*started_at_ms, now)
        )
    }

    pub fn is_ignore_next_set(&self) -> bool {
        matches!(self.lock().state, GuardState::IgnoreNext)
    }

    /// Whether `observed` originates from the guard's own writes.
    ///
    /// Pure query: never consumes the ignore-next flag.
    pub fn should_ignore(&self, observed: &str) -> bool {
        let now = self.clock.now_ms();
        let inner = self.lock();
        self.in_flight(&inner, observed, now) || self.echo(&inner, observed, now)
    }

    /// Classify an observed change, consuming the ignore-next flag if set.
    ///
    /// Checks run in this order: in-flight write, ignore-next, own echo.
    pub fn classify(&self, observed: &str) -> Observation {
        let now = self.clock.now_ms();
        let mut inner = self.lock();

        if self.in_flight(&inner, observed, now) {
            return Observation::InFlightWrite;
        }
        if inner.state == GuardState::IgnoreNext {
            inner.state = GuardState::Idle;
            return Observation::IgnoredOnce;
        }
        if self.echo(&inner, observed, now) {
            return Observation::OwnEcho;
        }
        Observation::External
    }

    fn in_flight(&self, inner: &Inner, observed: &str, now: i64) -> bool {
        match &inner.state {
            GuardState::WritePending {
                content,
                started_at_ms,
                ..
            } => content == observed || !self.is_stale(*started_at_ms, now),
            _ => false,
        }
    }

    fn echo(&self, inner: &Inner, observed: &str, now: i64) -> bool {
        inner
            .last_write
            .as_ref()
            .is_some_and(|w| w.content == observed && !self.is_stale(w.started_at_ms, now))
    }
}
