//! Clipboard monitor
//!
//! Drives one observation step ("tick") of the clipboard engine. The polling
//! loop lives in [`super::PollingMonitorRuntime`]; this type holds the state
//! that survives between ticks (the previous snapshot, the monitor state) and
//! applies the encryption policy.
//!
//! ```text
//! ClipboardPort ─read─▶ ClipboardMonitor ─classify─▶ RecursionGuard
//!                              │
//!                              ├─ envelope?  ─▶ leave alone, notify
//!                              └─ plaintext  ─▶ encrypt ─▶ GuardedClipboard
//! ```
//!
//! A change is processed only when all of the following hold:
//!
//! 1. the content differs from the previous snapshot
//! 2. the guard is not mid-write
//! 3. the ignore-next flag is not set (if set it is consumed)
//! 4. the content is not an echo of our last write within the grace period
//!
//! The snapshot is updated to the observed content on every tick that reads
//! successfully, processed or not. The monitor never decrypts on its own.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use cg_core::clipboard::{ClipboardSnapshot, GuardedClipboard, GuardedWriteError, Observation};
use cg_core::policy::EncryptionPolicy;
use cg_core::ports::{ClipboardIoError, ClipboardObserver, ClockPort, EnvelopeCryptoPort};
use cg_core::security::model::EncryptionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Polling,
    Processing,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// First read after start; recorded as baseline, not processed.
    Primed,
    Unchanged,
    /// Changed, but the guard attributed it to the engine.
    Skipped(Observation),
    /// User change that needed no write (blank, policy off).
    Observed,
    /// User change that is an envelope; left untouched.
    EnvelopeObserved,
    Encrypted,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error(transparent)]
    Read(#[from] ClipboardIoError),

    #[error("write back failed: {0}")]
    Write(#[from] GuardedWriteError),

    #[error("auto-encryption failed: {0}")]
    Encryption(#[from] EncryptionError),
}

pub struct ClipboardMonitor {
    clipboard: Arc<GuardedClipboard>,
    crypto: Arc<dyn EnvelopeCryptoPort>,
    policy: Arc<EncryptionPolicy>,
    observer: Arc<dyn ClipboardObserver>,
    clock: Arc<dyn ClockPort>,
    snapshot: Mutex<Option<ClipboardSnapshot>>,
    state: Mutex<MonitorState>,
}

impl ClipboardMonitor {
    pub fn new(
        clipboard: Arc<GuardedClipboard>,
        crypto: Arc<dyn EnvelopeCryptoPort>,
        policy: Arc<EncryptionPolicy>,
        observer: Arc<dyn ClipboardObserver>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            clipboard,
            crypto,
            policy,
            observer,
            clock,
            snapshot: Mutex::new(None),
            state: Mutex::new(MonitorState::Idle),
        }
    }

    pub fn observer(&self) -> &Arc<dyn ClipboardObserver> {
        &self.observer
    }

    pub fn state(&self) -> MonitorState {
        *lock(&self.state)
    }

    pub(crate) fn set_state(&self, state: MonitorState) {
        *lock(&self.state) = state;
    }

    pub fn snapshot(&self) -> Option<ClipboardSnapshot> {
        lock(&self.snapshot).clone()
    }

    /// Forget the previous snapshot so the next tick primes a new baseline.
    pub fn reset_baseline(&self) {
        *lock(&self.snapshot) = None;
    }

    /// Check clipboard once.
    pub async fn check_once(&self) -> Result<TickOutcome, MonitorError> {
        let current = self.clipboard.read_text()?;
        let now = self.clock.now_ms();

        let previous = {
            let mut snapshot = lock(&self.snapshot);
            let previous = snapshot.replace(ClipboardSnapshot::new(current.clone(), now));
            match previous {
                Some(previous) => previous,
                None => {
                    debug!(len = current.len(), "clipboard baseline primed");
                    return Ok(TickOutcome::Primed);
                }
            }
        };

        if !previous.differs_from(&current) {
            return Ok(TickOutcome::Unchanged);
        }

        let observation = self.clipboard.guard().classify(&current);
        if !observation.is_external() {
            debug!(?observation, len = current.len(), "skipping guard-originated change");
            return Ok(TickOutcome::Skipped(observation));
        }

        let resume = std::mem::replace(&mut *lock(&self.state), MonitorState::Processing);
        let outcome = self.process(&previous.content, &current).await;
        self.leave_processing(resume);
        outcome
    }

    async fn process(&self, old: &str, new: &str) -> Result<TickOutcome, MonitorError> {
        self.observer.on_clipboard_changed(old, new);

        if new.trim().is_empty() {
            return Ok(TickOutcome::Observed);
        }

        if self.crypto.is_encrypted_text(new).await {
            debug!(len = new.len(), "envelope on clipboard, leaving it alone");
            self.observer.on_envelope_observed(new.len());
            return Ok(TickOutcome::EnvelopeObserved);
        }

        if !self.policy.encryption_enabled() {
            return Ok(TickOutcome::Observed);
        }

        let envelope = self.crypto.encrypt(new).await?;
        self.clipboard.write_text(&envelope).await?;

        info!(
            plaintext_len = new.len(),
            envelope_len = envelope.len(),
            "clipboard auto-encrypted"
        );
        self.observer.on_encryption_performed(new);

        Ok(TickOutcome::Encrypted)
    }

    /// A concurrent `stop` may have moved the state on; only undo our own
    /// transition.
    fn leave_processing(&self, resume: MonitorState) {
        let mut state = lock(&self.state);
        if *state == MonitorState::Processing {
            *state = resume;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("monitor lock poisoned, recovering");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::InMemoryClipboard;
    use async_trait::async_trait;
    use cg_core::clipboard::RecursionGuard;
    use cg_core::ports::ClipboardPort;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    struct ManualClock(AtomicI64);

    impl ClockPort for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Reversible stand-in for the real engine: `ENC[...]`.
    #[derive(Default)]
    struct FakeCrypto {
        encrypts: AtomicUsize,
        no_session: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl EnvelopeCryptoPort for FakeCrypto {
        async fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
            if self.no_session.load(Ordering::SeqCst) {
                return Err(EncryptionError::NoSession);
            }
            self.encrypts.fetch_add(1, Ordering::SeqCst);
            Ok(format!("ENC[{plaintext}]"))
        }

        async fn decrypt(&self, envelope: &str) -> Result<String, EncryptionError> {
            envelope
                .strip_prefix("ENC[")
                .and_then(|s| s.strip_suffix(']'))
                .map(str::to_string)
                .ok_or(EncryptionError::DecryptionFailed)
        }

        async fn is_encrypted_text(&self, text: &str) -> bool {
            self.decrypt(text).await.is_ok()
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ClipboardObserver for RecordingObserver {
        fn on_clipboard_changed(&self, old: &str, new: &str) {
            self.events.lock().unwrap().push(format!("changed:{old}->{new}"));
        }
        fn on_encryption_performed(&self, original_plaintext: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("encrypted:{original_plaintext}"));
        }
        fn on_envelope_observed(&self, envelope_len: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("envelope:{envelope_len}"));
        }
    }

    struct Fixture {
        clipboard: Arc<InMemoryClipboard>,
        crypto: Arc<FakeCrypto>,
        guard: Arc<RecursionGuard>,
        policy: Arc<EncryptionPolicy>,
        observer: Arc<RecordingObserver>,
        monitor: ClipboardMonitor,
    }

    fn fixture(initial: &str, encryption_enabled: bool) -> Fixture {
        let clipboard = Arc::new(InMemoryClipboard::new(initial));
        let clock: Arc<ManualClock> = Arc::new(ManualClock(AtomicI64::new(10_000)));
        let guard = Arc::new(RecursionGuard::new(clock.clone()));
        let guarded = Arc::new(GuardedClipboard::new(clipboard.clone(), guard.clone()));
        let crypto = Arc::new(FakeCrypto::default());
        let policy = Arc::new(EncryptionPolicy::default());
        policy.set_encryption_enabled(encryption_enabled);
        let observer = Arc::new(RecordingObserver::default());

        let monitor = ClipboardMonitor::new(
            guarded,
            crypto.clone(),
            policy.clone(),
            observer.clone(),
            clock,
        );

        Fixture {
            clipboard,
            crypto,
            guard,
            policy,
            observer,
            monitor,
        }
    }

    #[tokio::test]
    async fn first_tick_primes_without_processing() {
        let f = fixture("already there", true);

        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Primed);
        assert_eq!(f.monitor.snapshot().unwrap().content, "already there");
        assert_eq!(f.clipboard.content(), "already there");
        assert!(f.observer.events().is_empty());
    }

    #[tokio::test]
    async fn plaintext_is_encrypted_exactly_once() {
        let f = fixture("", true);
        f.monitor.check_once().await.unwrap();

        f.clipboard.user_copy("hello");
        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Encrypted);
        assert_eq!(f.clipboard.content(), "ENC[hello]");

        // the envelope we just wrote is our own echo
        assert_eq!(
            f.monitor.check_once().await.unwrap(),
            TickOutcome::Skipped(Observation::OwnEcho)
        );
        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Unchanged);

        assert_eq!(f.crypto.encrypts.load(Ordering::SeqCst), 1);
        assert_eq!(f.clipboard.writes(), vec!["ENC[hello]".to_string()]);
        assert_eq!(
            f.observer.events(),
            vec!["changed:->hello".to_string(), "encrypted:hello".to_string()]
        );
        assert_eq!(f.monitor.state(), MonitorState::Idle);
    }

    #[tokio::test]
    async fn user_copied_envelope_is_left_alone() {
        let f = fixture("", true);
        f.monitor.check_once().await.unwrap();

        f.clipboard.user_copy("ENC[secret]");
        assert_eq!(
            f.monitor.check_once().await.unwrap(),
            TickOutcome::EnvelopeObserved
        );

        assert_eq!(f.clipboard.content(), "ENC[secret]");
        assert!(f.clipboard.writes().is_empty());
        assert!(f.observer.events().contains(&"envelope:11".to_string()));
    }

    #[tokio::test]
    async fn disabled_policy_observes_but_does_not_encrypt() {
        let f = fixture("", false);
        f.monitor.check_once().await.unwrap();

        f.clipboard.user_copy("hello");
        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Observed);
        assert_eq!(f.clipboard.content(), "hello");

        f.policy.set_encryption_enabled(true);
        f.clipboard.user_copy("world");
        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Encrypted);
    }

    #[tokio::test]
    async fn blank_content_is_not_encrypted() {
        let f = fixture("x", true);
        f.monitor.check_once().await.unwrap();

        f.clipboard.user_copy("   \n");
        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Observed);
        assert!(f.clipboard.writes().is_empty());
    }

    #[tokio::test]
    async fn ignore_next_skips_one_change_and_resyncs_snapshot() {
        let f = fixture("", true);
        f.monitor.check_once().await.unwrap();

        f.guard.mark_ignore_next();
        f.clipboard.user_copy("first");
        assert_eq!(
            f.monitor.check_once().await.unwrap(),
            TickOutcome::Skipped(Observation::IgnoredOnce)
        );
        assert_eq!(f.monitor.snapshot().unwrap().content, "first");

        f.clipboard.user_copy("second");
        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Encrypted);
    }

    #[tokio::test]
    async fn unchanged_content_does_not_consume_ignore_next() {
        let f = fixture("same", true);
        f.monitor.check_once().await.unwrap();
        f.guard.mark_ignore_next();

        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Unchanged);
        assert!(f.guard.is_ignore_next_set());
    }

    #[tokio::test]
    async fn change_during_foreign_write_is_skipped() {
        let f = fixture("", true);
        f.monitor.check_once().await.unwrap();

        f.guard.begin_write("revealed").unwrap();
        f.clipboard.user_copy("revealed");
        assert_eq!(
            f.monitor.check_once().await.unwrap(),
            TickOutcome::Skipped(Observation::InFlightWrite)
        );
        f.guard.end_write();

        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Unchanged);
        assert_eq!(f.crypto.encrypts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn read_failure_keeps_previous_snapshot() {
        let f = fixture("base", true);
        f.monitor.check_once().await.unwrap();

        f.clipboard.set_fail_reads(true);
        let err = f.monitor.check_once().await.unwrap_err();

        assert!(matches!(err, MonitorError::Read(ClipboardIoError::Read(_))));
        assert_eq!(f.monitor.snapshot().unwrap().content, "base");
    }

    #[tokio::test]
    async fn write_failure_is_reported_and_not_retried() {
        let f = fixture("", true);
        f.monitor.check_once().await.unwrap();

        f.clipboard.user_copy("hello");
        f.clipboard.set_fail_writes(true);
        let err = f.monitor.check_once().await.unwrap_err();
        assert!(matches!(err, MonitorError::Write(GuardedWriteError::Io(_))));
        assert!(!f.guard.is_mid_write());

        f.clipboard.set_fail_writes(false);
        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Unchanged);
    }

    #[tokio::test]
    async fn missing_session_surfaces_as_encryption_error() {
        let f = fixture("", true);
        f.monitor.check_once().await.unwrap();
        f.crypto.no_session.store(true, Ordering::SeqCst);

        f.clipboard.user_copy("hello");
        let err = f.monitor.check_once().await.unwrap_err();

        assert!(matches!(err, MonitorError::Encryption(EncryptionError::NoSession)));
        assert_eq!(f.clipboard.content(), "hello");
    }

    #[tokio::test]
    async fn reset_baseline_reprimes() {
        let f = fixture("a", true);
        f.monitor.check_once().await.unwrap();
        f.monitor.reset_baseline();
        f.clipboard.user_copy("b");

        assert_eq!(f.monitor.check_once().await.unwrap(), TickOutcome::Primed);
        assert_eq!(f.clipboard.read_text().unwrap(), "b");
    }
}
