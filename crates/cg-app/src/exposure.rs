//! Time-boxed plaintext exposure.
//!
//! `reveal_temporarily` writes the decrypted text to the clipboard and arms a
//! deferred job. When the job fires it re-reads the clipboard and restores the
//! original envelope only if the clipboard still holds exactly the plaintext
//! it wrote; anything else means the user moved on and is left alone.
//!
//! At most one job is pending. Arming a new job aborts the previous one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::AbortHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use cg_core::clipboard::{GuardedClipboard, GuardedWriteError};
use cg_core::policy::{ExposureDuration, InvalidDurationError};
use cg_core::ports::{ClipboardIoError, ClipboardObserver, ClockPort, EnvelopeCryptoPort};
use cg_core::security::model::EncryptionError;

#[derive(Debug, thiserror::Error)]
pub enum ExposureError {
    #[error(transparent)]
    InvalidDuration(#[from] InvalidDurationError),

    #[error("clipboard content is not an encrypted envelope")]
    NotEncrypted,

    #[error("clipboard is empty")]
    EmptyClipboard,

    #[error(transparent)]
    Encryption(EncryptionError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardIoError),

    #[error("clipboard write failed: {0}")]
    Write(#[from] GuardedWriteError),
}

/// A scheduled re-encryption.
#[derive(Clone)]
pub struct PendingExposureJob {
    pub id: u64,
    pub expires_at_ms: i64,
    original_envelope: String,
    plaintext_expected: String,
}

impl fmt::Debug for PendingExposureJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingExposureJob")
            .field("id", &self.id)
            .field("expires_at_ms", &self.expires_at_ms)
            .field("envelope_len", &self.original_envelope.len())
            .finish_non_exhaustive()
    }
}

struct ArmedJob {
    job: PendingExposureJob,
    abort: AbortHandle,
}

type JobSlot = Arc<Mutex<Option<ArmedJob>>>;

pub struct TemporaryExposureScheduler {
    clipboard: Arc<GuardedClipboard>,
    crypto: Arc<dyn EnvelopeCryptoPort>,
    observer: Arc<dyn ClipboardObserver>,
    clock: Arc<dyn ClockPort>,
    pending: JobSlot,
    next_id: AtomicU64,
}

impl TemporaryExposureScheduler {
    pub fn new(
        clipboard: Arc<GuardedClipboard>,
        crypto: Arc<dyn EnvelopeCryptoPort>,
        observer: Arc<dyn ClipboardObserver>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            clipboard,
            crypto,
            observer,
            clock,
            pending: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Decrypt `envelope`, put the plaintext on the clipboard and schedule the
    /// envelope to come back after `duration_secs`.
    ///
    /// Rejected before any side effect when the duration is outside
    /// [5, 300] seconds or the input does not decrypt.
    pub async fn reveal_temporarily(
        &self,
        duration_secs: u64,
        envelope: &str,
    ) -> Result<String, ExposureError> {
        let duration = ExposureDuration::new(duration_secs)?;

        let plaintext = match self.crypto.decrypt(envelope).await {
            Ok(plaintext) => plaintext,
            Err(EncryptionError::NoSession) => {
                return Err(ExposureError::Encryption(EncryptionError::NoSession))
            }
            Err(_) => return Err(ExposureError::NotEncrypted),
        };

        self.clipboard.write_text(&plaintext).await?;
        self.observer.on_decryption_performed(&plaintext);

        let job = PendingExposureJob {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            expires_at_ms: self
                .clock
                .now_ms()
                .saturating_add(duration.as_duration().as_millis() as i64),
            original_envelope: envelope.to_string(),
            plaintext_expected: plaintext.clone(),
        };
        self.arm(job, duration);

        Ok(plaintext)
    }

    /// Decrypt without touching the clipboard. Empty on any failure.
    pub async fn peek(&self, envelope: &str) -> String {
        match self.crypto.decrypt(envelope).await {
            Ok(plaintext) => plaintext,
            Err(err) => {
                debug!(error = %err, "peek could not decrypt");
                String::new()
            }
        }
    }

    pub fn pending(&self) -> Option<PendingExposureJob> {
        lock_slot(&self.pending).as_ref().map(|armed| armed.job.clone())
    }

    /// Drop the pending job, leaving whatever is on the clipboard.
    pub fn cancel_pending(&self) -> Option<PendingExposureJob> {
        let armed = lock_slot(&self.pending).take()?;
        armed.abort.abort();
        debug!(job_id = armed.job.id, "exposure job cancelled");
        Some(armed.job)
    }

    /// Close the pending window early, with the same no-clobber check as
    /// the timer. Returns whether the envelope was put back.
    pub async fn revert_now(&self) -> bool {
        let Some(armed) = lock_slot(&self.pending).take() else {
            return false;
        };
        armed.abort.abort();
        debug!(job_id = armed.job.id, "exposure job reverted early");

        restore_if_unchanged(&armed.job, &self.clipboard, self.observer.as_ref()).await
    }

    fn arm(&self, job: PendingExposureJob, duration: ExposureDuration) {
        let mut slot = lock_slot(&self.pending);

        let span = info_span!("exposure.revert", job_id = job.id);
        let task = tokio::spawn(
            revert_after(
                duration,
                job.clone(),
                self.clipboard.clone(),
                self.observer.clone(),
                self.pending.clone(),
            )
            .instrument(span),
        );

        if let Some(previous) = slot.replace(ArmedJob {
            job,
            abort: task.abort_handle(),
        }) {
            previous.abort.abort();
            debug!(job_id = previous.job.id, "exposure job superseded");
        }
    }
}

async fn revert_after(
    duration: ExposureDuration,
    job: PendingExposureJob,
    clipboard: Arc<GuardedClipboard>,
    observer: Arc<dyn ClipboardObserver>,
    pending: JobSlot,
) {
    tokio::time::sleep(duration.as_duration()).await;

    restore_if_unchanged(&job, &clipboard, observer.as_ref()).await;

    let mut slot = lock_slot(&pending);
    if slot.as_ref().is_some_and(|armed| armed.job.id == job.id) {
        *slot = None;
    }
}

/// Put the envelope back iff the clipboard still holds exactly the revealed
/// plaintext. Returns whether it was restored.
async fn restore_if_unchanged(
    job: &PendingExposureJob,
    clipboard: &GuardedClipboard,
    observer: &dyn ClipboardObserver,
) -> bool {
    match clipboard.read_text() {
        Ok(current) if current == job.plaintext_expected => {
            match clipboard.write_text(&job.original_envelope).await {
                Ok(()) => {
                    info!(
                        len = job.plaintext_expected.len(),
                        "plaintext window closed, envelope restored"
                    );
                    observer.on_encryption_performed(&job.plaintext_expected);
                    true
                }
                Err(err) => {
                    warn!(error = %err, "failed to restore envelope");
                    observer.on_error(&format!("re-encryption failed: {err}"));
                    false
                }
            }
        }
        Ok(_) => {
            debug!("clipboard changed during exposure window, leaving it");
            false
        }
        Err(err) => {
            warn!(error = %err, "failed to read clipboard for revert");
            observer.on_error(&format!("re-encryption failed: {err}"));
            false
        }
    }
}

fn lock_slot(slot: &Mutex<Option<ArmedJob>>) -> MutexGuard<'_, Option<ArmedJob>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
