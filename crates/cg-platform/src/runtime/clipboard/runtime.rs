//! A minimal, cross-platform clipboard monitor runtime.
//!
//! This runtime is responsible for lifecycle management (start/stop) of the
//! polling loop that drives a [`ClipboardMonitor`] in a background task.
//!
//! - First tick runs immediately and primes the baseline.
//! - A failed tick is reported to the observer and followed by the error
//!   backoff instead of the poll interval.
//! - `stop` cancels between ticks; an in-flight tick is given
//!   [`STOP_TIMEOUT`] to finish before the task is aborted.

use async_trait::async_trait;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use cg_core::config::MonitorConfig;
use cg_core::ports::{MonitorControlError, MonitorControlPort};

use super::watcher::{ClipboardMonitor, MonitorState};

pub const STOP_TIMEOUT: Duration = Duration::from_secs(2);

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct PollingMonitorRuntime {
    monitor: Arc<ClipboardMonitor>,
    poll_interval: Duration,
    error_backoff: Duration,
    running: AtomicBool,
    task: Mutex<Option<Running>>,
}

impl PollingMonitorRuntime {
    pub fn new(monitor: Arc<ClipboardMonitor>, config: &MonitorConfig) -> Self {
        Self {
            monitor,
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            error_backoff: Duration::from_millis(config.error_backoff_ms),
            running: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    pub fn monitor(&self) -> &Arc<ClipboardMonitor> {
        &self.monitor
    }

    async fn poll_loop(
        monitor: Arc<ClipboardMonitor>,
        cancel: CancellationToken,
        poll_interval: Duration,
        error_backoff: Duration,
    ) {
        loop {
            let delay = match monitor.check_once().await {
                Ok(_) => poll_interval,
                Err(err) => {
                    warn!(error = %err, "clipboard tick failed, backing off");
                    monitor.observer().on_error(&err.to_string());
                    error_backoff
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(delay) => {}
            }
        }
        debug!("clipboard poll loop exited");
    }
}

#[async_trait]
impl MonitorControlPort for PollingMonitorRuntime {
    async fn start(&self) -> Result<(), MonitorControlError> {
        // start and stop serialise on the task slot; `running` mirrors it
        let mut task = self.task.lock().await;
        if task.is_some() {
            return Ok(());
        }

        self.monitor.reset_baseline();
        self.monitor.set_state(MonitorState::Polling);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(Self::poll_loop(
            self.monitor.clone(),
            cancel.clone(),
            self.poll_interval,
            self.error_backoff,
        ));

        *task = Some(Running { cancel, handle });
        self.running.store(true, Ordering::Release);

        info!(
            interval_ms = self.poll_interval.as_millis() as u64,
            "clipboard monitor started"
        );
        Ok(())
    }

    async fn stop(&self) -> Result<(), MonitorControlError> {
        let mut task = self.task.lock().await;
        let Some(Running { cancel, mut handle }) = task.take() else {
            return Ok(());
        };
        self.running.store(false, Ordering::Release);

        cancel.cancel();
        match tokio::time::timeout(STOP_TIMEOUT, &mut handle).await {
            Ok(Ok(())) => {}
            Ok(Err(join_err)) if join_err.is_panic() => {
                warn!(error = %join_err, "clipboard poll loop panicked");
            }
            Ok(Err(_)) => {}
            Err(_) => {
                warn!("in-flight clipboard tick did not finish in time, aborting");
                handle.abort();
            }
        }

        self.monitor.set_state(MonitorState::Idle);
        info!("clipboard monitor stopped");
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
