//! Use cases for starting and stopping the clipboard monitor.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use cg_core::ports::{MonitorControlError, MonitorControlPort};

/// Starts polling. Idempotent; the first tick only primes the baseline, so
/// content already on the clipboard is never auto-encrypted.
pub struct StartClipboardMonitor {
    monitor: Arc<dyn MonitorControlPort>,
}

impl StartClipboardMonitor {
    pub fn new(monitor: Arc<dyn MonitorControlPort>) -> Self {
        Self { monitor }
    }

    pub async fn execute(&self) -> Result<(), MonitorControlError> {
        let span = info_span!("usecase.start_clipboard_monitor.execute");

        async {
            info!("requesting clipboard monitor start");
            self.monitor.start().await
        }
        .instrument(span)
        .await
    }
}

/// Stops polling. Idempotent; pending exposure jobs keep running.
pub struct StopClipboardMonitor {
    monitor: Arc<dyn MonitorControlPort>,
}

impl StopClipboardMonitor {
    pub fn new(monitor: Arc<dyn MonitorControlPort>) -> Self {
        Self { monitor }
    }

    pub async fn execute(&self) -> Result<(), MonitorControlError> {
        let span = info_span!("usecase.stop_clipboard_monitor.execute");

        async {
            info!("requesting clipboard monitor stop");
            self.monitor.stop().await
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeMonitor {
        running: AtomicBool,
        starts: AtomicUsize,
        fail_start: bool,
    }

    #[async_trait::async_trait]
    impl MonitorControlPort for FakeMonitor {
        async fn start(&self) -> Result<(), MonitorControlError> {
            if self.fail_start {
                return Err(MonitorControlError::StartFailed("no clipboard".into()));
            }
            self.starts.fetch_add(1, Ordering::SeqCst);
            self.running.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> Result<(), MonitorControlError> {
            self.running.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn is_running(&self) -> bool {
            self.running.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn start_and_stop_delegate_to_the_port() {
        let monitor = Arc::new(FakeMonitor::default());

        StartClipboardMonitor::new(monitor.clone()).execute().await.unwrap();
        assert!(monitor.is_running());
        assert_eq!(monitor.starts.load(Ordering::SeqCst), 1);

        StopClipboardMonitor::new(monitor.clone()).execute().await.unwrap();
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn start_failure_is_propagated() {
        let monitor = Arc::new(FakeMonitor {
            fail_start: true,
            ..Default::default()
        });

        let err = StartClipboardMonitor::new(monitor.clone())
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, MonitorControlError::StartFailed(_)));
        assert!(!monitor.is_running());
    }
}
