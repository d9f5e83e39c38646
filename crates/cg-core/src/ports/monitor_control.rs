use async_trait::async_trait;

/// Port for controlling the clipboard monitor lifecycle.
///
/// # Behavior
/// - `start()` is idempotent: a second call while running is a no-op.
/// - `stop()` is idempotent and never waits on exposure jobs.
#[async_trait]
pub trait MonitorControlPort: Send + Sync {
    /// Request the monitor to start polling.
    async fn start(&self) -> Result<(), MonitorControlError>;

    /// Request the monitor to stop. In-flight processing completes or times
    /// out before this returns.
    async fn stop(&self) -> Result<(), MonitorControlError>;

    fn is_running(&self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorControlError {
    #[error("Failed to start monitor: {0}")]
    StartFailed(String),

    #[error("Failed to stop monitor: {0}")]
    StopFailed(String),
}
