//! # Dependency Injection
//!
//! The only place that depends on cg-infra, cg-platform and cg-app at once.
//! It assembles concrete adapters behind their ports and hands the result
//! to [`AppContext`]; it makes no product decisions.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use cg_app::{AppContext, AppDeps};
use cg_core::clipboard::{GuardedClipboard, RecursionGuard};
use cg_core::config::AppConfig;
use cg_core::policy::EncryptionPolicy;
use cg_core::ports::{ClipboardPort, ClockPort, SettingsPort};
use cg_core::settings::model::Settings;
use cg_infra::{CryptoEngine, FileKeyFileStore, FileSettingsRepository, InMemorySession, SystemClock};
use cg_platform::{
    ChannelObserver, ClipboardMonitor, InMemoryClipboard, MonitorEvent, PollingMonitorRuntime,
    SystemClipboard,
};

use super::paths::AppPaths;

pub struct WiredApp {
    pub ctx: AppContext,
    pub events: UnboundedReceiver<MonitorEvent>,
    /// Settings as loaded at startup.
    pub settings: Settings,
}

/// Wire against the OS clipboard. Without one (no display server, CI) the
/// engine runs on a process-local clipboard and says so.
pub async fn wire_system_app(paths: &AppPaths, config: &AppConfig) -> anyhow::Result<WiredApp> {
    let clipboard: Arc<dyn ClipboardPort> = match SystemClipboard::new() {
        Ok(clipboard) => Arc::new(clipboard),
        Err(err) => {
            warn!(error = %err, "system clipboard unavailable, using an in-memory clipboard");
            Arc::new(InMemoryClipboard::new(""))
        }
    };
    wire_app(paths, config, clipboard).await
}

pub async fn wire_app(
    paths: &AppPaths,
    config: &AppConfig,
    clipboard: Arc<dyn ClipboardPort>,
) -> anyhow::Result<WiredApp> {
    // Infra
    let settings_repo = Arc::new(FileSettingsRepository::new(&paths.settings_path));
    let settings = settings_repo
        .load()
        .await
        .context("failed to load settings")?;
    let key_file = Arc::new(FileKeyFileStore::new(paths.key_file_dir()));
    let session = Arc::new(InMemorySession::new());
    let crypto = Arc::new(CryptoEngine::new(session.clone()));
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    // Clipboard + guard, shared by the monitor and the exposure scheduler
    let guard = Arc::new(RecursionGuard::new(clock.clone()));
    let guarded = Arc::new(GuardedClipboard::new(clipboard, guard));
    let (observer, events) = ChannelObserver::new();
    let observer = Arc::new(observer);
    let policy = Arc::new(EncryptionPolicy::from_settings(&settings));

    // Platform
    let monitor = Arc::new(ClipboardMonitor::new(
        guarded.clone(),
        crypto.clone(),
        policy.clone(),
        observer.clone(),
        clock.clone(),
    ));
    let runtime = Arc::new(PollingMonitorRuntime::new(monitor, &config.monitor));

    let deps = AppDeps {
        clipboard: guarded,
        monitor: runtime,
        observer,
        crypto: crypto.clone(),
        kdf: crypto,
        session,
        key_file,
        settings: settings_repo,
        clock,
    };

    info!(
        root = %paths.root.display(),
        poll_interval_ms = config.monitor.poll_interval_ms,
        encryption_enabled = policy.encryption_enabled(),
        "dependencies wired"
    );

    Ok(WiredApp {
        ctx: AppContext::new(deps, policy),
        events,
        settings,
    })
}
