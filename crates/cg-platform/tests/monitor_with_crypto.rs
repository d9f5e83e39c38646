use std::sync::Arc;
use std::time::Duration;

use cg_core::clipboard::{GuardedClipboard, RecursionGuard};
use cg_core::config::MonitorConfig;
use cg_core::policy::EncryptionPolicy;
use cg_core::ports::{EnvelopeCryptoPort, KeyDerivationPort, MonitorControlPort, SessionPort};
use cg_core::security::model::{Passphrase, Session};
use cg_infra::{CryptoEngine, InMemorySession, SystemClock};
use cg_platform::{ChannelObserver, ClipboardMonitor, InMemoryClipboard, MonitorEvent, PollingMonitorRuntime};

async fn unlocked_engine() -> Arc<CryptoEngine> {
    let session = Arc::new(InMemorySession::new());
    let engine = CryptoEngine::new(session.clone()).with_kdf_iterations(1_000);
    let pass = Passphrase("integration-pw".into());
    let (key, salt) = engine.derive_key(&pass, None).unwrap();
    let hash = engine.key_hash(&pass, &salt);
    session.install(Session::new(salt, key, hash)).await.unwrap();
    Arc::new(engine)
}

#[tokio::test]
async fn real_engine_encrypts_each_copy_once() {
    let engine = unlocked_engine().await;
    let clipboard = Arc::new(InMemoryClipboard::new(""));
    let guard = Arc::new(RecursionGuard::new(Arc::new(SystemClock)));
    let guarded = Arc::new(GuardedClipboard::new(clipboard.clone(), guard));
    let policy = Arc::new(EncryptionPolicy::default());
    policy.set_encryption_enabled(true);
    let (observer, mut events) = ChannelObserver::new();

    let monitor = Arc::new(ClipboardMonitor::new(
        guarded,
        engine.clone(),
        policy,
        Arc::new(observer),
        Arc::new(SystemClock),
    ));
    let runtime = PollingMonitorRuntime::new(
        monitor,
        &MonitorConfig {
            poll_interval_ms: 20,
            error_backoff_ms: 50,
        },
    );

    runtime.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    clipboard.user_copy("hello");
    tokio::time::sleep(Duration::from_millis(200)).await;
    runtime.stop().await.unwrap();

    let writes = clipboard.writes();
    assert_eq!(writes.len(), 1, "envelope must not be re-encrypted");
    assert!(engine.is_encrypted_text(&writes[0]).await);
    assert_eq!(engine.decrypt(&clipboard.content()).await.unwrap(), "hello");

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(seen.contains(&MonitorEvent::EncryptionPerformed { plaintext_len: 5 }));
}
