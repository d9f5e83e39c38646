//! Shared wiring for use case tests: real crypto with a cheap KDF, an
//! in-memory clipboard and in-memory stores.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cg_core::clipboard::{GuardedClipboard, RecursionGuard};
use cg_core::config::MonitorConfig;
use cg_core::policy::EncryptionPolicy;
use cg_core::ports::{
    ClipboardObserver, KeyDerivationPort, KeyFilePort, MonitorControlPort, SessionPort,
    SettingsPort,
};
use cg_core::security::model::{KeyFile, Passphrase, Session};
use cg_core::settings::model::Settings;
use cg_infra::{CryptoEngine, InMemorySession, SystemClock};
use cg_platform::{ClipboardMonitor, InMemoryClipboard, PollingMonitorRuntime};

use crate::{AppContext, AppDeps};

pub const TEST_PASSWORD: &str = "hunter22";

#[derive(Default)]
pub struct MemoryKeyFile(pub Mutex<Option<KeyFile>>);

#[async_trait]
impl KeyFilePort for MemoryKeyFile {
    async fn load(&self) -> anyhow::Result<Option<KeyFile>> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn save(&self, key_file: &KeyFile) -> anyhow::Result<()> {
        *self.0.lock().unwrap() = Some(key_file.clone());
        Ok(())
    }

    async fn delete(&self) -> anyhow::Result<()> {
        *self.0.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySettings(pub Mutex<Settings>);

#[async_trait]
impl SettingsPort for MemorySettings {
    async fn load(&self) -> anyhow::Result<Settings> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        *self.0.lock().unwrap() = settings.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub encrypted: Mutex<Vec<String>>,
    pub decrypted: Mutex<Vec<String>>,
}

impl ClipboardObserver for RecordingObserver {
    fn on_encryption_performed(&self, original_plaintext: &str) {
        self.encrypted
            .lock()
            .unwrap()
            .push(original_plaintext.to_string());
    }

    fn on_decryption_performed(&self, plaintext: &str) {
        self.decrypted.lock().unwrap().push(plaintext.to_string());
    }
}

pub struct Harness {
    pub clipboard: Arc<InMemoryClipboard>,
    pub crypto: Arc<CryptoEngine>,
    pub session: Arc<InMemorySession>,
    pub key_file: Arc<MemoryKeyFile>,
    pub settings: Arc<MemorySettings>,
    pub observer: Arc<RecordingObserver>,
    pub ctx: AppContext,
}

impl Harness {
    pub fn new() -> Self {
        let clipboard = Arc::new(InMemoryClipboard::new(""));
        let session = Arc::new(InMemorySession::new());
        let crypto = Arc::new(CryptoEngine::new(session.clone()).with_kdf_iterations(1_000));
        let key_file = Arc::new(MemoryKeyFile::default());
        let settings = Arc::new(MemorySettings::default());
        let observer = Arc::new(RecordingObserver::default());
        let clock = Arc::new(SystemClock);

        let guard = Arc::new(RecursionGuard::new(clock.clone()));
        let guarded = Arc::new(GuardedClipboard::new(clipboard.clone(), guard));
        let policy = Arc::new(EncryptionPolicy::default());

        let monitor = Arc::new(ClipboardMonitor::new(
            guarded.clone(),
            crypto.clone(),
            policy.clone(),
            observer.clone(),
            clock.clone(),
        ));
        let runtime = Arc::new(PollingMonitorRuntime::new(
            monitor,
            &MonitorConfig::default(),
        ));

        let deps = AppDeps {
            clipboard: guarded,
            monitor: runtime as Arc<dyn MonitorControlPort>,
            observer: observer.clone(),
            crypto: crypto.clone(),
            kdf: crypto.clone(),
            session: session.clone(),
            key_file: key_file.clone(),
            settings: settings.clone(),
            clock,
        };

        Self {
            clipboard,
            crypto,
            session,
            key_file,
            settings,
            observer,
            ctx: AppContext::new(deps, policy),
        }
    }

    /// Install a session for [`TEST_PASSWORD`] and persist its key file.
    pub async fn unlocked() -> Self {
        let h = Self::new();
        let pass = Passphrase(TEST_PASSWORD.into());
        let (key, salt) = h.crypto.derive_key(&pass, None).unwrap();
        let hash = h.crypto.key_hash(&pass, &salt);
        h.key_file
            .save(&KeyFile::new(&salt, hash.clone()))
            .await
            .unwrap();
        h.session
            .install(Session::new(salt, key, hash))
            .await
            .unwrap();
        h
    }
}
