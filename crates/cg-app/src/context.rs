//! Application context.
//!
//! Owns the dependencies, the live [`EncryptionPolicy`] and the exposure
//! scheduler for the lifetime of the engine. Components receive what they
//! need from here at construction time; nothing is reached through globals.

use std::sync::Arc;

use cg_core::policy::EncryptionPolicy;

use crate::deps::AppDeps;
use crate::exposure::TemporaryExposureScheduler;
use crate::usecases::*;

pub struct AppContext {
    deps: AppDeps,
    policy: Arc<EncryptionPolicy>,
    exposure: Arc<TemporaryExposureScheduler>,
}

impl AppContext {
    /// `policy` must be the same instance the clipboard monitor was built
    /// with, so toggles reach the poll loop.
    pub fn new(deps: AppDeps, policy: Arc<EncryptionPolicy>) -> Self {
        let exposure = Arc::new(TemporaryExposureScheduler::new(
            deps.clipboard.clone(),
            deps.crypto.clone(),
            deps.observer.clone(),
            deps.clock.clone(),
        ));

        Self {
            deps,
            policy,
            exposure,
        }
    }

    pub fn usecases(&self) -> UseCases<'_> {
        UseCases::new(self)
    }

    pub fn deps(&self) -> &AppDeps {
        &self.deps
    }

    pub fn policy(&self) -> &Arc<EncryptionPolicy> {
        &self.policy
    }

    pub fn exposure(&self) -> &Arc<TemporaryExposureScheduler> {
        &self.exposure
    }
}

/// Use case accessor.
///
/// Each method builds a use case wired with this context's ports. Use cases
/// are cheap to build; callers create one per invocation.
///
/// ```ignore
/// let status = ctx.usecases().get_status().execute().await?;
/// ```
pub struct UseCases<'a> {
    ctx: &'a AppContext,
}

impl<'a> UseCases<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    pub fn set_password(&self) -> SetPassword {
        let deps = &self.ctx.deps;
        SetPassword::new(deps.kdf.clone(), deps.session.clone(), deps.key_file.clone())
    }

    pub fn unlock_session(&self) -> UnlockSession {
        let deps = &self.ctx.deps;
        UnlockSession::new(deps.kdf.clone(), deps.session.clone(), deps.key_file.clone())
    }

    pub fn lock_session(&self) -> LockSession {
        LockSession::new(self.ctx.deps.session.clone())
    }

    pub fn toggle_encryption(&self) -> ToggleEncryption {
        let deps = &self.ctx.deps;
        ToggleEncryption::new(
            deps.session.clone(),
            deps.settings.clone(),
            self.ctx.policy.clone(),
        )
    }

    pub fn set_default_exposure(&self) -> SetDefaultExposure {
        SetDefaultExposure::new(self.ctx.deps.settings.clone(), self.ctx.policy.clone())
    }

    pub fn manual_encrypt(&self) -> ManualEncrypt {
        let deps = &self.ctx.deps;
        ManualEncrypt::new(
            deps.clipboard.clone(),
            deps.crypto.clone(),
            deps.observer.clone(),
        )
    }

    pub fn manual_decrypt(&self) -> ManualDecrypt {
        let deps = &self.ctx.deps;
        ManualDecrypt::new(
            deps.clipboard.clone(),
            deps.crypto.clone(),
            deps.observer.clone(),
        )
    }

    pub fn reveal_clipboard(&self) -> RevealClipboard {
        RevealClipboard::new(
            self.ctx.deps.clipboard.clone(),
            self.ctx.exposure.clone(),
            self.ctx.policy.clone(),
        )
    }

    pub fn peek_clipboard(&self) -> PeekClipboard {
        PeekClipboard::new(
            self.ctx.deps.clipboard.clone(),
            self.ctx.deps.crypto.clone(),
            self.ctx.exposure.clone(),
        )
    }

    pub fn get_status(&self) -> GetStatus {
        let deps = &self.ctx.deps;
        GetStatus::new(
            deps.clipboard.clone(),
            deps.crypto.clone(),
            deps.session.clone(),
            deps.key_file.clone(),
            deps.monitor.clone(),
            self.ctx.policy.clone(),
            self.ctx.exposure.clone(),
        )
    }

    pub fn start_clipboard_monitor(&self) -> StartClipboardMonitor {
        StartClipboardMonitor::new(self.ctx.deps.monitor.clone())
    }

    pub fn stop_clipboard_monitor(&self) -> StopClipboardMonitor {
        StopClipboardMonitor::new(self.ctx.deps.monitor.clone())
    }
}
