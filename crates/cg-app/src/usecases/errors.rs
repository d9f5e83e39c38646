use cg_core::clipboard::GuardedWriteError;
use cg_core::policy::InvalidDurationError;
use cg_core::ports::ClipboardIoError;
use cg_core::security::model::EncryptionError;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },

    #[error("no password has been set")]
    NotConfigured,

    #[error("wrong password")]
    WrongPassword,

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error("key file storage failed: {0}")]
    Storage(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ManualOperationError {
    #[error("clipboard is empty")]
    EmptyClipboard,

    #[error("clipboard content is already encrypted")]
    AlreadyEncrypted,

    #[error("clipboard content is not an encrypted envelope")]
    NotEncrypted,

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardIoError),

    #[error("clipboard write failed: {0}")]
    Write(#[from] GuardedWriteError),
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsUpdateError {
    #[error("no session: set or unlock a password first")]
    NoSession,

    #[error(transparent)]
    InvalidDuration(#[from] InvalidDurationError),

    #[error("settings storage failed: {0}")]
    Storage(String),
}
