pub mod get_status;
pub mod lock_session;
pub mod manual_decrypt;
pub mod manual_encrypt;
pub mod monitor_lifecycle;
pub mod peek_clipboard;
pub mod reveal_clipboard;
pub mod set_default_exposure;
pub mod set_password;
pub mod toggle_encryption;
pub mod unlock_session;

mod errors;

pub use errors::{ManualOperationError, PasswordError, SettingsUpdateError};
pub use get_status::{AppStatus, ClipboardInfo, GetStatus};
pub use lock_session::LockSession;
pub use manual_decrypt::ManualDecrypt;
pub use manual_encrypt::ManualEncrypt;
pub use monitor_lifecycle::{StartClipboardMonitor, StopClipboardMonitor};
pub use peek_clipboard::PeekClipboard;
pub use reveal_clipboard::RevealClipboard;
pub use set_default_exposure::SetDefaultExposure;
pub use set_password::{SetPassword, MIN_PASSWORD_CHARS};
pub use toggle_encryption::ToggleEncryption;
pub use unlock_session::UnlockSession;

#[cfg(test)]
pub(crate) mod test_support;
