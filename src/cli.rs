use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "clipguard",
    version,
    about = "Keeps clipboard text encrypted at rest, with time-boxed plaintext access"
)]
pub struct Cli {
    /// Directory holding settings.json, key.json, config.toml and logs.
    #[arg(long, global = true, env = "CLIPGUARD_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Read the password from this environment variable instead of prompting.
    #[arg(long, global = true, value_name = "VAR")]
    pub password_env: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Unlock (or set a first password), monitor the clipboard and take
    /// commands on stdin until `quit` or Ctrl-C.
    Run,
    /// Set or replace the password. Replacing re-keys old envelopes away.
    SetPassword,
    /// Turn auto-encryption of copied text on or off.
    ToggleEncryption,
    /// Encrypt the current clipboard text.
    Encrypt,
    /// Decrypt the clipboard envelope permanently.
    Decrypt,
    /// Decrypt the clipboard envelope for SECS seconds (5-300), then restore it.
    Reveal {
        /// Defaults to the configured exposure duration.
        secs: Option<u64>,
    },
    /// Print the clipboard plaintext without changing the clipboard.
    Peek,
    /// Show engine and clipboard state.
    Status,
    /// Set the default reveal duration in seconds (5-300).
    SetDefaultDuration { secs: u64 },
}

impl Command {
    /// Commands that need the session unlocked before they run.
    pub fn needs_session(&self) -> bool {
        matches!(
            self,
            Command::Run
                | Command::ToggleEncryption
                | Command::Encrypt
                | Command::Decrypt
                | Command::Reveal { .. }
                | Command::Peek
        )
    }
}
