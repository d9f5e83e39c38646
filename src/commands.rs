//! Command handlers. Each one drives use cases from [`cg_app::UseCases`] and
//! prints a short human-readable result on stdout.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info_span, warn, Instrument};

use cg_app::usecases::{AppStatus, PasswordError};
use cg_app::AppContext;
use cg_core::security::model::Passphrase;

use crate::bootstrap::observer::spawn_event_logger;
use crate::bootstrap::WiredApp;
use crate::cli::Command;
use crate::shell;

const UNLOCK_ATTEMPTS: usize = 3;
const SETTLE_POLL: Duration = Duration::from_millis(100);

/// Where passwords come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// Name of an environment variable holding the password.
    Env(String),
    Prompt,
}

impl PasswordSource {
    pub fn from_cli(password_env: Option<String>) -> Self {
        password_env.map_or(Self::Prompt, Self::Env)
    }

    fn is_interactive(&self) -> bool {
        matches!(self, Self::Prompt)
    }

    fn read(&self, prompt: &str) -> anyhow::Result<Passphrase> {
        match self {
            Self::Env(var) => std::env::var(var)
                .map(Passphrase)
                .with_context(|| format!("password variable {var} is not set")),
            Self::Prompt => rpassword::prompt_password(prompt)
                .map(Passphrase)
                .context("failed to read password from terminal"),
        }
    }
}

pub async fn execute(
    command: Command,
    app: WiredApp,
    passwords: &PasswordSource,
) -> anyhow::Result<()> {
    let WiredApp {
        ctx,
        events,
        settings,
    } = app;
    let logger = spawn_event_logger(events, settings.general.show_notifications);

    let span = info_span!("command", ?command);
    let result = run_command(&ctx, command, passwords).instrument(span).await;

    // let the logger flush whatever the command emitted
    drop(ctx);
    let _ = tokio::time::timeout(Duration::from_millis(500), logger).await;

    result
}

async fn run_command(
    ctx: &AppContext,
    command: Command,
    passwords: &PasswordSource,
) -> anyhow::Result<()> {
    if command.needs_session() {
        ensure_session(ctx, passwords, command == Command::Run).await?;
    }

    let uc = ctx.usecases();
    match command {
        Command::Run => run_monitor(ctx, passwords).await?,
        Command::SetPassword => {
            change_password(ctx, passwords).await?;
            println!("password set");
        }
        Command::ToggleEncryption => {
            let enabled = uc.toggle_encryption().execute().await?;
            println!("auto-encryption {}", on_off(enabled));
        }
        Command::Encrypt => {
            let envelope = uc.manual_encrypt().execute().await?;
            println!("clipboard encrypted ({} chars)", envelope.chars().count());
        }
        Command::Decrypt => {
            let plaintext = uc.manual_decrypt().execute().await?;
            println!("clipboard decrypted ({} chars)", plaintext.chars().count());
        }
        Command::Reveal { secs } => {
            uc.reveal_clipboard().execute(secs).await?;
            let secs = secs.unwrap_or_else(|| ctx.policy().default_exposure().secs());
            println!("plaintext on clipboard for {secs}s; Ctrl-C restores it now");
            wait_for_exposure(ctx).await?;
        }
        Command::Peek => {
            println!("{}", uc.peek_clipboard().execute().await?);
        }
        Command::Status => {
            let status = uc.get_status().execute().await?;
            // a one-shot process never owns the session or the monitor
            write_status(&mut std::io::stdout().lock(), &status, false)?;
        }
        Command::SetDefaultDuration { secs } => {
            let duration = uc.set_default_exposure().execute(secs).await?;
            println!("default reveal duration: {}s", duration.secs());
        }
    }
    Ok(())
}

/// Unlock with the stored password, or set a first one when allowed.
pub(crate) async fn ensure_session(
    ctx: &AppContext,
    passwords: &PasswordSource,
    allow_first_password: bool,
) -> anyhow::Result<()> {
    let unlock = ctx.usecases().unlock_session();
    if !unlock.is_configured().await? {
        if allow_first_password {
            eprintln!("no password set yet; choose one");
            return set_new_password(ctx, passwords).await;
        }
        bail!("no password set; run `clipguard set-password` first");
    }

    let attempts = if passwords.is_interactive() {
        UNLOCK_ATTEMPTS
    } else {
        1
    };
    let mut attempt = 1;
    loop {
        match unlock.execute(passwords.read("Password: ")?).await {
            Ok(()) => return Ok(()),
            Err(PasswordError::WrongPassword) if attempt < attempts => {
                eprintln!("wrong password, try again");
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Set a password, proving knowledge of the current one first if any.
pub(crate) async fn change_password(
    ctx: &AppContext,
    passwords: &PasswordSource,
) -> anyhow::Result<()> {
    if ctx.usecases().unlock_session().is_configured().await? {
        ensure_session(ctx, passwords, false).await?;
    }
    set_new_password(ctx, passwords).await
}

async fn set_new_password(ctx: &AppContext, passwords: &PasswordSource) -> anyhow::Result<()> {
    let password = passwords.read("New password: ")?;
    if passwords.is_interactive() {
        let confirm = passwords.read("Confirm password: ")?;
        if confirm.as_str() != password.as_str() {
            bail!("passwords do not match");
        }
    }
    ctx.usecases().set_password().execute(password).await?;
    Ok(())
}

async fn run_monitor(ctx: &AppContext, passwords: &PasswordSource) -> anyhow::Result<()> {
    let input = shell::CommandInput::stdin()?;
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    shell::run_interactive(ctx, passwords, input, &mut std::io::stdout(), shutdown).await
}

/// Keep the process alive until the pending reveal has closed, or close it
/// early on Ctrl-C.
async fn wait_for_exposure(ctx: &AppContext) -> anyhow::Result<()> {
    let settled = async {
        while ctx.exposure().pending().is_some() {
            tokio::time::sleep(SETTLE_POLL).await;
        }
    };

    tokio::select! {
        _ = settled => {}
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for Ctrl-C")?;
            if ctx.exposure().revert_now().await {
                println!("re-encrypted early");
            }
        }
    }
    Ok(())
}

/// `live` adds the state only the process running the monitor knows.
pub(crate) fn write_status<W: Write>(
    out: &mut W,
    status: &AppStatus,
    live: bool,
) -> std::io::Result<()> {
    writeln!(out, "password set:        {}", yes_no(status.password_configured))?;
    if live {
        writeln!(out, "session unlocked:    {}", yes_no(status.session_ready))?;
        writeln!(out, "monitor running:     {}", yes_no(status.monitor_running))?;
        if let Some(expires_at_ms) = status.exposure_expires_at_ms {
            writeln!(out, "reveal closes at:    {expires_at_ms} (unix ms)")?;
        }
    }
    writeln!(out, "auto-encryption:     {}", on_off(status.encryption_enabled))?;
    writeln!(out, "default reveal:      {}s", status.default_exposure_secs)?;

    let clipboard = &status.clipboard;
    let kind = match clipboard.is_encrypted {
        _ if !clipboard.has_content => "",
        Some(true) => ", encrypted",
        Some(false) => ", plaintext",
        None => ", encrypted or not (unlock to tell)",
    };
    writeln!(out, "clipboard:           {} chars{kind}", clipboard.length)
}

pub(crate) fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
