//! Interactive session behind `clipguard run`.
//!
//! The monitor and every command share one [`AppContext`], so writes made by
//! commands go through the same recursion guard the poll loop consults and
//! toggles reach the live policy.

use std::future::Future;
use std::io::{BufRead, Write};
use std::sync::mpsc as std_mpsc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{info, warn};

use cg_app::AppContext;

use crate::commands::{change_password, ensure_session, on_off, write_status, PasswordSource};

const HELP: &str = "\
commands:
  help (h)              show this help
  password (p)          set or replace the password
  toggle (t)            turn auto-encryption on or off
  encrypt (e)           encrypt the clipboard now
  decrypt (d)           decrypt the clipboard permanently
  reveal [SECS] (r)     decrypt for SECS seconds (5-300), then restore
  peek (pk)             print the plaintext without touching the clipboard
  duration SECS         set the default reveal duration (5-300)
  status (s)            show engine and clipboard state
  lock (l)              forget the key until `unlock`
  unlock (u)            unlock with the password
  quit (q)              stop monitoring and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Password,
    Toggle,
    Encrypt,
    Decrypt,
    Reveal(Option<u64>),
    Peek,
    SetDuration(u64),
    Status,
    Lock,
    Unlock,
    Quit,
}

impl ShellCommand {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments to `{word}`"));
        }

        let secs = |arg: &str| {
            arg.parse::<u64>()
                .map_err(|_| format!("`{arg}` is not a number of seconds"))
        };

        let command = match word.to_lowercase().as_str() {
            "help" | "h" => Self::Help,
            "password" | "p" => Self::Password,
            "toggle" | "t" => Self::Toggle,
            "encrypt" | "e" => Self::Encrypt,
            "decrypt" | "d" => Self::Decrypt,
            "reveal" | "r" => return Ok(Some(Self::Reveal(arg.map(secs).transpose()?))),
            "peek" | "pk" => Self::Peek,
            "duration" => {
                let arg = arg.ok_or_else(|| "usage: duration SECS".to_string())?;
                return Ok(Some(Self::SetDuration(secs(arg)?)));
            }
            "status" | "s" => Self::Status,
            "lock" | "l" => Self::Lock,
            "unlock" | "u" => Self::Unlock,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return Err(format!("unknown command `{word}`; type `help`")),
        };
        if arg.is_some() {
            return Err(format!("`{word}` takes no arguments"));
        }
        Ok(Some(command))
    }
}

/// Where command lines come from.
pub struct CommandInput {
    lines: mpsc::Receiver<String>,
    /// Set for the terminal reader, which only reads after a request.
    requests: Option<std_mpsc::Sender<()>>,
}

impl CommandInput {
    pub fn from_channel(lines: mpsc::Receiver<String>) -> Self {
        Self {
            lines,
            requests: None,
        }
    }

    /// Lines typed on the terminal.
    ///
    /// Read on a plain thread: a blocked stdin read cannot be cancelled, and
    /// the thread must not keep the runtime from shutting down after Ctrl-C.
    /// It reads one line per request so it is never blocked on the terminal
    /// while a password prompt is.
    pub fn stdin() -> anyhow::Result<Self> {
        let (tx, lines) = mpsc::channel(1);
        let (requests, pending) = std_mpsc::channel::<()>();
        std::thread::Builder::new()
            .name("clipguard-stdin".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for () in pending {
                    let mut line = String::new();
                    match stdin.lock().read_line(&mut line) {
                        Ok(0) => break,
                        Ok(_) => {
                            let line = line.trim_end_matches(['\r', '\n']).to_string();
                            if tx.blocking_send(line).is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            warn!(error = %err, "failed to read from stdin");
                            break;
                        }
                    }
                }
            })
            .context("failed to spawn stdin reader")?;

        Ok(Self {
            lines,
            requests: Some(requests),
        })
    }

    /// `None` at end of input.
    async fn next_line(&mut self) -> Option<String> {
        if let Some(requests) = &self.requests {
            requests.send(()).ok()?;
        }
        self.lines.recv().await
    }
}

/// Start the monitor and serve commands until `quit`, end of input or
/// `shutdown` resolves. The monitor is stopped and any pending reveal closed
/// before returning.
pub async fn run_interactive<W: Write>(
    ctx: &AppContext,
    passwords: &PasswordSource,
    mut input: CommandInput,
    out: &mut W,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let uc = ctx.usecases();
    uc.start_clipboard_monitor().execute().await?;
    writeln!(
        out,
        "monitoring clipboard, auto-encryption {}; type `help` for commands",
        on_off(ctx.policy().encryption_enabled())
    )?;

    tokio::pin!(shutdown);
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = tokio::select! {
            _ = &mut shutdown => {
                writeln!(out)?;
                break;
            }
            line = input.next_line() => line,
        };
        let Some(line) = line else {
            break;
        };

        match ShellCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(err) = dispatch(ctx, passwords, command, out).await {
                    writeln!(out, "error: {err:#}")?;
                }
            }
            Err(message) => writeln!(out, "{message}")?,
        }
    }

    uc.stop_clipboard_monitor().execute().await?;
    if ctx.exposure().revert_now().await {
        writeln!(out, "revealed plaintext re-encrypted")?;
    }
    info!("interactive session ended");
    Ok(())
}

async fn dispatch<W: Write>(
    ctx: &AppContext,
    passwords: &PasswordSource,
    command: ShellCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    let uc = ctx.usecases();
    match command {
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Password => {
            change_password(ctx, passwords).await?;
            writeln!(out, "password set")?;
        }
        ShellCommand::Toggle => {
            let enabled = uc.toggle_encryption().execute().await?;
            writeln!(out, "auto-encryption {}", on_off(enabled))?;
        }
        ShellCommand::Encrypt => {
            let envelope = uc.manual_encrypt().execute().await?;
            writeln!(out, "clipboard encrypted ({} chars)", envelope.chars().count())?;
        }
        ShellCommand::Decrypt => {
            let plaintext = uc.manual_decrypt().execute().await?;
            writeln!(out, "clipboard decrypted ({} chars)", plaintext.chars().count())?;
        }
        ShellCommand::Reveal(secs) => {
            uc.reveal_clipboard().execute(secs).await?;
            let secs = secs.unwrap_or_else(|| ctx.policy().default_exposure().secs());
            writeln!(out, "plaintext on clipboard for {secs}s")?;
        }
        ShellCommand::Peek => writeln!(out, "{}", uc.peek_clipboard().execute().await?)?,
        ShellCommand::SetDuration(secs) => {
            let duration = uc.set_default_exposure().execute(secs).await?;
            writeln!(out, "default reveal duration: {}s", duration.secs())?;
        }
        ShellCommand::Status => {
            let status = uc.get_status().execute().await?;
            write_status(out, &status, true)?;
        }
        ShellCommand::Lock => {
            uc.lock_session().execute().await?;
            writeln!(out, "session locked")?;
        }
        ShellCommand::Unlock => {
            ensure_session(ctx, passwords, false).await?;
            writeln!(out, "session unlocked")?;
        }
        ShellCommand::Quit => {}
    }
    Ok(())
}
