//! Drains engine events into the log and, when notifications are on, onto
//! the terminal.

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use cg_platform::MonitorEvent;

/// One-line, content-free description of an event for the terminal.
pub fn describe(event: &MonitorEvent) -> String {
    match event {
        MonitorEvent::ClipboardChanged { new_len, .. } => {
            format!("clipboard changed ({new_len} bytes)")
        }
        MonitorEvent::EncryptionPerformed { plaintext_len } => {
            format!("clipboard encrypted ({plaintext_len} bytes of plaintext)")
        }
        MonitorEvent::DecryptionPerformed { plaintext_len } => {
            format!("clipboard decrypted ({plaintext_len} bytes)")
        }
        MonitorEvent::EnvelopeObserved { envelope_len } => {
            format!("encrypted content on clipboard ({envelope_len} bytes)")
        }
        MonitorEvent::Error { message } => format!("error: {message}"),
    }
}

/// Runs until every sender is dropped.
pub fn spawn_event_logger(
    mut events: UnboundedReceiver<MonitorEvent>,
    show_notifications: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event {
                MonitorEvent::Error { message } => warn!(%message, "engine error"),
                other => info!(event = ?other, "engine event"),
            }

            // clipboard-changed fires on every copy; too chatty for the terminal
            let notable = !matches!(event, MonitorEvent::ClipboardChanged { .. });
            if show_notifications && notable {
                eprintln!("clipguard: {}", describe(&event));
            }
        }
    })
}
