//! Drives `clipguard run`'s command loop against an in-memory clipboard while
//! the monitor is polling in the same process.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use clipguard::bootstrap::{wire_app, AppPaths, WiredApp};
use clipguard::commands::PasswordSource;
use clipguard::shell::{run_interactive, CommandInput};
use cg_app::AppContext;
use cg_core::config::AppConfig;
use cg_core::security::model::Passphrase;
use cg_platform::{InMemoryClipboard, MonitorEvent};

const PASSWORD: &str = "shell-pw-123";

struct Session {
    _dir: tempfile::TempDir,
    ctx: AppContext,
    _events: mpsc::UnboundedReceiver<MonitorEvent>,
    clipboard: Arc<InMemoryClipboard>,
}

async fn unlocked_session() -> Session {
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::from_root(dir.path());
    let clipboard = Arc::new(InMemoryClipboard::new(""));
    let WiredApp { ctx, events, .. } =
        wire_app(&paths, &AppConfig::default(), clipboard.clone())
            .await
            .unwrap();
    ctx.usecases()
        .set_password()
        .execute(Passphrase(PASSWORD.into()))
        .await
        .unwrap();

    Session {
        _dir: dir,
        ctx,
        _events: events,
        clipboard,
    }
}

#[tokio::test(start_paused = true)]
async fn decrypt_and_reveal_survive_the_running_monitor() {
    std::env::set_var("CG_IT_SHELL_PW_A", PASSWORD);
    let s = unlocked_session().await;
    let passwords = PasswordSource::Env("CG_IT_SHELL_PW_A".into());
    let (tx, rx) = mpsc::channel(8);
    let mut out = Vec::new();

    let shell = run_interactive(
        &s.ctx,
        &passwords,
        CommandInput::from_channel(rx),
        &mut out,
        std::future::pending(),
    );
    let driver = async {
        sleep(Duration::from_millis(100)).await;
        tx.send("toggle".into()).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        assert!(s.ctx.policy().encryption_enabled());

        s.clipboard.user_copy("account 12345");
        sleep(Duration::from_millis(1_200)).await;
        assert_ne!(s.clipboard.content(), "account 12345");

        // permanent decrypt is recognised as our own write, not a new copy
        tx.send("decrypt".into()).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(s.clipboard.content(), "account 12345");
        sleep(Duration::from_millis(2_000)).await;
        assert_eq!(s.clipboard.content(), "account 12345");

        s.clipboard.user_copy("pin 9876");
        sleep(Duration::from_millis(1_200)).await;
        let envelope = s.clipboard.content();
        assert_ne!(envelope, "pin 9876");

        tx.send("reveal 5".into()).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(s.clipboard.content(), "pin 9876");
        sleep(Duration::from_millis(3_000)).await;
        assert_eq!(s.clipboard.content(), "pin 9876");
        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(s.clipboard.content(), envelope);

        tx.send("status".into()).await.unwrap();
        tx.send("quit".into()).await.unwrap();
    };

    let (result, ()) = tokio::join!(shell, driver);
    result.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("auto-encryption on"));
    assert!(out.contains("clipboard decrypted (13 chars)"));
    assert!(out.contains("plaintext on clipboard for 5s"));
    assert!(out.contains("monitor running:     yes"));
    assert!(out.contains("clipboard:           ") && out.contains(", encrypted"));

    let status = s.ctx.usecases().get_status().execute().await.unwrap();
    assert!(!status.monitor_running);
}

#[tokio::test(start_paused = true)]
async fn toggling_off_stops_auto_encryption_and_input_end_shuts_down() {
    std::env::set_var("CG_IT_SHELL_PW_B", PASSWORD);
    let s = unlocked_session().await;
    s.ctx
        .usecases()
        .toggle_encryption()
        .set(true)
        .await
        .unwrap();
    let passwords = PasswordSource::Env("CG_IT_SHELL_PW_B".into());
    let (tx, rx) = mpsc::channel(8);
    let mut out = Vec::new();

    let clipboard = s.clipboard.clone();

    let shell = run_interactive(
        &s.ctx,
        &passwords,
        CommandInput::from_channel(rx),
        &mut out,
        std::future::pending(),
    );
    let driver = async move {
        sleep(Duration::from_millis(100)).await;
        tx.send("t".into()).await.unwrap();
        sleep(Duration::from_millis(100)).await;

        clipboard.user_copy("public note");
        sleep(Duration::from_millis(1_500)).await;
        assert_eq!(clipboard.content(), "public note");

        tx.send("reveal 2".into()).await.unwrap();
        tx.send("bogus".into()).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        // dropping the sender ends input
    };

    let (result, ()) = tokio::join!(shell, driver);
    result.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("auto-encryption off"));
    assert!(out.contains("error: "));
    assert!(out.contains("unknown command `bogus`"));
    assert!(!s.ctx.policy().encryption_enabled());
}
