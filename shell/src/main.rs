//! Headless desktop: JSON-lines `DesktopCommand`s on stdin, events and state
//! snapshots as JSON lines on stdout. Logs go to stderr.

use ractor::Actor;
use serde_json::json;
use shared_types::DesktopCommand;
use shell::actors::desktop::{self, DesktopActor, DesktopArguments};
use shell::ShellConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ShellConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        desktop_width = config.desktop_width,
        desktop_height = config.desktop_height,
        "Starting headless desktop shell"
    );

    let (desktop_ref, desktop_handle) = Actor::spawn(
        Some("desktop".to_string()),
        DesktopActor,
        DesktopArguments::with_core_apps("desktop-headless", config),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to spawn DesktopActor: {e}"))?;

    let mut events = desktop::subscribe(&desktop_ref).await?;
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => println!("{}", json!({ "event": event })),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command: DesktopCommand = match serde_json::from_str(line) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(error = %e, input = %line, "Ignoring malformed command");
                continue;
            }
        };

        if command == DesktopCommand::GetState {
            let state = desktop::get_desktop_state(&desktop_ref).await?;
            println!("{}", json!({ "state": state }));
            continue;
        }
        if let Err(e) = desktop::send_command(&desktop_ref, command).await {
            println!("{}", json!({ "error": e.to_string() }));
        }
    }

    tracing::info!("stdin closed; shutting down");
    desktop_ref.stop(None);
    desktop_handle.await?;
    printer.abort();
    Ok(())
}
