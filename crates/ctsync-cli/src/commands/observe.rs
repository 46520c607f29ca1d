//! `ctsync observe` — Print the states a container reports on a sync socket.

use std::path::PathBuf;

use clap::Args;
use ctsync_common::config::SyncConfig;
use ctsync_runtime::{CancellationToken, LifecycleState, StateListener};

use crate::output;

/// Arguments for the `observe` command.
#[derive(Args, Debug)]
pub struct ObserveArgs {
    /// Path of the sync socket to bind.
    #[arg(short, long, env = "CTSYNC_SOCKET")]
    pub socket: PathBuf,

    /// JSON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Executes the `observe` command.
///
/// Binds the socket, prints each state as it arrives, and returns when the
/// session ends. Ctrl+C cancels the session.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the socket
/// cannot be bound, or the session ends before the container reported
/// `stopped` without having been cancelled.
pub async fn execute(args: ObserveArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::default(),
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || on_interrupt.cancel())
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {e}"))?;

    let mut states = StateListener::new(config).start(cancel.clone(), &args.socket)?;
    tracing::info!(socket = %args.socket.display(), "observing container state");
    eprintln!(
        "  Waiting for container status on {}...",
        args.socket.display()
    );

    let mut last = None;
    while let Some(state) = states.recv().await {
        println!("{}", output::format_state(state));
        last = Some(state);
    }

    match output::summarize(last, cancel.is_cancelled()) {
        output::SessionSummary::Exited | output::SessionSummary::Cancelled => Ok(()),
        output::SessionSummary::EndedEarly => {
            anyhow::bail!(
                "status stream ended before the container reported stopped (last state: {})",
                last.map_or_else(|| "none".to_owned(), |s: LifecycleState| s.to_string())
            )
        }
    }
}
