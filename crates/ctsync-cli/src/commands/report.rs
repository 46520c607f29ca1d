//! `ctsync report` — Send statuses to a sync socket as a container would.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use ctsync_common::types::StatusMessage;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;

/// Arguments for the `report` command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path of the sync socket to connect to.
    #[arg(short, long, env = "CTSYNC_SOCKET")]
    pub socket: PathBuf,

    /// Status values to send, in order (e.g. creating created running stopped).
    #[arg(required = true)]
    pub statuses: Vec<String>,

    /// Pause between messages, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub interval_ms: u64,
}

/// Executes the `report` command.
///
/// Writes one `{"status": ...}` object per argument. Values are sent
/// verbatim, so unknown statuses can be exercised too.
///
/// # Errors
///
/// Returns an error if the socket cannot be reached or a write fails.
pub async fn execute(args: ReportArgs) -> anyhow::Result<()> {
    let mut conn = UnixStream::connect(&args.socket).await.map_err(|e| {
        anyhow::anyhow!("could not connect to {}: {e}", args.socket.display())
    })?;

    for (i, status) in args.statuses.iter().enumerate() {
        if i > 0 && args.interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }
        let payload = serde_json::to_vec(&StatusMessage::new(status.as_str()))?;
        conn.write_all(&payload).await?;
        tracing::debug!(%status, "status sent");
    }
    conn.shutdown().await?;
    Ok(())
}
