//! CLI command definitions and dispatch.

pub mod observe;
pub mod report;

use clap::{Parser, Subcommand};

/// ctsync — Synchronize with a container's self-reported lifecycle.
#[derive(Parser, Debug)]
#[command(name = ctsync_common::constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Listen on a sync socket and print each reported state.
    Observe(observe::ObserveArgs),
    /// Connect to a sync socket and report statuses as a container would.
    Report(report::ReportArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Observe(args) => observe::execute(args).await,
        Command::Report(args) => report::execute(args).await,
    }
}
