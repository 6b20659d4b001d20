//! CLI command definitions and dispatch.

pub mod down;
pub mod probe;
pub mod up;

use clap::{Parser, Subcommand};

/// Provust — ephemeral backing services for integration tests.
#[derive(Parser, Debug)]
#[command(name = "pvst", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a backing service and wait until it answers its protocol.
    Up(up::UpArgs),
    /// Kill and remove a backing-service container.
    Down(down::DownArgs),
    /// Run a single readiness probe against an address.
    Probe(probe::ProbeArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Up(args) => up::execute(&args),
        Command::Down(args) => down::execute(&args),
        Command::Probe(args) => probe::execute(&args),
    }
}
