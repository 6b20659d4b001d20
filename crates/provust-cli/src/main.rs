//! # pvst — Provust CLI
//!
//! Manually manage ephemeral backing-service containers: pre-warm a local
//! test environment, probe a service for readiness, clean up leftovers.

mod commands;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
