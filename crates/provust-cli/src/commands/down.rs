//! `pvst down` — Kill and remove a backing-service container.

use clap::Args;
use provust_common::config::ProvustConfig;
use provust_common::types::ContainerId;
use provust_runtime::backend;

/// Arguments for the `down` command.
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Container ID or name to tear down.
    pub container: String,
}

/// Executes the `down` command.
///
/// Teardown is best-effort: a kill failure is reported but removal is
/// still attempted.
///
/// # Errors
///
/// Returns an error if the container could not be removed.
pub fn execute(args: &DownArgs) -> anyhow::Result<()> {
    let config = ProvustConfig::from_env();
    let runtime = backend::detect_runtime(&config);
    if !runtime.is_available() {
        anyhow::bail!("container runtime '{}' not found", config.runtime_binary);
    }

    let id = ContainerId::new(args.container.clone());
    if let Err(e) = runtime.kill(&id) {
        tracing::warn!(container = %id, error = %e, "kill failed; still attempting removal");
    }
    runtime.remove(&id)?;

    eprintln!("  Removed {}", args.container);
    Ok(())
}
