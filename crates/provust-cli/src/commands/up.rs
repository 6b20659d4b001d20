//! `pvst up` — Start a backing service and wait for readiness.

use clap::Args;
use provust_common::config::ProvustConfig;
use provust_common::types::{ServiceKind, SessionId};
use provust_probes::probe_for;
use provust_runtime::backend;
use provust_runtime::provisioner::{ServiceProvisioner, ServiceSpec};
use provust_runtime::readiness::{RetryBudget, wait_ready};

/// Arguments for the `up` command.
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Service kind to start (redis or memcached).
    pub service: String,

    /// Image tag to run.
    #[arg(long, default_value = "latest")]
    pub tag: String,

    /// Skip pulling the image (use the host's cache).
    #[arg(long)]
    pub no_pull: bool,
}

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Executes the `up` command.
///
/// # Errors
///
/// Returns an error if the runtime is unavailable, provisioning fails,
/// or the service never becomes ready (the container is torn down again
/// in that case).
pub fn execute(args: &UpArgs) -> anyhow::Result<()> {
    let kind: ServiceKind = args.service.parse()?;

    let mut config = ProvustConfig::from_env();
    if args.no_pull {
        config.skip_pull = true;
    }

    let runtime = backend::detect_runtime(&config);
    if !runtime.is_available() {
        anyhow::bail!("container runtime '{}' not found", config.runtime_binary);
    }

    let provisioner = ServiceProvisioner::new(runtime, SessionId::generate(), config);
    let spec = ServiceSpec::new(kind, args.tag.as_str());

    let guard = provisioner.provision_scoped(&spec)?;
    let probe = probe_for(kind);
    let address = guard.handle().address.clone();
    let port = guard.handle().port;
    // The guard still owns the container here: if the service never
    // answers, the error propagates only after teardown.
    wait_ready(kind.as_str(), &RetryBudget::default(), || {
        probe(&address, port)
    })?;
    let handle = guard.detach();

    eprintln!();
    eprintln!(
        "  {GREEN}●{RESET} {BOLD}{}{RESET} {DIM}[{}]{RESET} ready at {address}:{port}",
        handle.name, handle.id
    );
    eprintln!();
    eprintln!("  Tear down with: {BOLD}pvst down {}{RESET}", handle.name);

    Ok(())
}
