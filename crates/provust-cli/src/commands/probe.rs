//! `pvst probe` — Run a single readiness probe against an address.

use clap::Args;
use provust_common::error::ProbeError;
use provust_common::types::ServiceKind;
use provust_probes::probe_for;

/// Arguments for the `probe` command.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Service kind to probe (redis or memcached).
    pub service: String,

    /// Host or address the service listens on.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to probe; defaults to the service kind's well-known port.
    #[arg(long)]
    pub port: Option<u16>,
}

/// Executes the `probe` command.
///
/// # Errors
///
/// Returns an error if the service is not ready (refused) or the probe
/// failed fatally, so exit codes reflect the probe outcome.
pub fn execute(args: &ProbeArgs) -> anyhow::Result<()> {
    let kind: ServiceKind = args.service.parse()?;
    let port = args.port.unwrap_or(kind.default_port());

    match probe_for(kind)(&args.host, port) {
        Ok(()) => {
            eprintln!("  {kind} at {}:{port} is ready", args.host);
            Ok(())
        }
        Err(err @ ProbeError::Refused { .. }) => {
            Err(anyhow::anyhow!("{kind} is not accepting connections yet: {err}"))
        }
        Err(err) => Err(anyhow::anyhow!("{kind} probe failed: {err}")),
    }
}
