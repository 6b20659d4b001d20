//! System-wide constants and defaults.

use std::time::Duration;

/// Application name used in logging and container labels.
pub const APP_NAME: &str = "provust";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "pvst";

/// Default container runtime binary.
pub const DEFAULT_RUNTIME_BINARY: &str = "docker";

/// Environment variable that skips image pulls when set (and not `0`).
pub const ENV_NO_PULL: &str = "PROVUST_NO_PULL";

/// Environment variable overriding the container runtime binary.
pub const ENV_RUNTIME_BINARY: &str = "PROVUST_RUNTIME";

/// Maximum readiness probe attempts before giving up.
pub const MAX_PROBE_ATTEMPTS: u32 = 100;

/// Delay before the second probe attempt.
pub const INITIAL_PROBE_DELAY: Duration = Duration::from_millis(1);

/// Factor the inter-probe delay grows by after each refused attempt.
pub const PROBE_BACKOFF_MULTIPLIER: u32 = 2;

/// Ceiling on the inter-probe delay. Uncapped doubling over a 100-attempt
/// budget would stall for astronomical spans on a host that keeps refusing.
pub const MAX_PROBE_DELAY: Duration = Duration::from_secs(2);

/// Read/write deadline for a single probe's socket I/O.
pub const PROBE_IO_TIMEOUT: Duration = Duration::from_secs(1);

/// How long a released execution scope waits for pending work to drain.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Infix in generated container names, between the service kind and tag.
pub const CONTAINER_NAME_INFIX: &str = "test-server";

/// Sentinel key written by readiness probes.
pub const PROBE_KEY: &str = "provust-probe";

/// Sentinel value written by readiness probes.
pub const PROBE_VALUE: &str = "1";
