//! Readiness probing with bounded exponential backoff.
//!
//! Distinguishes "the container process exists" (which the runtime reports
//! as soon as the process is scheduled) from "the service protocol
//! answers". A probe attempt is one real handshake; while it is refused
//! the prober sleeps, doubles the delay up to a ceiling, and retries until
//! the attempt budget runs out.

use std::time::Duration;

use provust_common::constants;
use provust_common::error::{ProbeError, ProvustError, Result};

/// Bounded retry policy for readiness probing.
///
/// Consumed monotonically; exhaustion is a terminal failure, not an error
/// to retry at a higher level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryBudget {
    /// Maximum probe attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Factor the delay grows by after each refused attempt.
    pub multiplier: u32,
    /// Ceiling the delay never grows past.
    pub max_delay: Duration,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self {
            max_attempts: constants::MAX_PROBE_ATTEMPTS,
            initial_delay: constants::INITIAL_PROBE_DELAY,
            multiplier: constants::PROBE_BACKOFF_MULTIPLIER,
            max_delay: constants::MAX_PROBE_DELAY,
        }
    }
}

impl RetryBudget {
    /// Creates a budget with the default backoff factor and ceiling.
    #[must_use]
    pub const fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            multiplier: constants::PROBE_BACKOFF_MULTIPLIER,
            max_delay: constants::MAX_PROBE_DELAY,
        }
    }
}

/// Blocks until `probe` succeeds or the budget is exhausted.
///
/// # Errors
///
/// Returns [`ProvustError::NotReady`] once the attempt budget is exhausted
/// and [`ProvustError::Probe`] immediately on any non-refused probe
/// failure.
pub fn wait_ready<P>(service: &str, budget: &RetryBudget, probe: P) -> Result<()>
where
    P: FnMut() -> std::result::Result<(), ProbeError>,
{
    wait_ready_with(service, budget, probe, std::thread::sleep)
}

/// [`wait_ready`] with an injectable sleep strategy.
///
/// Tests pass a recording closure so the exact backoff series can be
/// asserted without wall-clock delays.
///
/// # Errors
///
/// Same contract as [`wait_ready`].
pub fn wait_ready_with<P, S>(
    service: &str,
    budget: &RetryBudget,
    mut probe: P,
    mut sleep: S,
) -> Result<()>
where
    P: FnMut() -> std::result::Result<(), ProbeError>,
    S: FnMut(Duration),
{
    let mut delay = budget.initial_delay;
    for attempt in 1..=budget.max_attempts {
        match probe() {
            Ok(()) => {
                tracing::debug!(service, attempt, "service ready");
                return Ok(());
            }
            Err(err) if err.is_transient() => {
                tracing::trace!(service, attempt, ?delay, "not accepting yet; backing off");
                sleep(delay);
                delay = (delay * budget.multiplier).min(budget.max_delay);
            }
            Err(err) => {
                return Err(ProvustError::Probe {
                    service: service.to_string(),
                    message: err.to_string(),
                });
            }
        }
    }
    Err(ProvustError::NotReady {
        service: service.to_string(),
        attempts: budget.max_attempts,
    })
}
