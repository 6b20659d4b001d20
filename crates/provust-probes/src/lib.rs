//! # provust-probes
//!
//! Protocol-level readiness probes, one per backing-service kind.
//!
//! A probe performs one real handshake against the target address: it
//! connects, writes a sentinel key using the service's own wire protocol,
//! and checks the reply. "The process exists" and "the protocol answers"
//! are different states — a container can be scheduled and listening
//! before its application logic has finished initializing, and only the
//! latter makes a service usable by a test.
//!
//! Probes report [`ProbeError::Refused`] while nothing is accepting yet
//! and [`ProbeError::Fatal`] for everything else; the readiness prober in
//! `provust-runtime` retries only the former.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod memcached;
pub mod redis;

use provust_common::error::ProbeError;
use provust_common::types::ServiceKind;

/// Signature shared by all service probes.
pub type ProbeFn = fn(&str, u16) -> Result<(), ProbeError>;

/// Returns the probe for the given service kind.
#[must_use]
pub const fn probe_for(kind: ServiceKind) -> ProbeFn {
    match kind {
        ServiceKind::Redis => redis::probe,
        ServiceKind::Memcached => memcached::probe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_for_maps_each_kind() {
        assert!(std::ptr::fn_addr_eq(
            probe_for(ServiceKind::Redis),
            redis::probe as ProbeFn
        ));
        assert!(std::ptr::fn_addr_eq(
            probe_for(ServiceKind::Memcached),
            memcached::probe as ProbeFn
        ));
    }
}
