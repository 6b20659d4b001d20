//! Unified error types for the Provust workspace.
//!
//! The taxonomy separates failures that abort a test run outright
//! (environment, unexpected probe errors) from the one transient class the
//! readiness prober is allowed to retry (connection refusals) and from
//! teardown failures, which are reported but never mask the outcome of the
//! work they follow.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ProvustError {
    /// The container runtime rejected a lifecycle operation.
    ///
    /// Indicates the host or runtime is unusable for testing; never retried.
    #[error("container runtime failed to {operation} for {service}: {message}")]
    Environment {
        /// Lifecycle operation that failed (`pull`, `create`, ...).
        operation: &'static str,
        /// Service or container the operation was issued for.
        service: String,
        /// Runtime-reported failure detail.
        message: String,
    },

    /// A backing service exhausted its readiness budget without answering.
    #[error("{service} did not become ready after {attempts} attempts")]
    NotReady {
        /// Service that never became ready.
        service: String,
        /// Number of probe attempts consumed.
        attempts: u32,
    },

    /// A readiness probe failed with something other than a refusal.
    ///
    /// Likely a protocol or configuration mismatch rather than a timing
    /// gap; failing fast beats burning the retry budget.
    #[error("probe for {service} failed: {message}")]
    Probe {
        /// Service whose probe failed.
        service: String,
        /// Probe failure detail.
        message: String,
    },

    /// Container teardown failed.
    ///
    /// Reported and logged; sibling cleanup still proceeds.
    #[error("teardown of {container} failed: {message}")]
    Teardown {
        /// Name of the container that could not be torn down.
        container: String,
        /// Runtime-reported failure detail.
        message: String,
    },

    /// A configuration value is invalid or an API was misused.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ProvustError>;

/// Outcome classification for a single readiness probe attempt.
///
/// Only [`ProbeError::Refused`] is retried by the prober; everything else
/// aborts immediately.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Nothing is listening yet; the service is still starting.
    #[error("connection refused: {source}")]
    Refused {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Any other failure: protocol mismatch, unreachable host, timeout.
    #[error("{message}")]
    Fatal {
        /// Failure detail.
        message: String,
    },
}

impl ProbeError {
    /// Classifies an I/O error by kind.
    ///
    /// `ConnectionRefused`, `ConnectionReset`, `ConnectionAborted`, and
    /// `NotConnected` indicate a service whose socket is not accepting yet;
    /// every other kind is treated as fatal.
    #[must_use]
    pub fn from_io(source: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match source.kind() {
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected => Self::Refused { source },
            _ => Self::Fatal {
                message: source.to_string(),
            },
        }
    }

    /// Builds a fatal error from a protocol-level mismatch.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    /// Returns whether the prober may retry after this error.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Refused { .. })
    }
}
