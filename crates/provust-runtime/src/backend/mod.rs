//! Container runtime abstraction.
//!
//! The provisioner depends only on this minimal capability set — pull,
//! create, start, inspect, kill, remove — not on any specific runtime's
//! full API surface. The default implementation drives the Docker CLI;
//! tests substitute in-memory fakes.

pub mod docker;

use std::sync::Arc;

use provust_common::config::ProvustConfig;
use provust_common::error::Result;
use provust_common::types::ContainerId;

/// Configuration for creating a container.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Deterministic container name.
    pub name: String,
    /// Image reference (`repository:tag`).
    pub image: String,
    /// Wire port the contained service listens on.
    pub exposed_port: u16,
}

/// Network and state facts reported by `inspect`.
#[derive(Debug, Clone)]
pub struct InspectReport {
    /// Address the container is reachable at.
    pub address: String,
    /// Whether the runtime reports the container as running.
    ///
    /// "Running" here means the process was scheduled, not that the
    /// service answers its protocol; readiness is probed separately.
    pub running: bool,
}

/// Minimal container runtime capability.
///
/// Implementors handle the transport-specific details (local socket, HTTP
/// API, or CLI subprocess); the provisioner never assumes more than these
/// operations.
pub trait ContainerRuntime: Send + Sync {
    /// Pulls an image so `create` can use it.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be fetched.
    fn pull(&self, image: &str) -> Result<()>;

    /// Creates a container from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be created.
    fn create(&self, config: &ContainerConfig) -> Result<ContainerId>;

    /// Starts a previously created container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be started.
    fn start(&self, id: &ContainerId) -> Result<()>;

    /// Reports a container's network address and state.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be inspected.
    fn inspect(&self, id: &ContainerId) -> Result<InspectReport>;

    /// Kills a running container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be killed.
    fn kill(&self, id: &ContainerId) -> Result<()>;

    /// Removes a stopped container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be removed.
    fn remove(&self, id: &ContainerId) -> Result<()>;

    /// Returns whether this runtime is operational on the current host.
    fn is_available(&self) -> bool;
}

/// Creates the runtime configured for this run.
#[must_use]
pub fn detect_runtime(config: &ProvustConfig) -> Arc<dyn ContainerRuntime> {
    Arc::new(docker::DockerCli::new(config.runtime_binary.clone()))
}
