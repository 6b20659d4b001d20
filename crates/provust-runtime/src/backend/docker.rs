//! Docker CLI runtime.
//!
//! Drives the `docker` binary (or a drop-in such as `podman`) through
//! subprocess calls. Every failure maps to the environment error class:
//! a runtime that cannot create or start containers makes the host
//! unusable for testing and is never retried.

use std::process::Command;

use provust_common::error::{ProvustError, Result};
use provust_common::types::ContainerId;
use serde::Deserialize;

use super::{ContainerConfig, ContainerRuntime, InspectReport};

/// Container runtime backed by the Docker-compatible CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    /// Creates a runtime driving the given binary.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Runs one CLI subcommand and returns trimmed stdout.
    fn run(&self, operation: &'static str, subject: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| ProvustError::Environment {
                operation,
                service: subject.to_string(),
                message: format!("failed to launch {}: {e}", self.binary),
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(ProvustError::Environment {
                operation,
                service: subject.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl ContainerRuntime for DockerCli {
    fn pull(&self, image: &str) -> Result<()> {
        tracing::info!(image, "pulling image");
        self.run("pull", image, &["pull", image]).map(drop)
    }

    fn create(&self, config: &ContainerConfig) -> Result<ContainerId> {
        let port = config.exposed_port.to_string();
        let stdout = self.run(
            "create",
            &config.name,
            &[
                "create",
                "--name",
                &config.name,
                "--expose",
                &port,
                &config.image,
            ],
        )?;
        tracing::info!(name = %config.name, id = %stdout, "container created");
        Ok(ContainerId::new(stdout))
    }

    fn start(&self, id: &ContainerId) -> Result<()> {
        self.run("start", id.as_str(), &["start", id.as_str()])
            .map(drop)
    }

    fn inspect(&self, id: &ContainerId) -> Result<InspectReport> {
        let payload = self.run("inspect", id.as_str(), &["inspect", id.as_str()])?;
        parse_inspect(&payload)?.ok_or_else(|| ProvustError::Environment {
            operation: "inspect",
            service: id.to_string(),
            message: "empty inspect report".to_string(),
        })
    }

    fn kill(&self, id: &ContainerId) -> Result<()> {
        self.run("kill", id.as_str(), &["kill", id.as_str()])
            .map(drop)
    }

    fn remove(&self, id: &ContainerId) -> Result<()> {
        self.run("remove", id.as_str(), &["rm", id.as_str()])
            .map(drop)
    }

    fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }
}

#[derive(Debug, Deserialize)]
struct Inspection {
    #[serde(rename = "State")]
    state: InspectionState,
    #[serde(rename = "NetworkSettings")]
    network: InspectionNetwork,
}

#[derive(Debug, Deserialize)]
struct InspectionState {
    #[serde(rename = "Running")]
    running: bool,
}

#[derive(Debug, Deserialize)]
struct InspectionNetwork {
    #[serde(rename = "IPAddress")]
    ip_address: String,
}

/// Extracts address and state from the runtime's JSON inspect payload.
fn parse_inspect(payload: &str) -> Result<Option<InspectReport>> {
    let reports: Vec<Inspection> = serde_json::from_str(payload)?;
    Ok(reports.into_iter().next().map(|i| InspectReport {
        address: i.network.ip_address,
        running: i.state.running,
    }))
}
