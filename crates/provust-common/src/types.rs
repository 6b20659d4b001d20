//! Domain primitive types used across the Provust workspace.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProvustError;

/// Unique identifier for one test-run invocation.
///
/// Generated once per run and shared read-only by every provisioner, the
/// session id namespaces container names so concurrent runs on the same
/// host cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a new random session identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Creates a session ID from an existing string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a container instance, as assigned by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of backing service a container runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Key-value cache server speaking the RESP protocol.
    Redis,
    /// Distributed memory object cache speaking the memcached text protocol.
    Memcached,
}

impl ServiceKind {
    /// Returns the canonical lowercase name of this service kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::Memcached => "memcached",
        }
    }

    /// Returns the image repository name for this service kind.
    #[must_use]
    pub const fn image_name(self) -> &'static str {
        self.as_str()
    }

    /// Returns the well-known wire port the service listens on.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Redis => 6379,
            Self::Memcached => 11211,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = ProvustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redis" => Ok(Self::Redis),
            "memcached" => Ok(Self::Memcached),
            other => Err(ProvustError::Config {
                message: format!("unknown service kind: {other}"),
            }),
        }
    }
}

/// A provisioned container's identity and connection parameters.
///
/// Connection parameters are derived once, when the container's network
/// address becomes available, and are immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerHandle {
    /// Identifier assigned by the container runtime.
    pub id: ContainerId,
    /// Deterministic name (service kind + tag + session id).
    pub name: String,
    /// Network address the service is reachable at.
    pub address: String,
    /// Wire port the service listens on.
    pub port: u16,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    params: BTreeMap<String, String>,
}

impl ContainerHandle {
    /// Creates a handle and derives its connection parameters.
    #[must_use]
    pub fn new(id: ContainerId, name: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        let address = address.into();
        let mut params = BTreeMap::new();
        let _ = params.insert("host".to_string(), address.clone());
        let _ = params.insert("port".to_string(), port.to_string());
        Self {
            id,
            name: name.into(),
            address,
            port,
            created_at: chrono::Utc::now().to_rfc3339(),
            params,
        }
    }

    /// Returns the connection parameters as an option-name → value map.
    #[must_use]
    pub const fn connection_params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}
