//! Global configuration model for the Provust provisioner.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Run-level configuration shared by all provisioners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvustConfig {
    /// Skip image pulls (use images already cached on the host).
    pub skip_pull: bool,
    /// Container runtime binary to drive (`docker`, `podman`, ...).
    pub runtime_binary: String,
}

impl Default for ProvustConfig {
    fn default() -> Self {
        Self {
            skip_pull: false,
            runtime_binary: constants::DEFAULT_RUNTIME_BINARY.to_string(),
        }
    }
}

impl ProvustConfig {
    /// Builds a configuration from the process environment.
    ///
    /// `PROVUST_NO_PULL` (any value but `0`) enables `skip_pull`, mirroring
    /// the usual `--no-pull` test-runner switch; `PROVUST_RUNTIME` selects
    /// the runtime binary.
    #[must_use]
    pub fn from_env() -> Self {
        let skip_pull = std::env::var_os(constants::ENV_NO_PULL).is_some_and(|v| v != "0");
        let runtime_binary = std::env::var(constants::ENV_RUNTIME_BINARY)
            .unwrap_or_else(|_| constants::DEFAULT_RUNTIME_BINARY.to_string());
        Self {
            skip_pull,
            runtime_binary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pulls_with_docker() {
        let config = ProvustConfig::default();
        assert!(!config.skip_pull);
        assert_eq!(config.runtime_binary, "docker");
    }
}
