//! Fluent API for launching ready backing services.

use std::collections::BTreeMap;

use provust_common::error::Result;
use provust_common::types::{ContainerHandle, ServiceKind};
use provust_probes::probe_for;
use provust_runtime::provisioner::{ServiceGuard, ServiceProvisioner, ServiceSpec};
use provust_runtime::readiness::{RetryBudget, wait_ready};

/// Builder describing one backing service to launch.
#[derive(Debug, Clone)]
pub struct BackingService {
    kind: ServiceKind,
    tag: String,
    port: u16,
    budget: RetryBudget,
}

impl BackingService {
    /// Starts describing a service of the given kind on its default port.
    #[must_use]
    pub fn new(kind: ServiceKind) -> Self {
        Self {
            kind,
            tag: "latest".to_string(),
            port: kind.default_port(),
            budget: RetryBudget::default(),
        }
    }

    /// Describes a key-value cache server.
    #[must_use]
    pub fn redis() -> Self {
        Self::new(ServiceKind::Redis)
    }

    /// Describes a memory object cache server.
    #[must_use]
    pub fn memcached() -> Self {
        Self::new(ServiceKind::Memcached)
    }

    /// Sets the image tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Overrides the wire port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the readiness retry budget.
    #[must_use]
    pub fn retry_budget(mut self, budget: RetryBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Provisions the container and blocks until the service answers its
    /// protocol.
    ///
    /// The teardown guard is held across the readiness wait, so a service
    /// that never becomes ready is still deprovisioned before the error
    /// propagates.
    ///
    /// # Errors
    ///
    /// Surfaces environment errors from provisioning, readiness-timeout
    /// errors once the budget is exhausted, and fatal probe errors
    /// immediately.
    pub fn launch(self, provisioner: &ServiceProvisioner) -> Result<ReadyService<'_>> {
        let spec = ServiceSpec::new(self.kind, self.tag).with_port(self.port);
        let guard = provisioner.provision_scoped(&spec)?;

        let probe = probe_for(self.kind);
        let address = guard.handle().address.clone();
        let port = guard.handle().port;
        wait_ready(self.kind.as_str(), &self.budget, || probe(&address, port))?;

        tracing::info!(service = %self.kind, %address, port, "backing service ready");
        Ok(ReadyService { guard })
    }
}

/// A provisioned, protocol-ready backing service.
///
/// Dropping the value tears the container down; [`shutdown`](Self::shutdown)
/// does the same eagerly and surfaces teardown errors.
#[must_use = "dropping the service tears the container down"]
pub struct ReadyService<'a> {
    guard: ServiceGuard<'a>,
}

impl ReadyService<'_> {
    /// Returns the underlying container handle.
    #[must_use]
    pub const fn handle(&self) -> &ContainerHandle {
        self.guard.handle()
    }

    /// Returns the connection parameters for the clients under test.
    #[must_use]
    pub const fn connection_params(&self) -> &BTreeMap<String, String> {
        self.guard.handle().connection_params()
    }

    /// Tears the service down now.
    ///
    /// # Errors
    ///
    /// Returns a teardown error if kill or remove failed.
    pub fn shutdown(self) -> Result<()> {
        self.guard.release()
    }
}
