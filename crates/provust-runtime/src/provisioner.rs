//! Service provisioning: the full lifecycle of one ephemeral
//! backing-service container.
//!
//! Provisioning is `pull → create → start → inspect`; teardown is
//! `kill → remove`. Container names are a deterministic function of
//! (service kind, image tag, session id) so concurrent test runs cannot
//! collide and leaked containers are identifiable by eye.

use std::sync::Arc;

use provust_common::config::ProvustConfig;
use provust_common::constants::CONTAINER_NAME_INFIX;
use provust_common::error::{ProvustError, Result};
use provust_common::types::{ContainerHandle, ServiceKind, SessionId};

use crate::backend::{ContainerConfig, ContainerRuntime};

/// What to provision: a service kind pinned to an image tag and port.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    /// Backing-service kind.
    pub kind: ServiceKind,
    /// Image tag (`latest`, `7.2-alpine`, ...).
    pub image_tag: String,
    /// Wire port the service listens on inside the container.
    pub port: u16,
}

impl ServiceSpec {
    /// Creates a spec on the service kind's well-known port.
    #[must_use]
    pub fn new(kind: ServiceKind, image_tag: impl Into<String>) -> Self {
        Self {
            kind,
            image_tag: image_tag.into(),
            port: kind.default_port(),
        }
    }

    /// Overrides the wire port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns the full image reference.
    #[must_use]
    pub fn image(&self) -> String {
        format!("{}:{}", self.kind.image_name(), self.image_tag)
    }
}

/// Derives the deterministic container name for a spec within a session.
#[must_use]
pub fn container_name(kind: ServiceKind, image_tag: &str, session: &SessionId) -> String {
    format!("{kind}-{CONTAINER_NAME_INFIX}-{image_tag}-{session}")
}

/// Manages ephemeral backing-service containers for one test run.
///
/// All provisioners of a run share the same runtime client and session
/// identity, exactly one live container per (service kind, session) pair.
pub struct ServiceProvisioner {
    runtime: Arc<dyn ContainerRuntime>,
    session: SessionId,
    config: ProvustConfig,
}

impl ServiceProvisioner {
    /// Creates a provisioner bound to a runtime and session.
    #[must_use]
    pub fn new(runtime: Arc<dyn ContainerRuntime>, session: SessionId, config: ProvustConfig) -> Self {
        Self {
            runtime,
            session,
            config,
        }
    }

    /// Returns the session identity this provisioner namespaces under.
    #[must_use]
    pub const fn session(&self) -> &SessionId {
        &self.session
    }

    /// Provisions one container: optional pull, create, start, inspect.
    ///
    /// # Errors
    ///
    /// Any runtime failure surfaces as [`ProvustError::Environment`] and
    /// aborts the run — it indicates host misconfiguration, not a
    /// transient readiness gap, so it is never retried.
    pub fn provision(&self, spec: &ServiceSpec) -> Result<ContainerHandle> {
        let image = spec.image();
        if self.config.skip_pull {
            tracing::debug!(%image, "skipping image pull");
        } else {
            self.runtime.pull(&image)?;
        }

        let name = container_name(spec.kind, &spec.image_tag, &self.session);
        let id = self.runtime.create(&ContainerConfig {
            name: name.clone(),
            image,
            exposed_port: spec.port,
        })?;
        self.runtime.start(&id)?;
        let report = self.runtime.inspect(&id)?;
        tracing::info!(%id, %name, address = %report.address, "container provisioned");

        Ok(ContainerHandle::new(id, name, report.address, spec.port))
    }

    /// Tears a container down: kill, then remove.
    ///
    /// Best-effort — a kill failure is logged and removal is still
    /// attempted. Must be invoked exactly once per successful
    /// [`provision`](Self::provision); prefer
    /// [`provision_scoped`](Self::provision_scoped), which enforces that
    /// structurally.
    ///
    /// # Errors
    ///
    /// Returns [`ProvustError::Teardown`] if either step failed. The error
    /// is for reporting; it never cancels sibling cleanup.
    pub fn deprovision(&self, handle: &ContainerHandle) -> Result<()> {
        let mut failure: Option<String> = None;

        if let Err(e) = self.runtime.kill(&handle.id) {
            tracing::warn!(container = %handle.name, error = %e, "kill failed; still attempting removal");
            failure = Some(e.to_string());
        }
        if let Err(e) = self.runtime.remove(&handle.id) {
            tracing::warn!(container = %handle.name, error = %e, "remove failed");
            failure = Some(match failure {
                Some(prev) => format!("{prev}; {e}"),
                None => e.to_string(),
            });
        }

        match failure {
            None => {
                tracing::info!(container = %handle.name, "container deprovisioned");
                Ok(())
            }
            Some(message) => Err(ProvustError::Teardown {
                container: handle.name.clone(),
                message,
            }),
        }
    }

    /// Provisions a container behind a teardown guard.
    ///
    /// # Errors
    ///
    /// Same contract as [`provision`](Self::provision).
    pub fn provision_scoped(&self, spec: &ServiceSpec) -> Result<ServiceGuard<'_>> {
        Ok(ServiceGuard {
            provisioner: Some(self),
            handle: self.provision(spec)?,
        })
    }
}

/// Teardown guard for a provisioned container.
///
/// Deprovisions exactly once: eagerly via [`release`](Self::release), or
/// on drop — including drops during panic unwind, so a failing test body
/// between provisioning and teardown still cleans up.
#[must_use = "dropping the guard tears the container down"]
pub struct ServiceGuard<'a> {
    provisioner: Option<&'a ServiceProvisioner>,
    handle: ContainerHandle,
}

impl ServiceGuard<'_> {
    /// Returns the guarded container handle.
    #[must_use]
    pub const fn handle(&self) -> &ContainerHandle {
        &self.handle
    }

    /// Tears the container down now, surfacing any teardown error.
    ///
    /// # Errors
    ///
    /// Returns [`ProvustError::Teardown`] if kill or remove failed.
    pub fn release(mut self) -> Result<()> {
        match self.provisioner.take() {
            Some(provisioner) => provisioner.deprovision(&self.handle),
            None => Ok(()),
        }
    }

    /// Disarms the guard and returns the handle, leaving the container
    /// running. The caller takes over teardown responsibility.
    #[must_use]
    pub fn detach(mut self) -> ContainerHandle {
        self.provisioner = None;
        self.handle.clone()
    }
}

impl Drop for ServiceGuard<'_> {
    fn drop(&mut self) {
        if let Some(provisioner) = self.provisioner.take() {
            if let Err(e) = provisioner.deprovision(&self.handle) {
                // Must not panic across the drop boundary.
                tracing::warn!(container = %self.handle.name, error = %e, "teardown failed");
            }
        }
    }
}
