//! Lifecycle properties of the service provisioner, verified against a
//! recording in-memory runtime:
//! 1. Provision orders pull → create → start → inspect.
//! 2. Provision followed by deprovision leaves no container behind.
//! 3. Teardown still runs when the test body panics.
//! 4. Teardown is best-effort: a kill failure does not skip removal.
//! 5. Session identity keeps concurrent runs from colliding on names.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use provust_common::config::ProvustConfig;
use provust_common::error::{ProvustError, Result};
use provust_common::types::{ContainerId, ServiceKind, SessionId};
use provust_runtime::backend::{ContainerConfig, ContainerRuntime, InspectReport};
use provust_runtime::provisioner::{ServiceProvisioner, ServiceSpec, container_name};

/// In-memory runtime that records every operation it sees.
#[derive(Debug, Default)]
struct FakeRuntime {
    ops: Mutex<Vec<String>>,
    live: Mutex<HashSet<String>>,
    fail_kill: bool,
}

impl FakeRuntime {
    fn ops(&self) -> Vec<String> {
        self.ops.lock().expect("ops lock").clone()
    }

    fn live_containers(&self) -> HashSet<String> {
        self.live.lock().expect("live lock").clone()
    }

    fn record(&self, op: String) {
        self.ops.lock().expect("ops lock").push(op);
    }
}

impl ContainerRuntime for FakeRuntime {
    fn pull(&self, image: &str) -> Result<()> {
        self.record(format!("pull {image}"));
        Ok(())
    }

    fn create(&self, config: &ContainerConfig) -> Result<ContainerId> {
        self.record(format!("create {}", config.name));
        let _ = self
            .live
            .lock()
            .expect("live lock")
            .insert(config.name.clone());
        Ok(ContainerId::new(format!("id-{}", config.name)))
    }

    fn start(&self, id: &ContainerId) -> Result<()> {
        self.record(format!("start {id}"));
        Ok(())
    }

    fn inspect(&self, id: &ContainerId) -> Result<InspectReport> {
        self.record(format!("inspect {id}"));
        Ok(InspectReport {
            address: "10.5.0.2".to_string(),
            running: true,
        })
    }

    fn kill(&self, id: &ContainerId) -> Result<()> {
        self.record(format!("kill {id}"));
        if self.fail_kill {
            return Err(ProvustError::Environment {
                operation: "kill",
                service: id.to_string(),
                message: "no such process".to_string(),
            });
        }
        Ok(())
    }

    fn remove(&self, id: &ContainerId) -> Result<()> {
        self.record(format!("remove {id}"));
        let name = id.as_str().trim_start_matches("id-").to_string();
        let _ = self.live.lock().expect("live lock").remove(&name);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

fn provisioner(runtime: &Arc<FakeRuntime>, session: SessionId) -> ServiceProvisioner {
    let runtime: Arc<dyn ContainerRuntime> = runtime.clone();
    ServiceProvisioner::new(runtime, session, ProvustConfig::default())
}

#[test]
fn provision_orders_the_lifecycle() {
    let runtime = Arc::new(FakeRuntime::default());
    let p = provisioner(&runtime, SessionId::new("s-1"));

    let handle = p
        .provision(&ServiceSpec::new(ServiceKind::Redis, "latest"))
        .expect("provision");

    assert_eq!(handle.name, "redis-test-server-latest-s-1");
    assert_eq!(handle.address, "10.5.0.2");
    assert_eq!(handle.port, 6379);
    assert_eq!(
        runtime.ops(),
        vec![
            "pull redis:latest",
            "create redis-test-server-latest-s-1",
            "start id-redis-test-server-latest-s-1",
            "inspect id-redis-test-server-latest-s-1",
        ]
    );
}

#[test]
fn provision_respects_skip_pull() {
    let runtime = Arc::new(FakeRuntime::default());
    let runtime_dyn: Arc<dyn ContainerRuntime> = runtime.clone();
    let p = ServiceProvisioner::new(
        runtime_dyn,
        SessionId::new("s-1"),
        ProvustConfig {
            skip_pull: true,
            ..ProvustConfig::default()
        },
    );

    let _handle = p
        .provision(&ServiceSpec::new(ServiceKind::Memcached, "latest"))
        .expect("provision");

    assert!(runtime.ops().iter().all(|op| !op.starts_with("pull")));
}

#[test]
fn provision_then_deprovision_leaves_no_container() {
    let runtime = Arc::new(FakeRuntime::default());
    let p = provisioner(&runtime, SessionId::generate());

    let handle = p
        .provision(&ServiceSpec::new(ServiceKind::Redis, "latest"))
        .expect("provision");
    p.deprovision(&handle).expect("deprovision");

    assert!(runtime.live_containers().is_empty());
    let ops = runtime.ops();
    let teardown: Vec<String> = ops[ops.len() - 2..].to_vec();
    assert_eq!(
        teardown,
        vec![
            format!("kill {}", handle.id),
            format!("remove {}", handle.id),
        ]
    );
}

#[test]
fn guard_deprovisions_when_the_test_body_panics() {
    let runtime = Arc::new(FakeRuntime::default());
    let p = provisioner(&runtime, SessionId::generate());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let guard = p
            .provision_scoped(&ServiceSpec::new(ServiceKind::Memcached, "latest"))
            .expect("provision");
        assert_eq!(guard.handle().port, 11211);
        panic!("test body failed");
    }));

    assert!(result.is_err());
    assert!(runtime.live_containers().is_empty());
    assert!(runtime.ops().iter().any(|op| op.starts_with("kill")));
    assert!(runtime.ops().iter().any(|op| op.starts_with("remove")));
}

#[test]
fn guard_release_tears_down_exactly_once() {
    let runtime = Arc::new(FakeRuntime::default());
    let p = provisioner(&runtime, SessionId::generate());

    let guard = p
        .provision_scoped(&ServiceSpec::new(ServiceKind::Redis, "latest"))
        .expect("provision");
    guard.release().expect("release");

    let kills = runtime
        .ops()
        .iter()
        .filter(|op| op.starts_with("kill"))
        .count();
    assert_eq!(kills, 1);
    assert!(runtime.live_containers().is_empty());
}

#[test]
fn guard_detach_leaves_the_container_running() {
    let runtime = Arc::new(FakeRuntime::default());
    let p = provisioner(&runtime, SessionId::generate());

    let guard = p
        .provision_scoped(&ServiceSpec::new(ServiceKind::Redis, "latest"))
        .expect("provision");
    let handle = guard.detach();

    assert_eq!(runtime.live_containers().len(), 1);
    assert!(runtime.ops().iter().all(|op| !op.starts_with("kill")));

    p.deprovision(&handle).expect("deprovision");
    assert!(runtime.live_containers().is_empty());
}

#[test]
fn deprovision_is_best_effort_when_kill_fails() {
    let runtime = Arc::new(FakeRuntime {
        fail_kill: true,
        ..FakeRuntime::default()
    });
    let p = provisioner(&runtime, SessionId::generate());

    let handle = p
        .provision(&ServiceSpec::new(ServiceKind::Redis, "latest"))
        .expect("provision");
    let err = p.deprovision(&handle).expect_err("kill failure surfaces");

    assert!(matches!(err, ProvustError::Teardown { .. }));
    // Removal was still attempted and succeeded.
    assert!(runtime.live_containers().is_empty());
}

#[test]
fn sessions_namespace_container_names() {
    let a = SessionId::generate();
    let b = SessionId::generate();
    assert_ne!(
        container_name(ServiceKind::Redis, "latest", &a),
        container_name(ServiceKind::Redis, "latest", &b),
    );
}
