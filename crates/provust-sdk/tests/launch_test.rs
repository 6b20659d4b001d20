//! End-to-end launch behavior against an in-memory runtime and a scripted
//! TCP listener standing in for the backing service.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::collections::HashSet;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use provust_common::config::ProvustConfig;
use provust_common::error::{ProvustError, Result};
use provust_common::types::{ContainerId, SessionId};
use provust_runtime::backend::{ContainerConfig, ContainerRuntime, InspectReport};
use provust_runtime::provisioner::ServiceProvisioner;
use provust_runtime::readiness::RetryBudget;
use provust_sdk::service::BackingService;

/// In-memory runtime whose containers "listen" on the loopback interface.
#[derive(Debug, Default)]
struct FakeRuntime {
    live: Mutex<HashSet<String>>,
}

impl FakeRuntime {
    fn live_containers(&self) -> HashSet<String> {
        self.live.lock().expect("live lock").clone()
    }
}

impl ContainerRuntime for FakeRuntime {
    fn pull(&self, _image: &str) -> Result<()> {
        Ok(())
    }

    fn create(&self, config: &ContainerConfig) -> Result<ContainerId> {
        let _ = self
            .live
            .lock()
            .expect("live lock")
            .insert(config.name.clone());
        Ok(ContainerId::new(format!("id-{}", config.name)))
    }

    fn start(&self, _id: &ContainerId) -> Result<()> {
        Ok(())
    }

    fn inspect(&self, _id: &ContainerId) -> Result<InspectReport> {
        Ok(InspectReport {
            address: "127.0.0.1".to_string(),
            running: true,
        })
    }

    fn kill(&self, _id: &ContainerId) -> Result<()> {
        Ok(())
    }

    fn remove(&self, id: &ContainerId) -> Result<()> {
        let name = id.as_str().trim_start_matches("id-").to_string();
        let _ = self.live.lock().expect("live lock").remove(&name);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Accepts connections until dropped, answering each with `reply`.
fn scripted_service(reply: &'static [u8]) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    let _ = std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut buf = [0_u8; 256];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(reply);
        }
    });
    port
}

fn provisioner(runtime: &Arc<FakeRuntime>) -> ServiceProvisioner {
    let runtime: Arc<dyn ContainerRuntime> = runtime.clone();
    ServiceProvisioner::new(runtime, SessionId::generate(), ProvustConfig::default())
}

#[test]
fn launch_yields_connection_params_once_the_service_answers() {
    let runtime = Arc::new(FakeRuntime::default());
    let p = provisioner(&runtime);
    let port = scripted_service(b"+OK\r\n");

    let redis = BackingService::redis()
        .port(port)
        .launch(&p)
        .expect("launch");

    let params = redis.connection_params();
    assert_eq!(params.get("host").map(String::as_str), Some("127.0.0.1"));
    assert_eq!(params.get("port").map(String::as_str), Some(&*port.to_string()));

    redis.shutdown().expect("shutdown");
    assert!(runtime.live_containers().is_empty());
}

#[test]
fn launch_tears_down_on_fatal_probe_failure() {
    let runtime = Arc::new(FakeRuntime::default());
    let p = provisioner(&runtime);
    // A service speaking the wrong protocol is a mismatch, not a timing gap.
    let port = scripted_service(b"HTTP/1.1 200 OK\r\n\r\n");

    let err = BackingService::redis()
        .port(port)
        .launch(&p)
        .err()
        .expect("launch must fail");

    assert!(matches!(err, ProvustError::Probe { .. }));
    assert!(runtime.live_containers().is_empty());
}

#[test]
fn launch_tears_down_when_the_service_never_listens() {
    let runtime = Arc::new(FakeRuntime::default());
    let p = provisioner(&runtime);
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };

    let err = BackingService::memcached()
        .port(port)
        .retry_budget(RetryBudget::new(3, Duration::from_millis(1)))
        .launch(&p)
        .err()
        .expect("launch must fail");

    match err {
        ProvustError::NotReady { service, attempts } => {
            assert_eq!(service, "memcached");
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(runtime.live_containers().is_empty());
}
