//! # provust-sdk
//!
//! High-level API for integration-test suites.
//!
//! A [`BackingService`](service::BackingService) describes what to run; a
//! launch provisions the container, blocks until the service answers its
//! own protocol, and returns a [`ReadyService`](service::ReadyService)
//! whose connection parameters feed the clients under test. Teardown is
//! guaranteed on every exit path, including probe failures and panicking
//! test bodies.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use provust_common::config::ProvustConfig;
//! use provust_common::types::SessionId;
//! use provust_runtime::backend;
//! use provust_runtime::provisioner::ServiceProvisioner;
//! use provust_sdk::service::BackingService;
//!
//! # fn main() -> provust_common::error::Result<()> {
//! let config = ProvustConfig::from_env();
//! let provisioner = ServiceProvisioner::new(
//!     backend::detect_runtime(&config),
//!     SessionId::generate(),
//!     config,
//! );
//!
//! let redis = BackingService::redis().tag("7.2-alpine").launch(&provisioner)?;
//! // Hand these to the client under test.
//! let host = &redis.connection_params()["host"];
//! let port = &redis.connection_params()["port"];
//! println!("redis ready at {host}:{port}");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod service;
