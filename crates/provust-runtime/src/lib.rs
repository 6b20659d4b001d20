//! Ephemeral backing-service lifecycle for the Provust provisioner.
//!
//! Provisioning, readiness probing, and teardown are synchronous blocking
//! steps; only the per-test [`context::ExecutionScope`] runs async work.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod backend;
pub mod context;
pub mod provisioner;
pub mod readiness;
