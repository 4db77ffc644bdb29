//! Workload runtime implementations for the pushgateway operator.
//!
//! This crate provides implementations of the `WorkloadRuntime` trait:
//! - `MockWorkload`: in-memory runtime for tests and the demo harness
//!   (default `mock-runtime` feature)
//!
//! The real container runtime is supplied by the host orchestration layer
//! and lives outside this repository.

#[cfg(feature = "mock-runtime")]
pub mod mock;

// Re-export common types
pub use workload_interface::{ApplyOutcome, WorkloadPlan, WorkloadRuntime};

#[cfg(feature = "mock-runtime")]
pub use mock::MockWorkload;
