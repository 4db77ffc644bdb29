//! Observability for the pushgateway operator.
//!
//! Structured logging only: the managed pushgateway container is itself the
//! metrics surface of this deployment, so the operator carries no exporter
//! or health server of its own.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, InitError, TracingConfig};

/// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level};
