//! Reconciliation core for the pushgateway operator.
//!
//! On every lifecycle event the host dispatcher assembles a
//! [`ReconcileContext`] from the declared integrations, local configuration
//! and the workload's observed state, and calls [`reconcile`]. The returned
//! [`ReconcileOutcome`] tells it what plan to apply (if any), what to
//! publish on the relation bus, and what status to report.

pub mod config;
pub mod context;
pub mod reconcile;
pub mod snapshot;
pub mod tls;
pub mod version;

pub use config::{GatewayConfig, LogLevel};
pub use context::{ApplyAction, ReconcileContext, ReconcileOutcome};
pub use reconcile::reconcile;
pub use snapshot::HostSnapshot;
pub use version::parse_version;
