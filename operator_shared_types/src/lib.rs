//! Shared types for the pushgateway operator workspace.
//!
//! Everything here is host-facing vocabulary: unit identity, the status
//! surface reported back to the host runtime, and the workspace error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the managed service inside the workload container.
pub const APP_NAME: &str = "pushgateway";

/// Port the pushgateway binary listens on.
pub const HTTP_LISTEN_PORT: u16 = 9091;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, OperatorError>;

/// Errors surfaced by the operator.
///
/// `Configuration` is terminal until an operator corrects the offending
/// option; `DependencyPending` clears on its own once the missing
/// integration or workload shows up.
#[derive(Debug, Error)]
pub enum OperatorError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("dependency not ready: {0}")]
    DependencyPending(String),

    #[error("workload runtime error: {0}")]
    Runtime(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identity and addressing of this unit, as supplied by the host runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInfo {
    /// Application name (e.g. "pushgateway-k8s").
    pub app_name: String,
    /// Unit name (e.g. "pushgateway-k8s/0").
    pub unit_name: String,
    /// In-cluster address at which this unit is routable.
    pub address: String,
}

impl UnitInfo {
    /// URL at which the workload is reachable inside the cluster.
    pub fn internal_url(&self, scheme: &str, port: u16) -> String {
        format!("{}://{}:{}/", scheme, self.address, port)
    }
}

/// Coarse unit status reported to the host after every reconciliation.
///
/// Recomputed from scratch each pass; there is no stored transition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum UnitStatus {
    /// A mandatory dependency has not arrived yet; resolves on its own.
    Waiting(String),
    /// Operator intervention required, never retried automatically.
    Blocked(String),
    /// An apply is in flight.
    Maintenance(String),
    /// Observed configuration matches desired and the workload is up.
    Active,
}

impl UnitStatus {
    pub fn state_name(&self) -> &'static str {
        match self {
            UnitStatus::Waiting(_) => "waiting",
            UnitStatus::Blocked(_) => "blocked",
            UnitStatus::Maintenance(_) => "maintenance",
            UnitStatus::Active => "active",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            UnitStatus::Waiting(msg)
            | UnitStatus::Blocked(msg)
            | UnitStatus::Maintenance(msg) => msg,
            UnitStatus::Active => "",
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message().is_empty() {
            write!(f, "{}", self.state_name())
        } else {
            write!(f, "{}: {}", self.state_name(), self.message())
        }
    }
}
