//! Managed-container boundary for the pushgateway operator.
//!
//! The reconciler computes a [`WorkloadPlan`]; applying it to the real
//! container is the host dispatcher's job, through whatever
//! [`WorkloadRuntime`] implementation it wires in.

use std::collections::BTreeMap;

use async_trait::async_trait;
use downcast_rs::{impl_downcast, DowncastSync};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use operator_shared_types::Result;

/// Path under which pushed metrics are persisted inside the container.
///
/// Backed by a mounted volume so metrics survive restarts. This is a
/// non-configurable policy of the operator.
pub const METRICS_PERSISTENCE_PATH: &str = "/data/metrics";

/// The full configuration the managed container should be running with.
///
/// A pure function of the declared integrations and local configuration,
/// recomputed every reconciliation; equality against the observed plan is
/// the idempotence gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadPlan {
    /// argv for the pushgateway process, binary first.
    pub command: Vec<String>,
    /// Files to place into the container, path to contents.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    /// Log-shipping targets, label to endpoint URL.
    #[serde(default)]
    pub log_targets: BTreeMap<String, String>,
}

impl WorkloadPlan {
    /// The command line as a single string, for logging and summaries.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// Whether the plan carries a given flag (prefix match on `--flag=`).
    pub fn has_flag(&self, flag: &str) -> bool {
        let prefix = format!("{}=", flag);
        self.command
            .iter()
            .any(|arg| arg == flag || arg.starts_with(&prefix))
    }
}

/// Result of an idempotent apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The plan differed; the service was (re)started under a new change id.
    Restarted { change_id: Uuid },
    /// The observed plan already matched; nothing was done.
    Unchanged,
}

/// Boundary to the orchestration runtime managing the workload container.
///
/// Downcast support lets tests and the demo harness reach implementation
/// state through `dyn WorkloadRuntime`.
#[async_trait]
pub trait WorkloadRuntime: DowncastSync {
    /// Whether the container's control plane is reachable yet.
    async fn can_connect(&self) -> bool;

    /// The plan currently applied to the container, if it was ever started.
    /// Used only for the idempotence comparison.
    async fn observed(&self) -> Result<Option<WorkloadPlan>>;

    /// Idempotently apply a plan, restarting the service only on change.
    async fn apply(&self, plan: &WorkloadPlan) -> Result<ApplyOutcome>;

    /// Raw `--version` banner of the workload binary, when obtainable.
    async fn version_banner(&self) -> Result<Option<String>>;
}

impl_downcast!(sync WorkloadRuntime);
