//! Inputs and outputs of one reconciliation pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use operator_shared_types::{UnitInfo, UnitStatus};
use relation_interface::{IntegrationKind, IntegrationRecord, IntegrationSnapshot};
use workload_interface::WorkloadPlan;

/// Everything the host hands the operator for one lifecycle event.
///
/// Host facilities are injected here rather than reached for as globals,
/// so `reconcile` stays a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct ReconcileContext {
    /// This unit's identity and in-cluster address.
    pub unit: UnitInfo,
    /// Raw local configuration options.
    pub options: BTreeMap<String, String>,
    /// Inbound integration records, per kind.
    pub integrations: IntegrationSnapshot,
    /// Whether this unit holds the single-writer capability.
    pub leader: bool,
    /// Whether the workload container's control plane is reachable.
    pub workload_reachable: bool,
    /// Plan currently applied to the container; `None` = not yet started.
    pub observed: Option<WorkloadPlan>,
}

/// What the dispatcher must do with the container after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyAction {
    /// Observed already matches desired; leave the container alone.
    None,
    /// Apply the desired plan and (re)start the service.
    Restart,
}

/// The reconciler's verdict for one lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileOutcome {
    /// The configuration the container should be running with.
    /// Absent while a mandatory dependency is missing.
    pub desired: Option<WorkloadPlan>,
    pub apply: ApplyAction,
    /// Outbound records to overwrite on the bus, in full.
    pub outbound: Vec<(IntegrationKind, IntegrationRecord)>,
    pub status: UnitStatus,
}

impl ReconcileOutcome {
    pub(crate) fn waiting(message: impl Into<String>) -> Self {
        Self {
            desired: None,
            apply: ApplyAction::None,
            outbound: Vec::new(),
            status: UnitStatus::Waiting(message.into()),
        }
    }

    pub(crate) fn blocked(message: impl Into<String>) -> Self {
        Self {
            desired: None,
            apply: ApplyAction::None,
            outbound: Vec::new(),
            status: UnitStatus::Blocked(message.into()),
        }
    }

    /// The outbound record for a kind, when one was produced this pass.
    pub fn outbound_record(&self, kind: IntegrationKind) -> Option<&IntegrationRecord> {
        self.outbound
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, record)| record)
    }
}
