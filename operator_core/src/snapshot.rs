//! Host-state snapshots for the demo harness and tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use operator_shared_types::{Result, UnitInfo};
use relation_interface::IntegrationSnapshot;
use workload_interface::WorkloadPlan;

use crate::context::ReconcileContext;

fn default_true() -> bool {
    true
}

/// Everything the host hands the operator for one lifecycle event, in a
/// form that can be captured to a JSON file and replayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub unit: UnitInfo,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub integrations: IntegrationSnapshot,
    #[serde(default)]
    pub leader: bool,
    #[serde(default = "default_true")]
    pub workload_reachable: bool,
}

impl HostSnapshot {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Combine the snapshot with the runtime's observed plan into a
    /// reconciliation context.
    pub fn into_context(self, observed: Option<WorkloadPlan>) -> ReconcileContext {
        ReconcileContext {
            unit: self.unit,
            options: self.options,
            integrations: self.integrations,
            leader: self.leader,
            workload_reachable: self.workload_reachable,
            observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn loads_minimal_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "unit": {{
                    "app_name": "pushgateway-k8s",
                    "unit_name": "pushgateway-k8s/0",
                    "address": "10.1.38.86"
                }},
                "leader": true
            }}"#
        )
        .unwrap();

        let snapshot = HostSnapshot::from_path(file.path()).unwrap();
        assert!(snapshot.leader);
        assert!(snapshot.workload_reachable);
        assert!(snapshot.options.is_empty());
        assert!(snapshot.integrations.is_empty());

        let ctx = snapshot.into_context(None);
        assert_eq!(ctx.unit.address, "10.1.38.86");
        assert_eq!(ctx.observed, None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = HostSnapshot::from_path(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, operator_shared_types::OperatorError::Io(_)));
    }

    #[test]
    fn malformed_snapshot_is_a_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = HostSnapshot::from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            operator_shared_types::OperatorError::Json(_)
        ));
    }
}
