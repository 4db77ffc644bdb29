//! In-memory workload runtime for tests and the demo harness.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use operator_shared_types::{OperatorError, Result};
use workload_interface::{ApplyOutcome, WorkloadPlan, WorkloadRuntime};

/// Canned `--version` banner, matching the upstream binary's output shape.
const VERSION_BANNER: &str =
    "pushgateway, version 1.5.1 (branch: HEAD, revision: 7afc96cfc3b20e56968ff30eea22b70e)";

#[derive(Debug, Default)]
struct MockState {
    connectable: bool,
    applied: Option<WorkloadPlan>,
    restarts: Vec<Uuid>,
}

/// In-memory stand-in for the host's container runtime.
///
/// Records every applied plan and hands out a change id per restart, so
/// tests can assert on idempotence without a real container.
#[derive(Debug, Default)]
pub struct MockWorkload {
    state: Arc<RwLock<MockState>>,
}

impl MockWorkload {
    /// A reachable workload with nothing applied yet.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState {
                connectable: true,
                ..Default::default()
            })),
        }
    }

    /// A workload whose control plane is not up yet.
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub async fn set_connectable(&self, connectable: bool) {
        self.state.write().await.connectable = connectable;
    }

    /// Number of restarts performed so far.
    pub async fn restart_count(&self) -> usize {
        self.state.read().await.restarts.len()
    }

    /// The plan currently applied, bypassing the trait's error handling.
    pub async fn applied(&self) -> Option<WorkloadPlan> {
        self.state.read().await.applied.clone()
    }
}

#[async_trait]
impl WorkloadRuntime for MockWorkload {
    async fn can_connect(&self) -> bool {
        self.state.read().await.connectable
    }

    async fn observed(&self) -> Result<Option<WorkloadPlan>> {
        let state = self.state.read().await;
        if !state.connectable {
            return Err(OperatorError::Runtime(
                "workload container is not reachable".to_string(),
            ));
        }
        Ok(state.applied.clone())
    }

    async fn apply(&self, plan: &WorkloadPlan) -> Result<ApplyOutcome> {
        let mut state = self.state.write().await;
        if !state.connectable {
            return Err(OperatorError::Runtime(
                "workload container is not reachable".to_string(),
            ));
        }

        if state.applied.as_ref() == Some(plan) {
            debug!("plan unchanged, not restarting");
            return Ok(ApplyOutcome::Unchanged);
        }

        let change_id = Uuid::new_v4();
        state.applied = Some(plan.clone());
        state.restarts.push(change_id);
        info!(%change_id, command = %plan.command_line(), "workload (re)started");
        Ok(ApplyOutcome::Restarted { change_id })
    }

    async fn version_banner(&self) -> Result<Option<String>> {
        let state = self.state.read().await;
        if !state.connectable {
            return Ok(None);
        }
        Ok(Some(VERSION_BANNER.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(args: &[&str]) -> WorkloadPlan {
        WorkloadPlan {
            command: args.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn apply_is_idempotent() {
        let workload = MockWorkload::new();
        let p = plan(&["/bin/pushgateway", "--persistence.file=/data/metrics"]);

        let first = workload.apply(&p).await.unwrap();
        assert!(matches!(first, ApplyOutcome::Restarted { .. }));

        let second = workload.apply(&p).await.unwrap();
        assert_eq!(second, ApplyOutcome::Unchanged);
        assert_eq!(workload.restart_count().await, 1);
    }

    #[tokio::test]
    async fn changed_plan_restarts() {
        let workload = MockWorkload::new();
        workload
            .apply(&plan(&["/bin/pushgateway"]))
            .await
            .unwrap();
        workload
            .apply(&plan(&["/bin/pushgateway", "--log.level=debug"]))
            .await
            .unwrap();
        assert_eq!(workload.restart_count().await, 2);
    }

    #[tokio::test]
    async fn unreachable_workload_rejects_apply() {
        let workload = MockWorkload::unreachable();
        assert!(!workload.can_connect().await);
        assert!(workload.apply(&plan(&["/bin/pushgateway"])).await.is_err());
        assert!(workload.observed().await.is_err());
        assert_eq!(workload.version_banner().await.unwrap(), None);

        workload.set_connectable(true).await;
        assert!(workload.can_connect().await);
        assert_eq!(workload.observed().await.unwrap(), None);
    }

    #[tokio::test]
    async fn version_banner_has_expected_shape() {
        let workload = MockWorkload::new();
        let banner = workload.version_banner().await.unwrap().unwrap();
        assert!(banner.starts_with("pushgateway, version "));
    }
}
