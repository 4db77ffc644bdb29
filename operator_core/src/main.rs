// Pushgateway operator demo harness.
//
// Loads a captured host-state snapshot, runs one reconciliation against the
// in-memory workload runtime and relation bus, applies the result, and
// prints the outcome as JSON. The real deployment wires `reconcile` into
// the host's lifecycle dispatcher instead.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::{info, warn};

use observability::{init_tracing, TracingConfig};
use operator_core::version::parse_version;
use operator_core::{reconcile, ApplyAction, HostSnapshot};
use operator_shared_types::APP_NAME;
use relation_interface::{IntegrationKind, MemoryBus, PeerSet, RelationBus};
use workload_interface::{ApplyOutcome, WorkloadRuntime};
use workload_runtime::MockWorkload;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(&TracingConfig::from_env())?;

    let path = std::env::args()
        .nth(1)
        .context("usage: pushgateway-operator <snapshot.json>")?;
    let snapshot = HostSnapshot::from_path(Path::new(&path))
        .with_context(|| format!("loading host snapshot from {}", path))?;
    info!(service = APP_NAME, unit = %snapshot.unit.unit_name, "reconciling");

    let bus = MemoryBus::new(snapshot.integrations.clone());
    let runtime: Arc<dyn WorkloadRuntime> = Arc::new(MockWorkload::new());

    let peers = PeerSet::from_records(&bus.inbound(IntegrationKind::PushgatewayPeers).await?);
    if !peers.is_empty() {
        info!(peers = peers.len(), leader = snapshot.leader, "co-located replica units");
    }

    let observed = if runtime.can_connect().await {
        runtime.observed().await?
    } else {
        None
    };

    let ctx = snapshot.into_context(observed);
    let outcome = reconcile(&ctx);

    if let (ApplyAction::Restart, Some(plan)) = (outcome.apply, &outcome.desired) {
        match runtime.apply(plan).await? {
            ApplyOutcome::Restarted { change_id } => {
                info!(%change_id, "workload configuration applied");
            }
            ApplyOutcome::Unchanged => {}
        }
    }

    for (kind, record) in &outcome.outbound {
        bus.publish(*kind, record.clone()).await?;
        info!(kind = %kind, "outbound integration data published");
    }

    match runtime.version_banner().await? {
        Some(banner) => match parse_version(&banner) {
            Some(version) => info!(version, "workload version"),
            None => warn!("could not parse workload version banner"),
        },
        None => warn!("workload version not available yet"),
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
