//! Relation-bus boundary for the pushgateway operator.
//!
//! The host runtime owns the bus: records are created when a relation is
//! formed, updated on either side's change, and destroyed with the relation.
//! The operator only reads inbound records and overwrites its own outbound
//! records in full on every reconciliation.

#[cfg(feature = "in-memory")]
pub mod memory;
pub mod record;
pub mod views;

#[cfg(feature = "in-memory")]
pub use memory::MemoryBus;
pub use record::{IntegrationKind, IntegrationRecord, IntegrationSnapshot};
pub use views::{CertificatesData, IngressData, LogTarget, PeerSet};

use async_trait::async_trait;

use operator_shared_types::Result;

/// Access to the host-mediated relation data bus.
///
/// Implementations are supplied by the host adapter; the reconciler itself
/// never touches the bus directly and stays pure.
#[async_trait]
pub trait RelationBus: Send + Sync {
    /// All inbound records currently declared for a kind, one per related
    /// component. Empty when no relation of that kind exists yet.
    async fn inbound(&self, kind: IntegrationKind) -> Result<Vec<IntegrationRecord>>;

    /// Overwrite this side's outbound record for a kind in full.
    async fn publish(&self, kind: IntegrationKind, record: IntegrationRecord) -> Result<()>;
}
