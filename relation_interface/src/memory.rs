//! In-memory relation bus for tests and the demo harness.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use operator_shared_types::Result;

use crate::record::{IntegrationKind, IntegrationRecord, IntegrationSnapshot};
use crate::RelationBus;

/// Relation bus backed by a captured snapshot.
///
/// Inbound reads serve the snapshot; outbound publishes land in a map,
/// each overwriting the previous record for its kind in full.
#[derive(Debug, Default)]
pub struct MemoryBus {
    inbound: IntegrationSnapshot,
    published: Arc<RwLock<BTreeMap<IntegrationKind, IntegrationRecord>>>,
}

impl MemoryBus {
    pub fn new(inbound: IntegrationSnapshot) -> Self {
        Self {
            inbound,
            published: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// The last record published for a kind, if any.
    pub async fn published(&self, kind: IntegrationKind) -> Option<IntegrationRecord> {
        self.published.read().await.get(&kind).cloned()
    }

    /// Kinds published so far, in stable order.
    pub async fn published_kinds(&self) -> Vec<IntegrationKind> {
        self.published.read().await.keys().copied().collect()
    }
}

#[async_trait]
impl RelationBus for MemoryBus {
    async fn inbound(&self, kind: IntegrationKind) -> Result<Vec<IntegrationRecord>> {
        Ok(self.inbound.of(kind).to_vec())
    }

    async fn publish(&self, kind: IntegrationKind, record: IntegrationRecord) -> Result<()> {
        self.published.write().await.insert(kind, record);
        Ok(())
    }
}
