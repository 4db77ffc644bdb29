//! Integration records and the per-event snapshot.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The integration kinds this operator exchanges data over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum IntegrationKind {
    /// Outbound: where Prometheus should scrape this unit.
    MetricsEndpoint,
    /// Outbound: where clients should push metric samples.
    PushEndpoint,
    /// Outbound: service descriptor for the catalogue.
    Catalogue,
    /// Inbound: CA cert, server cert and private key.
    Certificates,
    /// Inbound: externally visible URL.
    Ingress,
    /// Inbound: log-shipping endpoints.
    LogProxy,
    /// Peer: identities of co-located replica units.
    PushgatewayPeers,
}

impl IntegrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationKind::MetricsEndpoint => "metrics-endpoint",
            IntegrationKind::PushEndpoint => "push-endpoint",
            IntegrationKind::Catalogue => "catalogue",
            IntegrationKind::Certificates => "certificates",
            IntegrationKind::Ingress => "ingress",
            IntegrationKind::LogProxy => "log-proxy",
            IntegrationKind::PushgatewayPeers => "pushgateway-peers",
        }
    }

    /// Whether this side only ever reads records of this kind.
    pub fn is_inbound(&self) -> bool {
        matches!(
            self,
            IntegrationKind::Certificates
                | IntegrationKind::Ingress
                | IntegrationKind::LogProxy
                | IntegrationKind::PushgatewayPeers
        )
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key-value mapping exchanged over the relation bus.
///
/// Keys are ordered so that serialized records, and anything derived from
/// them, are deterministic across reconciliations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrationRecord(BTreeMap<String, String>);

impl IntegrationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, for assembling outbound records.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Everything declared on the bus at the moment a lifecycle event fires.
///
/// Read once per event by the host adapter and handed to the reconciler,
/// which treats it as immutable input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrationSnapshot {
    records: BTreeMap<IntegrationKind, Vec<IntegrationRecord>>,
}

impl IntegrationSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: IntegrationKind, record: IntegrationRecord) {
        self.records.entry(kind).or_default().push(record);
    }

    /// Records declared for a kind; empty when no relation exists.
    pub fn of(&self, kind: IntegrationKind) -> &[IntegrationRecord] {
        self.records.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(Vec::is_empty)
    }
}
