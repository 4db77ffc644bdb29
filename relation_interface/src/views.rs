//! Typed views over inbound integration records.
//!
//! Each view returns `None` while the related component has not yet filled
//! in its side of the record; a formed-but-empty relation is indistinguishable
//! from a pending one at this layer.

use crate::record::IntegrationRecord;

/// Certificate material delivered over the `certificates` integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatesData {
    pub ca_cert: String,
    pub server_cert: String,
    pub private_key: String,
}

impl CertificatesData {
    pub const CA_CERT_KEY: &'static str = "ca-cert";
    pub const SERVER_CERT_KEY: &'static str = "server-cert";
    pub const PRIVATE_KEY_KEY: &'static str = "private-key";

    pub fn from_record(record: &IntegrationRecord) -> Option<Self> {
        Some(Self {
            ca_cert: record.get(Self::CA_CERT_KEY)?.to_string(),
            server_cert: record.get(Self::SERVER_CERT_KEY)?.to_string(),
            private_key: record.get(Self::PRIVATE_KEY_KEY)?.to_string(),
        })
    }
}

/// Externally visible URL delivered over the `ingress` integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressData {
    pub url: String,
}

impl IngressData {
    pub const URL_KEY: &'static str = "url";

    pub fn from_record(record: &IntegrationRecord) -> Option<Self> {
        let url = record.get(Self::URL_KEY)?;
        if url.is_empty() {
            return None;
        }
        Some(Self {
            url: url.to_string(),
        })
    }

    /// Path component of the external URL, the route prefix the workload
    /// must answer under when behind the ingress.
    pub fn path(&self) -> Option<&str> {
        let after_scheme = match self.url.find("://") {
            Some(idx) => &self.url[idx + 3..],
            None => self.url.as_str(),
        };
        match after_scheme.find('/') {
            Some(idx) if idx + 1 < after_scheme.len() => Some(&after_scheme[idx..]),
            _ => None,
        }
    }
}

/// One log-shipping endpoint delivered over the `log-proxy` integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    /// Label under which the target is configured on the workload.
    pub label: String,
    pub url: String,
}

impl LogTarget {
    pub const URL_KEY: &'static str = "url";
    pub const NAME_KEY: &'static str = "name";

    pub fn from_record(record: &IntegrationRecord) -> Option<Self> {
        let url = record.get(Self::URL_KEY)?;
        if url.is_empty() {
            return None;
        }
        let label = record.get(Self::NAME_KEY).unwrap_or("log-proxy");
        Some(Self {
            label: label.to_string(),
            url: url.to_string(),
        })
    }
}

/// Identities of co-located replica units, from the peer integration.
///
/// Only consulted to reason about single-writer actions; the election
/// itself is the host's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerSet {
    units: Vec<String>,
}

impl PeerSet {
    pub const UNIT_KEY: &'static str = "unit";

    pub fn from_records(records: &[IntegrationRecord]) -> Self {
        let mut units: Vec<String> = records
            .iter()
            .filter_map(|r| r.get(Self::UNIT_KEY))
            .map(str::to_string)
            .collect();
        units.sort();
        units.dedup();
        Self { units }
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificates_view_requires_all_keys() {
        let partial = IntegrationRecord::new().with(CertificatesData::CA_CERT_KEY, "CA PEM");
        assert!(CertificatesData::from_record(&partial).is_none());

        let complete = partial
            .with(CertificatesData::SERVER_CERT_KEY, "CERT PEM")
            .with(CertificatesData::PRIVATE_KEY_KEY, "KEY PEM");
        let data = CertificatesData::from_record(&complete).unwrap();
        assert_eq!(data.ca_cert, "CA PEM");
        assert_eq!(data.private_key, "KEY PEM");
    }

    #[test]
    fn ingress_path_extraction() {
        let data = IngressData {
            url: "https://example/pg".to_string(),
        };
        assert_eq!(data.path(), Some("/pg"));

        let bare = IngressData {
            url: "https://example".to_string(),
        };
        assert_eq!(bare.path(), None);

        let root = IngressData {
            url: "https://example/".to_string(),
        };
        assert_eq!(root.path(), None);

        let nested = IngressData {
            url: "https://example/model-pushgateway-k8s".to_string(),
        };
        assert_eq!(nested.path(), Some("/model-pushgateway-k8s"));
    }

    #[test]
    fn ingress_view_rejects_empty_url() {
        let record = IntegrationRecord::new().with(IngressData::URL_KEY, "");
        assert!(IngressData::from_record(&record).is_none());
    }

    #[test]
    fn log_target_defaults_label() {
        let record = IntegrationRecord::new().with(LogTarget::URL_KEY, "http://loki:3100/push");
        let target = LogTarget::from_record(&record).unwrap();
        assert_eq!(target.label, "log-proxy");

        let named = IntegrationRecord::new()
            .with(LogTarget::URL_KEY, "http://loki:3100/push")
            .with(LogTarget::NAME_KEY, "loki/0");
        assert_eq!(LogTarget::from_record(&named).unwrap().label, "loki/0");
    }

    #[test]
    fn peer_set_sorts_and_dedupes() {
        let records = vec![
            IntegrationRecord::new().with(PeerSet::UNIT_KEY, "pushgateway-k8s/2"),
            IntegrationRecord::new().with(PeerSet::UNIT_KEY, "pushgateway-k8s/0"),
            IntegrationRecord::new().with(PeerSet::UNIT_KEY, "pushgateway-k8s/2"),
        ];
        let peers = PeerSet::from_records(&records);
        assert_eq!(
            peers.units(),
            &["pushgateway-k8s/0".to_string(), "pushgateway-k8s/2".to_string()]
        );
        assert_eq!(peers.len(), 2);
    }
}
