//! TLS material layout and web-config generation.
//!
//! pushgateway takes its TLS settings from a web configuration file passed
//! via `--web.config.file`; the operator writes that file plus the PEM
//! material it references into the container.

use std::collections::BTreeMap;

use relation_interface::CertificatesData;

/// Web configuration file consumed by `--web.config.file`.
pub const WEB_CONFIG_PATH: &str = "/etc/pushgateway/web-config.yml";

pub const SERVER_CERT_PATH: &str = "/etc/pushgateway/tls/server.crt";
pub const PRIVATE_KEY_PATH: &str = "/etc/pushgateway/tls/server.key";
pub const CA_CERT_PATH: &str = "/etc/pushgateway/tls/ca.crt";

/// Render the web configuration enabling TLS on the listen socket.
pub fn web_config() -> String {
    format!(
        "tls_server_config:\n  cert_file: {}\n  key_file: {}\n",
        SERVER_CERT_PATH, PRIVATE_KEY_PATH
    )
}

/// File layout for a TLS-enabled workload, path to contents.
pub fn tls_files(certs: &CertificatesData) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    files.insert(WEB_CONFIG_PATH.to_string(), web_config());
    files.insert(SERVER_CERT_PATH.to_string(), certs.server_cert.clone());
    files.insert(PRIVATE_KEY_PATH.to_string(), certs.private_key.clone());
    files.insert(CA_CERT_PATH.to_string(), certs.ca_cert.clone());
    files
}
