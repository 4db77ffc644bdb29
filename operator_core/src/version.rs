//! Workload version extraction.

/// Extract the bare version from the pushgateway `--version` banner.
///
/// The banner looks like:
///
/// ```text
/// pushgateway, version 1.5.1 (branch: HEAD, revision: 7afc96cfc3b20e56968ff30eea22b70e)
///   build user:       root@fc81889ee1a6
///   ...
/// ```
pub fn parse_version(banner: &str) -> Option<&str> {
    let rest = banner.strip_prefix("pushgateway, version ")?;
    let version = rest.split_whitespace().next()?;
    if version.is_empty() {
        return None;
    }
    Some(version)
}
