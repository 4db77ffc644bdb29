//! Local configuration handling.
//!
//! Options arrive from the host as an opaque string map; anything outside
//! the accepted set is a ConfigurationError and blocks until corrected.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use operator_shared_types::{OperatorError, Result};

/// Verbosity accepted by the pushgateway binary's `--log.level` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            // "warning" is what operators coming from other stacks reach for
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(OperatorError::Configuration(format!(
                "unknown log level `{}`, expected one of `debug`, `info`, `warn`, `error`",
                other
            ))),
        }
    }
}

/// The recognized local configuration options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Verbosity of the managed process.
    pub log_level: LogLevel,
    /// Path prefix the workload must answer under when behind ingress.
    /// Overrides the ingress-derived prefix when set.
    pub web_route_prefix: Option<String>,
    /// Defer startup until certificate material has arrived.
    pub require_tls: bool,
}

impl GatewayConfig {
    pub const LOG_LEVEL: &'static str = "log-level";
    pub const WEB_ROUTE_PREFIX: &'static str = "web-route-prefix";
    pub const REQUIRE_TLS: &'static str = "require-tls";

    /// Parse the host-supplied option map, rejecting unknown keys and
    /// out-of-set values.
    pub fn from_options(options: &BTreeMap<String, String>) -> Result<Self> {
        let mut config = Self::default();
        for (key, value) in options {
            match key.as_str() {
                Self::LOG_LEVEL => config.log_level = value.parse()?,
                Self::WEB_ROUTE_PREFIX => {
                    config.web_route_prefix = parse_route_prefix(value)?;
                }
                Self::REQUIRE_TLS => {
                    config.require_tls = value.parse().map_err(|_| {
                        OperatorError::Configuration(format!(
                            "option `{}` must be `true` or `false`, got `{}`",
                            Self::REQUIRE_TLS,
                            value
                        ))
                    })?;
                }
                other => {
                    return Err(OperatorError::Configuration(format!(
                        "unknown option `{}`",
                        other
                    )));
                }
            }
        }
        Ok(config)
    }
}

fn parse_route_prefix(value: &str) -> Result<Option<String>> {
    if value.is_empty() {
        return Ok(None);
    }
    if !value.starts_with('/') {
        return Err(OperatorError::Configuration(format!(
            "route prefix `{}` must start with `/`",
            value
        )));
    }
    Ok(Some(value.trim_end_matches('/').to_string()))
}
