//! Tracing initialisation.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Raised when a global subscriber is already installed.
#[derive(Debug, Error)]
#[error("failed to initialise tracing: {0}")]
pub struct InitError(String);

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub default_directive: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    /// Pick up `LOG_FORMAT=json` from the environment.
    pub fn from_env() -> Self {
        let json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self {
            json,
            ..Default::default()
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured default directive.
pub fn init_tracing(config: &TracingConfig) -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| InitError(e.to_string()))
}
