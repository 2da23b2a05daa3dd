//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default latency above which a successful probe is reported as degraded.
pub const DEFAULT_DEGRADATION_THRESHOLD_MS: i64 = 1000;

/// Default hard timeout for a single probe request.
pub const DEFAULT_CANCELLATION_THRESHOLD_MS: i64 = 2000;

/// Root configuration for the `http-probe` binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// The dependency to probe.
    pub probe: ProbeConfig,

    /// Settings for the underlying HTTP client.
    pub client: ClientConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single HTTP probe targeting one dependency.
///
/// Thresholds are signed so that a negative value in a config file is
/// reported by validation instead of being rejected by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Label identifying the checked dependency (e.g. "auth-service").
    #[serde(default)]
    pub description: String,

    /// Target URL for the GET request.
    #[serde(default)]
    pub url: String,

    /// Elapsed time beyond this (with a 2xx response) yields Degraded.
    #[serde(default = "default_degradation_threshold_ms")]
    pub degradation_threshold_ms: i64,

    /// Request timeout; exceeding it aborts the request.
    #[serde(default = "default_cancellation_threshold_ms")]
    pub cancellation_threshold_ms: i64,
}

fn default_degradation_threshold_ms() -> i64 {
    DEFAULT_DEGRADATION_THRESHOLD_MS
}

fn default_cancellation_threshold_ms() -> i64 {
    DEFAULT_CANCELLATION_THRESHOLD_MS
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            description: String::new(),
            url: String::new(),
            degradation_threshold_ms: DEFAULT_DEGRADATION_THRESHOLD_MS,
            cancellation_threshold_ms: DEFAULT_CANCELLATION_THRESHOLD_MS,
        }
    }
}

impl ProbeConfig {
    /// Create a probe config with the default thresholds.
    pub fn new(description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_degradation_threshold(mut self, threshold: Duration) -> Self {
        self.degradation_threshold_ms = duration_to_millis(threshold);
        self
    }

    pub fn with_cancellation_threshold(mut self, threshold: Duration) -> Self {
        self.cancellation_threshold_ms = duration_to_millis(threshold);
        self
    }
}

fn duration_to_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

/// HTTP client configuration shared by every probe built from it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// User-Agent header sent with every probe request.
    pub user_agent: String,

    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// How long idle pooled connections are kept, in seconds.
    pub pool_idle_timeout_secs: u64,

    /// Honour HTTP_PROXY / HTTPS_PROXY / NO_PROXY from the environment.
    pub use_env_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("http-probe/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_ms: 1000,
            pool_idle_timeout_secs: 90,
            use_env_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
