//! HTTP health-check probe with raw JSON body formatting for axum hosts.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{AppConfig, ConfigError, ProbeConfig};
pub use health::{HttpHealthProbe, ProbeResult, ProbeStatus};
pub use lifecycle::Shutdown;
