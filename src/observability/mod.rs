//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every probe call produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms via the metrics facade)
//!
//! Consumers:
//!     → whatever subscriber / recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (probe, url, elapsed_ms, status) on every event
//! - Metrics are cheap and become no-ops until a recorder is installed
//! - No exporter lives here; the host decides how metrics leave the process

pub mod logging;
pub mod metrics;
