//! Probe metrics.
//!
//! # Metrics
//! - `probe_checks_total` (counter): checks by probe, status
//! - `probe_duration_seconds` (histogram): elapsed time per check
//! - `probe_healthy` (gauge): 1 = healthy or degraded, 0 = unhealthy

use std::time::Duration;

use crate::health::result::ProbeStatus;

pub fn record_probe_result(probe: &str, status: ProbeStatus) {
    ::metrics::counter!(
        "probe_checks_total",
        "probe" => probe.to_string(),
        "status" => status.as_str()
    )
    .increment(1);

    let up = if status == ProbeStatus::Unhealthy { 0.0 } else { 1.0 };
    ::metrics::gauge!("probe_healthy", "probe" => probe.to_string()).set(up);
}

pub fn record_probe_duration(probe: &str, elapsed: Duration) {
    ::metrics::histogram!("probe_duration_seconds", "probe" => probe.to_string())
        .record(elapsed.as_secs_f64());
}
