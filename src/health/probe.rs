//! HTTP health-check probe.
//!
//! # Responsibilities
//! - Issue one GET per check against a configured URL
//! - Measure elapsed time on every exit path
//! - Classify the outcome as Healthy / Degraded / Unhealthy
//!
//! # Classification (first match wins)
//! ```text
//! transport failure / timeout / cancel → Unhealthy (error_kind set)
//! non-2xx status                       → Unhealthy
//! elapsed > degradation threshold      → Degraded
//! otherwise                            → Healthy
//! ```
//!
//! # Design Decisions
//! - No retries and no memory between calls; the caller aggregates
//! - The cancellation threshold is a per-call deadline, never a mutation
//!   of the shared client
//! - `check` never fails; only construction can

use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::loader::ConfigError;
use crate::config::schema::ProbeConfig;
use crate::config::validation::{validate_probe, ProbeSettings};
use crate::health::client::{ClientFactory, HttpClient, TransportError};
use crate::health::result::{ErrorKind, ProbeResult, ProbeStatus};
use crate::observability::metrics;

/// A single configured health check targeting one dependency.
pub struct HttpHealthProbe {
    settings: ProbeSettings,
    client: Arc<dyn HttpClient>,
}

impl HttpHealthProbe {
    /// Validate `config` and bind it to `client`.
    ///
    /// Fails with [`ConfigError::Validation`] naming every invalid field.
    pub fn new(config: &ProbeConfig, client: Arc<dyn HttpClient>) -> Result<Self, ConfigError> {
        let settings = validate_probe(config).map_err(ConfigError::Validation)?;
        Ok(Self::with_settings(settings, client))
    }

    /// Like [`HttpHealthProbe::new`], asking `factory` for a client keyed by description.
    pub fn from_factory(
        config: &ProbeConfig,
        factory: &dyn ClientFactory,
    ) -> Result<Self, ConfigError> {
        let settings = validate_probe(config).map_err(ConfigError::Validation)?;
        let client = factory
            .create_client(&settings.description)
            .map_err(ConfigError::Client)?;
        Ok(Self::with_settings(settings, client))
    }

    fn with_settings(settings: ProbeSettings, client: Arc<dyn HttpClient>) -> Self {
        tracing::debug!(
            probe = %settings.description,
            url = %settings.url,
            degradation_ms = settings.degradation_threshold.as_millis() as u64,
            cancellation_ms = settings.cancellation_threshold.as_millis() as u64,
            "Health probe configured"
        );

        Self { settings, client }
    }

    pub fn description(&self) -> &str {
        &self.settings.description
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Run the probe once.
    ///
    /// Returns when a response arrives, the cancellation threshold elapses,
    /// or `cancel` fires, whichever comes first.
    pub async fn check(&self, cancel: &CancellationToken) -> ProbeResult {
        let mut timer = ProbeTimer::start(&self.settings.description);
        let outcome = self.send(cancel).await;
        let elapsed = timer.stop();

        let result = self.classify(outcome, elapsed);
        self.report(&result);
        result
    }

    async fn send(&self, cancel: &CancellationToken) -> Result<StatusCode, TransportError> {
        let timeout = self.settings.cancellation_threshold;
        let request = self.client.get(&self.settings.url, timeout);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::new(
                ErrorKind::Cancelled,
                "check cancelled before a response arrived",
            )),
            res = time::timeout(timeout, request) => match res {
                Ok(outcome) => outcome,
                Err(_) => Err(TransportError::timed_out(timeout)),
            },
        }
    }

    fn classify(
        &self,
        outcome: Result<StatusCode, TransportError>,
        elapsed: Duration,
    ) -> ProbeResult {
        let description = &self.settings.description;
        let elapsed_millis = round_millis(elapsed);

        let status = match outcome {
            Ok(status) => status,
            Err(e) => {
                return ProbeResult {
                    status: ProbeStatus::Unhealthy,
                    elapsed_millis,
                    http_status: None,
                    message: format!("{} probe failed due to exception", description),
                    error_kind: Some(e.kind),
                    error_detail: Some(e.detail),
                };
            }
        };

        let (probe_status, message) = if !status.is_success() {
            (
                ProbeStatus::Unhealthy,
                format!("{} probe failed: HTTP {}", description, status.as_u16()),
            )
        } else if elapsed > self.settings.degradation_threshold {
            (
                ProbeStatus::Degraded,
                format!(
                    "{} probe took more than {} ms",
                    description,
                    self.settings.degradation_threshold.as_millis()
                ),
            )
        } else {
            (
                ProbeStatus::Healthy,
                format!("{} probe completed in {} ms", description, elapsed_millis),
            )
        };

        ProbeResult {
            status: probe_status,
            elapsed_millis,
            http_status: Some(status.as_u16()),
            message,
            error_kind: None,
            error_detail: None,
        }
    }

    fn report(&self, result: &ProbeResult) {
        let probe = self.settings.description.as_str();
        match result.status {
            ProbeStatus::Healthy => tracing::info!(
                probe,
                elapsed_ms = result.elapsed_millis,
                http_status = result.http_status,
                "{}",
                result.message
            ),
            ProbeStatus::Degraded | ProbeStatus::Unhealthy => tracing::warn!(
                probe,
                url = %self.settings.url,
                status = %result.status,
                elapsed_ms = result.elapsed_millis,
                http_status = result.http_status,
                error_kind = result.error_kind.map(|k| k.as_str()),
                error = result.error_detail.as_deref(),
                "{}",
                result.message
            ),
        }
        metrics::record_probe_result(probe, result.status);
    }
}

impl std::fmt::Debug for HttpHealthProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpHealthProbe")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Round to the nearest whole millisecond.
fn round_millis(d: Duration) -> u64 {
    let millis = (d.as_nanos() + 500_000) / 1_000_000;
    u64::try_from(millis).unwrap_or(u64::MAX)
}

/// Stopwatch for one check. Stops on first `stop()` or on drop, so a check
/// future dropped mid-request still records its duration.
struct ProbeTimer<'a> {
    probe: &'a str,
    started: Instant,
    elapsed: Option<Duration>,
}

impl<'a> ProbeTimer<'a> {
    fn start(probe: &'a str) -> Self {
        Self {
            probe,
            started: Instant::now(),
            elapsed: None,
        }
    }

    fn stop(&mut self) -> Duration {
        if let Some(elapsed) = self.elapsed {
            return elapsed;
        }
        let elapsed = self.started.elapsed();
        self.elapsed = Some(elapsed);
        metrics::record_probe_duration(self.probe, elapsed);
        elapsed
    }
}

impl Drop for ProbeTimer<'_> {
    fn drop(&mut self) {
        self.stop();
    }
}
