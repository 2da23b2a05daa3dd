//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject empty labels/URLs and negative thresholds
//! - Produce the immutable settings a probe runs with
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure: ProbeConfig → Result<ProbeSettings, Vec<ValidationError>>
//! - Runs before any network activity

use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProbeConfig;

/// A single invalid configuration field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Only the empty string; whitespace is a valid label.
    #[error("probe.description must not be empty")]
    EmptyDescription,

    #[error("probe.url must not be empty")]
    EmptyUrl,

    #[error("probe.url '{url}' is not a valid absolute URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("probe.{field} must be >= 0, got {value}")]
    NegativeThreshold { field: &'static str, value: i64 },
}

impl ValidationError {
    /// Name of the offending config field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyDescription => "description",
            ValidationError::EmptyUrl | ValidationError::InvalidUrl { .. } => "url",
            ValidationError::NegativeThreshold { field, .. } => field,
        }
    }
}

/// Validated, immutable probe settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub description: String,
    pub url: Url,
    pub degradation_threshold: Duration,
    pub cancellation_threshold: Duration,
}

/// Validate a probe config, collecting every problem.
pub fn validate_probe(config: &ProbeConfig) -> Result<ProbeSettings, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.description.is_empty() {
        errors.push(ValidationError::EmptyDescription);
    }

    let url = if config.url.is_empty() {
        errors.push(ValidationError::EmptyUrl);
        None
    } else {
        match Url::parse(config.url.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                errors.push(ValidationError::InvalidUrl {
                    url: config.url.clone(),
                    reason: e.to_string(),
                });
                None
            }
        }
    };

    let degradation = threshold(
        "degradation_threshold_ms",
        config.degradation_threshold_ms,
        &mut errors,
    );
    let cancellation = threshold(
        "cancellation_threshold_ms",
        config.cancellation_threshold_ms,
        &mut errors,
    );

    match (url, degradation, cancellation) {
        (Some(url), Some(degradation_threshold), Some(cancellation_threshold))
            if errors.is_empty() =>
        {
            Ok(ProbeSettings {
                description: config.description.clone(),
                url,
                degradation_threshold,
                cancellation_threshold,
            })
        }
        _ => Err(errors),
    }
}

fn threshold(
    field: &'static str,
    value: i64,
    errors: &mut Vec<ValidationError>,
) -> Option<Duration> {
    match u64::try_from(value) {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            errors.push(ValidationError::NegativeThreshold { field, value });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ProbeConfig::new("auth-service", "http://127.0.0.1:9000/health");
        let settings = validate_probe(&config).unwrap();
        assert_eq!(settings.description, "auth-service");
        assert_eq!(settings.degradation_threshold, Duration::from_millis(1000));
        assert_eq!(settings.cancellation_threshold, Duration::from_millis(2000));
    }

    #[test]
    fn test_zero_thresholds_are_valid() {
        let mut config = ProbeConfig::new("a", "http://a/");
        config.degradation_threshold_ms = 0;
        config.cancellation_threshold_ms = 0;
        assert!(validate_probe(&config).is_ok());
    }

    #[test]
    fn test_empty_description() {
        let errors = validate_probe(&ProbeConfig::new("", "http://a/")).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyDescription]);
        assert_eq!(errors[0].field(), "description");
    }

    #[test]
    fn test_whitespace_description_is_not_empty() {
        let settings = validate_probe(&ProbeConfig::new(" ", "http://a/")).unwrap();
        assert_eq!(settings.description, " ");
    }

    #[test]
    fn test_empty_url() {
        let errors = validate_probe(&ProbeConfig::new("a", "")).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyUrl]);
    }

    #[test]
    fn test_whitespace_url_is_unparsable() {
        let errors = validate_probe(&ProbeConfig::new("a", "  ")).unwrap_err();
        assert!(matches!(errors[..], [ValidationError::InvalidUrl { .. }]));
    }

    #[test]
    fn test_unparsable_url() {
        let errors = validate_probe(&ProbeConfig::new("a", "not a url")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "url");
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ProbeConfig {
            description: String::new(),
            url: String::new(),
            degradation_threshold_ms: -1,
            cancellation_threshold_ms: -2,
        };
        let errors = validate_probe(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::NegativeThreshold {
            field: "cancellation_threshold_ms",
            value: -2
        }));
        assert_eq!(errors[2].to_string(), "probe.degradation_threshold_ms must be >= 0, got -1");
    }
}
