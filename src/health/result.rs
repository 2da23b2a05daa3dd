//! Probe outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal classification of a single probe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Healthy => "healthy",
            ProbeStatus::Degraded => "degraded",
            ProbeStatus::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The cancellation threshold elapsed before a response arrived.
    Timeout,
    /// The caller cancelled the check.
    Cancelled,
    /// Connection refused, reset, or name resolution failed.
    Connect,
    /// The request could not be built or sent (bad scheme, invalid URI).
    Request,
    /// The peer answered with something that is not valid HTTP.
    Protocol,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Connect => "connect",
            ErrorKind::Request => "request",
            ErrorKind::Protocol => "protocol",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one `check` call. Not retained by the probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    pub elapsed_millis: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Underlying cause of a transport failure, as text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ProbeResult {
    pub fn is_healthy(&self) -> bool {
        self.status == ProbeStatus::Healthy
    }

    pub fn is_unhealthy(&self) -> bool {
        self.status == ProbeStatus::Unhealthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_transport_failure() {
        let result = ProbeResult {
            status: ProbeStatus::Unhealthy,
            elapsed_millis: 2001,
            http_status: None,
            message: "db probe failed due to exception".to_string(),
            error_kind: Some(ErrorKind::Timeout),
            error_detail: Some("no response within 2000 ms".to_string()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error_kind"], "timeout");
        assert!(json.get("http_status").is_none());
    }

    #[test]
    fn test_serialize_response() {
        let result = ProbeResult {
            status: ProbeStatus::Degraded,
            elapsed_millis: 1500,
            http_status: Some(200),
            message: "auth-service probe took more than 1000 ms".to_string(),
            error_kind: None,
            error_detail: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["http_status"], 200);
        assert!(json.get("error_kind").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(ProbeStatus::Degraded.to_string(), "degraded");
        assert_eq!(ErrorKind::Cancelled.to_string(), "cancelled");
    }
}
