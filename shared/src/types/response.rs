//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response envelope shared by every SMS endpoint
///
/// ```json
/// { "success": false, "error": "rate_limited", "message": "Please wait 60 seconds", "retry_after": 42 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the request was successful
    pub success: bool,

    /// Human-readable, localized message
    pub message: String,

    /// Stable machine-readable error code (present on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Opaque provider response (present after a successful send)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,

    /// Seconds until the request may be repeated (present when throttled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ApiResponse {
    /// Create a successful response
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            response: None,
            retry_after: None,
        }
    }

    /// Create an error response
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(code.into()),
            response: None,
            retry_after: None,
        }
    }

    /// Attach the provider response
    pub fn with_response(mut self, response: serde_json::Value) -> Self {
        self.response = Some(response);
        self
    }

    /// Attach the remaining throttling window
    pub fn with_retry_after(mut self, seconds: Option<u64>) -> Self {
        self.retry_after = seconds;
        self
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Individual service health checks
    pub services: HashMap<String, ServiceHealth>,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,

    /// Server version
    pub version: String,
}

/// Health status of the service or one of its dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual service health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Service status
    pub status: HealthStatus,

    /// Health check message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Response time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl HealthResponse {
    /// Aggregate the dependency checks into one status
    pub fn from_services(services: HashMap<String, ServiceHealth>, version: impl Into<String>) -> Self {
        let status = if services.values().all(|s| s.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else if services.values().any(|s| s.status == HealthStatus::Healthy) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        };

        Self {
            status,
            services,
            timestamp: Utc::now(),
            version: version.into(),
        }
    }
}
