//! Response generators for the server's fixed responses.
//!
//! - `/health` - Health check endpoint
//! - `/metrics` - Prometheus metrics export
//! - pipeline failures and unsupported methods
//!
//! Functions return `EndpointResponse` instead of writing directly to the
//! session, so response generation stays testable. The caller handles
//! writing the response to the session.

use std::time::Instant;

use crate::error::ResizeError;
use crate::metrics::Metrics;
use crate::response::{ErrorResponse, ERROR_STATUS};

pub const HEALTH_PATH: &str = "/health";
pub const METRICS_PATH: &str = "/metrics";

/// Response from a special endpoint handler.
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: &'static str,
    /// Response body
    pub body: String,
}

impl EndpointResponse {
    /// Create a JSON response with the given status and body.
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    /// Create a plain text response (for Prometheus metrics).
    pub fn prometheus(body: String) -> Self {
        Self {
            status: 200,
            content_type: "text/plain; version=0.0.4",
            body,
        }
    }
}

/// Generate response for /health endpoint.
///
/// Returns health status with uptime and version information.
pub fn handle_health(start_time: Instant) -> EndpointResponse {
    let uptime_seconds = start_time.elapsed().as_secs();
    let version = env!("CARGO_PKG_VERSION");

    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "version": version
    })
    .to_string();

    EndpointResponse::json(200, body)
}

/// Generate response for /metrics endpoint.
pub fn handle_metrics(metrics: &Metrics) -> EndpointResponse {
    EndpointResponse::prometheus(metrics.export_prometheus())
}

/// Every pipeline failure is reported with the same status.
pub fn handle_pipeline_error(err: &ResizeError) -> EndpointResponse {
    EndpointResponse::json(ERROR_STATUS, ErrorResponse::from(err).to_json())
}

pub fn handle_method_not_allowed(method: &str) -> EndpointResponse {
    let body = serde_json::json!({
        "errorType": "MethodNotAllowed",
        "errorMessage": format!("Method {} is not allowed", method)
    })
    .to_string();

    EndpointResponse::json(405, body)
}
