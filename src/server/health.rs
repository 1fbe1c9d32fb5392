//! Health check endpoint for liveness probes.
//!
//! Returns 200 with a small JSON body whenever the process is up. Intended
//! for load balancers and orchestration systems.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The service name reported in health responses.
pub const SERVICE_NAME: &str = "code-review-webhook-handler";

/// Body of the health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process can answer at all.
    pub status: &'static str,

    /// Current wall-clock time, RFC 3339.
    pub timestamp: DateTime<Utc>,

    /// The service name.
    pub service: &'static str,
}

/// Health check handler.
///
/// # Example
///
/// ```ignore
/// GET /health HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: application/json
///
/// {"status":"healthy","timestamp":"2026-08-26T12:00:00Z","service":"code-review-webhook-handler"}
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        service: SERVICE_NAME,
    })
}
