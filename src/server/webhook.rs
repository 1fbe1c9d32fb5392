//! Webhook endpoint handler.
//!
//! Accepts GitHub webhook deliveries and runs the dispatch pipeline:
//! signature verification, event classification, job construction, enqueue,
//! and the pending-comment side effect. The response is returned once the job
//! is durably queued; the actual review happens asynchronously in the
//! consumer.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::AppState;
use crate::dispatch::queue::EnqueueError;
use crate::types::{PrSummary, ReviewId, ReviewJob};
use crate::webhooks::events::{MalformedPayloadError, PullRequestPayload, ReviewCommentPayload};
use crate::webhooks::{Decision, classify, verify_signature};

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub signature.
const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Errors that can occur when processing a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing required header.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// Invalid signature.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Invalid JSON body.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Event shape missing required fields.
    #[error(transparent)]
    MalformedPayload(#[from] MalformedPayloadError),

    /// The durable queue refused the job.
    #[error(transparent)]
    Enqueue(#[from] EnqueueError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match &self {
            WebhookError::MissingHeader(_)
            | WebhookError::InvalidJson(_)
            | WebhookError::MalformedPayload(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            WebhookError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid signature" })),
            )
                .into_response(),
            // A 5xx makes GitHub redeliver the webhook, which is the only
            // retry path for enqueue failures.
            WebhookError::Enqueue(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error",
                    "message": e.to_string(),
                })),
            )
                .into_response(),
        }
    }
}

/// Body of a successful (or ignored) webhook response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    /// What happened to the delivery.
    pub message: &'static str,

    /// The queued job id, when a job was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<ReviewId>,

    /// Summary of the PR the job is for, when a job was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr: Option<PrSummary>,
}

impl WebhookResponse {
    fn ignored() -> Self {
        WebhookResponse {
            message: "Event processed",
            review_id: None,
            pr: None,
        }
    }

    fn queued(message: &'static str, review_id: ReviewId, pr: PrSummary) -> Self {
        WebhookResponse {
            message,
            review_id: Some(review_id),
            pr: Some(pr),
        }
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Required headers:
///   - `X-GitHub-Event`: Event type (e.g., "pull_request")
///   - `X-Hub-Signature-256`: HMAC-SHA256 signature of the payload
/// - Body: JSON webhook payload
///
/// # Response
///
/// - 200 OK: `{"message", "reviewId"?, "pr"?}`: job queued, or event ignored
/// - 400 Bad Request: missing event header, invalid JSON, or malformed payload
/// - 401 Unauthorized: missing or invalid signature
/// - 500 Internal Server Error: the queue refused the job (GitHub redelivers)
pub async fn webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookError> {
    let event_type = get_header(&headers, HEADER_EVENT)?;

    // A request without a signature header cannot be authenticated, so it is
    // rejected the same way as one with a wrong signature.
    let signature_header = headers
        .get(HEADER_SIGNATURE)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::InvalidSignature)?;

    debug!(event_type = %event_type, "Received webhook");

    // Verify the signature over the raw bytes BEFORE any parsing, so
    // malicious requests are rejected as cheaply as possible.
    if !verify_signature(&body, signature_header, app_state.webhook_secret()) {
        warn!(event_type = %event_type, "Invalid webhook signature");
        return Err(WebhookError::InvalidSignature);
    }

    // Parse the JSON body
    let payload: serde_json::Value = serde_json::from_slice(&body)?;

    match classify(&event_type, &payload, app_state.bot_handle()) {
        Decision::CreateReview => {
            let parsed = PullRequestPayload::from_value(&payload).inspect_err(
                |e| warn!(event_type = %event_type, error = %e, "Dropping malformed payload"),
            )?;
            let job = ReviewJob::pr_review(&parsed);
            info!(
                review_id = %job.id,
                pr = %job.pr_number,
                action = %parsed.action,
                "Pull request qualifies for review"
            );

            let result = app_state.dispatcher().dispatch(&job).await?;
            Ok(Json(WebhookResponse::queued(
                "Review queued successfully",
                result.review_id,
                result.pr,
            )))
        }
        Decision::CreateReReview { question } => {
            let parsed = ReviewCommentPayload::from_value(&payload).inspect_err(
                |e| warn!(event_type = %event_type, error = %e, "Dropping malformed payload"),
            )?;
            let job = ReviewJob::re_review(&parsed, question);
            info!(
                review_id = %job.id,
                pr = %job.pr_number,
                "Review comment requests a re-review"
            );

            let result = app_state.dispatcher().dispatch(&job).await?;
            Ok(Json(WebhookResponse::queued(
                "Re-review requested",
                result.review_id,
                result.pr,
            )))
        }
        Decision::Ignore => {
            debug!(event_type = %event_type, "Event does not qualify for review");
            Ok(Json(WebhookResponse::ignored()))
        }
    }
}

/// Extracts a required header value as a string.
fn get_header(headers: &HeaderMap, name: &'static str) -> Result<String, WebhookError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or(WebhookError::MissingHeader(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_header_present() {
        let mut headers = HeaderMap::new();
        headers.insert("x-github-event", "pull_request".parse().unwrap());

        let result = get_header(&headers, "x-github-event").unwrap();
        assert_eq!(result, "pull_request");
    }

    #[test]
    fn get_header_missing() {
        let headers = HeaderMap::new();

        let result = get_header(&headers, "x-github-event");
        assert!(matches!(result, Err(WebhookError::MissingHeader(_))));
    }

    #[test]
    fn response_omits_absent_fields() {
        let body = serde_json::to_value(WebhookResponse::ignored()).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Event processed" }));
    }
}
