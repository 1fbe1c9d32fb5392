//! Review backend client.
//!
//! The consumer hands each job to an external review backend over HTTP:
//! `POST {backend_url}/review` with bearer-token auth and the job JSON as the
//! request body. Any non-success status or transport failure is a
//! [`BackendError`], which the consumer answers with a scheduled retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::ReviewJob;

/// The review backend could not complete the request.
///
/// All variants are treated identically by the consumer (retry after a fixed
/// delay); they are distinguished only for logging.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-success HTTP status.
    #[error("review backend returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The request never completed (connection refused, timeout, DNS, ...).
    #[error("review backend request failed: {0}")]
    Transport(String),

    /// The backend answered 2xx but the body was not the expected JSON.
    #[error("review backend returned an unparseable response: {0}")]
    InvalidResponse(String),
}

/// The backend's acknowledgment of a completed review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReceipt {
    /// The backend's identifier for the produced review.
    pub review_id: String,
}

/// Capability for invoking the external review backend.
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    /// Submits a job for review and returns the backend's receipt.
    async fn request_review(&self, job: &ReviewJob) -> Result<ReviewReceipt, BackendError>;
}

/// HTTP implementation of [`ReviewBackend`] using reqwest.
pub struct HttpReviewBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpReviewBackend {
    /// Creates a client for the backend at `base_url`, authenticating with
    /// `api_key` as a bearer token.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn review_url(&self) -> String {
        format!("{}/review", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ReviewBackend for HttpReviewBackend {
    async fn request_review(&self, job: &ReviewJob) -> Result<ReviewReceipt, BackendError> {
        let response = self
            .http
            .post(self.review_url())
            .bearer_auth(&self.api_key)
            .json(job)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<ReviewReceipt>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}
