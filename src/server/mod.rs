//! HTTP server for the review relay.
//!
//! This module implements the HTTP surface that:
//! - Accepts webhooks from GitHub, validates signatures, and queues review jobs
//! - Provides health checks for liveness probes
//!
//! # Endpoints
//!
//! - `POST /webhooks/github` - Accepts GitHub webhook deliveries
//! - `GET /health` - Returns a JSON liveness body

use std::sync::Arc;

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::webhook_handler;

use crate::dispatch::Dispatcher;

/// Shared application state.
///
/// Passed to all handlers via Axum's `State` extractor. Cheap to clone; the
/// configuration and dispatcher live behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Webhook secret for HMAC-SHA256 signature verification.
    webhook_secret: Vec<u8>,

    /// The `@`-prefixed handle that triggers re-reviews in comments.
    bot_handle: String,

    /// The dispatcher handling enqueue + notification.
    dispatcher: Dispatcher,
}

impl AppState {
    /// Creates a new `AppState` with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `webhook_secret` - Secret for verifying webhook signatures
    /// * `bot_handle` - Mention token recognized in review comments
    /// * `dispatcher` - Queue + notifier seam for built jobs
    pub fn new(
        webhook_secret: impl Into<Vec<u8>>,
        bot_handle: impl Into<String>,
        dispatcher: Dispatcher,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                webhook_secret: webhook_secret.into(),
                bot_handle: bot_handle.into(),
                dispatcher,
            }),
        }
    }

    /// Returns the webhook secret.
    pub fn webhook_secret(&self) -> &[u8] {
        &self.inner.webhook_secret
    }

    /// Returns the bot mention handle.
    pub fn bot_handle(&self) -> &str {
        &self.inner.bot_handle
    }

    /// Returns the dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhooks/github", post(webhook_handler))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
