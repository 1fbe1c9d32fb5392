//! Review Relay - a GitHub webhook relay that dispatches AI code-review jobs.
//!
//! The pipeline: an inbound webhook is signature-verified, classified, turned
//! into a [`types::ReviewJob`], enqueued, and acknowledged. An independent
//! consumer drains the queue and hands each job to the external review
//! backend, acknowledging on success and scheduling a redelivery on failure.

pub mod config;
pub mod consumer;
pub mod dispatch;
pub mod server;
pub mod types;
pub mod webhooks;
