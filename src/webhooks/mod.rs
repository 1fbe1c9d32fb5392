//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256)
//! - Typed payload parsing for the events the relay acts on
//! - Classification of deliveries into review decisions

pub mod classify;
pub mod events;
pub mod signature;

pub use classify::{Decision, classify};
pub use events::{MalformedPayloadError, PullRequestPayload, ReviewCommentPayload};
pub use signature::{
    compute_signature, format_signature_header, parse_signature_header, verify_signature,
};
