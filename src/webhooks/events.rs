//! Typed GitHub webhook payloads.
//!
//! These structs capture the subset of the `pull_request` and
//! `pull_request_review_comment` event payloads that the relay needs to build
//! a review job. Deserialization doubles as payload validation: a payload
//! missing a required field (e.g. `pull_request.head.sha`) fails to parse and
//! surfaces as a [`MalformedPayloadError`], and no job is created.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{InstallationId, Sha};

/// A webhook payload was missing required fields or had the wrong shape.
#[derive(Debug, Error)]
#[error("malformed {event_type} payload: {source}")]
pub struct MalformedPayloadError {
    /// The webhook event type being parsed.
    pub event_type: &'static str,

    /// The underlying deserialization failure.
    #[source]
    pub source: serde_json::Error,
}

/// A `pull_request` event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestPayload {
    /// The action that triggered this event (e.g. "opened", "closed").
    pub action: String,

    /// The pull request the event is about.
    pub pull_request: PullRequest,

    /// The repository the pull request belongs to.
    pub repository: Repository,

    /// The GitHub App installation the delivery is scoped to.
    pub installation: Installation,
}

impl PullRequestPayload {
    /// Parses a `pull_request` payload from an already-decoded JSON body.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, MalformedPayloadError> {
        serde_json::from_value(value.clone()).map_err(|source| MalformedPayloadError {
            event_type: "pull_request",
            source,
        })
    }
}

/// A `pull_request_review_comment` event payload.
///
/// GitHub delivers the full pull request and repository objects on review
/// comment events, so re-review jobs carry the same context as PR reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCommentPayload {
    /// The action that triggered this event ("created", "edited", "deleted").
    pub action: String,

    /// The review comment itself.
    pub comment: Comment,

    /// The pull request the comment is on.
    pub pull_request: PullRequest,

    /// The repository the pull request belongs to.
    pub repository: Repository,

    /// The GitHub App installation the delivery is scoped to.
    pub installation: Installation,
}

impl ReviewCommentPayload {
    /// Parses a `pull_request_review_comment` payload from an already-decoded
    /// JSON body.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, MalformedPayloadError> {
        serde_json::from_value(value.clone()).map_err(|source| MalformedPayloadError {
            event_type: "pull_request_review_comment",
            source,
        })
    }
}

/// The pull request sub-object of a webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    /// The PR number.
    pub number: u64,

    /// The PR title.
    pub title: String,

    /// The PR's HTML URL.
    pub html_url: String,

    /// The PR author.
    pub user: User,

    /// The base branch the PR targets.
    pub base: BranchRef,

    /// The PR's source branch, including its current head SHA.
    pub head: BranchRef,
}

/// A branch reference within a pull request (base or head).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRef {
    /// The branch name.
    #[serde(rename = "ref")]
    pub name: String,

    /// The commit SHA the branch points at.
    pub sha: Sha,
}

/// A GitHub user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's login name.
    pub login: String,
}

/// The repository sub-object of a webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// The repository name.
    pub name: String,

    /// The repository owner.
    pub owner: User,

    /// The HTTPS clone URL.
    pub clone_url: String,
}

/// The installation sub-object of a webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    /// The installation ID.
    pub id: InstallationId,
}

/// A review comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// The comment body text.
    pub body: String,
}
