//! Pending-review notification posting.
//!
//! When a job is dispatched, the relay posts a "review in progress" comment on
//! the pull request. This is cosmetic: the queued job is the source of truth,
//! so notification failures are logged and swallowed rather than failing the
//! webhook request.

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::types::{PrNumber, ReviewJob};

/// Posting the pending comment failed.
///
/// Never surfaced to the webhook caller; the dispatcher logs it and moves on.
#[derive(Debug, thiserror::Error)]
#[error("failed to post pending comment on PR {pr}: {reason}")]
pub struct NotificationError {
    /// The PR the comment was meant for.
    pub pr: PrNumber,

    /// Why the post failed.
    pub reason: String,
}

/// Capability for posting the pending-review notification.
#[async_trait]
pub trait ReviewNotifier: Send + Sync {
    /// Posts a "review in progress" comment referencing the job.
    async fn post_pending_comment(&self, job: &ReviewJob) -> Result<(), NotificationError>;
}

/// The comment body posted when a review is queued.
pub fn pending_comment_body() -> &'static str {
    "## 🤖 AI Code Review in Progress...\n\
     \n\
     I'm analyzing this pull request. This usually takes 2-3 minutes.\n\
     \n\
     **What I'm checking:**\n\
     - 🔒 Security vulnerabilities\n\
     - ✅ Compliance with coding standards\n\
     - 🧠 Logic errors and code quality\n\
     - 📚 Best practices\n\
     \n\
     I'll post my findings shortly!\n\
     \n\
     ---\n\
     *Powered by [CodeReviewAI](https://codereview.ai)*"
}

/// Posts pending comments through the GitHub API via octocrab.
pub struct GitHubNotifier {
    client: Octocrab,
}

impl GitHubNotifier {
    /// Creates a notifier from a pre-configured octocrab instance.
    ///
    /// Use this when you need custom authentication (e.g., GitHub App
    /// installation tokens).
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Creates a notifier authenticated with a personal access token.
    pub fn from_token(token: impl Into<String>) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ReviewNotifier for GitHubNotifier {
    async fn post_pending_comment(&self, job: &ReviewJob) -> Result<(), NotificationError> {
        self.client
            .issues(&job.repo_owner, &job.repo_name)
            .create_comment(job.pr_number.0, pending_comment_body())
            .await
            .map(|_| ())
            .map_err(|e| NotificationError {
                pr: job.pr_number,
                reason: e.to_string(),
            })
    }
}

/// A notifier that does nothing.
///
/// Used when no GitHub credentials are configured; the pipeline still queues
/// jobs, it just skips the cosmetic comment.
pub struct NoopNotifier;

#[async_trait]
impl ReviewNotifier for NoopNotifier {
    async fn post_pending_comment(&self, job: &ReviewJob) -> Result<(), NotificationError> {
        tracing::debug!(pr = %job.pr_number, "no GitHub credentials; skipping pending comment");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_body_mentions_progress() {
        let body = pending_comment_body();
        assert!(body.contains("AI Code Review in Progress"));
        assert!(body.contains("Security vulnerabilities"));
    }

    #[test]
    fn comment_body_ends_with_attribution_footer() {
        let body = pending_comment_body();
        assert!(body.ends_with("---\n*Powered by [CodeReviewAI](https://codereview.ai)*"));
    }
}
