//! The review job record and its wire format.
//!
//! [`ReviewJob`] is the only long-lived entity in the system: it is built from
//! a qualifying webhook event, enqueued once, and consumed by the review
//! worker. Everything else is a stateless request/response transformer.
//!
//! The serialized form uses camelCase keys and a `type` tag of `PR_REVIEW` or
//! `RE_REVIEW`, matching what the review backend expects as its request body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::webhooks::events::{PullRequestPayload, ReviewCommentPayload};

use super::ids::{InstallationId, PrNumber, RepoId, ReviewId, Sha};

/// The kind of review a job requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewType {
    /// A full review of a pull request (opened, synchronized, or reopened).
    PrReview,
    /// A follow-up review triggered by a user mentioning the bot in a review
    /// comment. Carries the user's question.
    ReReview,
}

/// A unit of deferred work describing one review to perform.
///
/// Invariants:
/// - `id` is unique per job (random UUID, generated at creation).
/// - `review_type` is fixed at creation and never mutated.
/// - `user_question` is present exactly when `review_type` is
///   [`ReviewType::ReReview`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewJob {
    /// Unique job identifier.
    pub id: ReviewId,

    /// The kind of review requested.
    #[serde(rename = "type")]
    pub review_type: ReviewType,

    /// The pull request number.
    pub pr_number: PrNumber,

    /// The pull request title.
    pub pr_title: String,

    /// The pull request's HTML URL.
    pub pr_url: String,

    /// The repository owner login.
    pub repo_owner: String,

    /// The repository name.
    pub repo_name: String,

    /// The repository clone URL.
    pub repo_url: String,

    /// The pull request author's login.
    pub pr_author: String,

    /// The base branch the PR targets.
    pub base_branch: String,

    /// The PR's source branch.
    pub head_branch: String,

    /// The current head SHA of the PR branch.
    pub head_sha: Sha,

    /// The GitHub App installation the webhook was delivered for.
    pub installation_id: InstallationId,

    /// Wall-clock creation time, serialized as RFC 3339.
    pub created_at: DateTime<Utc>,

    /// The user's question, for re-reviews only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_question: Option<String>,
}

impl ReviewJob {
    /// Builds a `PR_REVIEW` job from a pull request webhook payload.
    ///
    /// Generates a fresh [`ReviewId`] and stamps `created_at` with the current
    /// wall-clock time.
    pub fn pr_review(payload: &PullRequestPayload) -> Self {
        ReviewJob {
            id: ReviewId::new_random(),
            review_type: ReviewType::PrReview,
            pr_number: PrNumber(payload.pull_request.number),
            pr_title: payload.pull_request.title.clone(),
            pr_url: payload.pull_request.html_url.clone(),
            repo_owner: payload.repository.owner.login.clone(),
            repo_name: payload.repository.name.clone(),
            repo_url: payload.repository.clone_url.clone(),
            pr_author: payload.pull_request.user.login.clone(),
            base_branch: payload.pull_request.base.name.clone(),
            head_branch: payload.pull_request.head.name.clone(),
            head_sha: payload.pull_request.head.sha.clone(),
            installation_id: payload.installation.id,
            created_at: Utc::now(),
            user_question: None,
        }
    }

    /// Builds a `RE_REVIEW` job from a review comment webhook payload.
    ///
    /// The full PR and repository context is carried on re-review jobs too, so
    /// the consumer can process them without a round-trip to the GitHub API.
    pub fn re_review(payload: &ReviewCommentPayload, question: impl Into<String>) -> Self {
        ReviewJob {
            id: ReviewId::new_random(),
            review_type: ReviewType::ReReview,
            pr_number: PrNumber(payload.pull_request.number),
            pr_title: payload.pull_request.title.clone(),
            pr_url: payload.pull_request.html_url.clone(),
            repo_owner: payload.repository.owner.login.clone(),
            repo_name: payload.repository.name.clone(),
            repo_url: payload.repository.clone_url.clone(),
            pr_author: payload.pull_request.user.login.clone(),
            base_branch: payload.pull_request.base.name.clone(),
            head_branch: payload.pull_request.head.name.clone(),
            head_sha: payload.pull_request.head.sha.clone(),
            installation_id: payload.installation.id,
            created_at: Utc::now(),
            user_question: Some(question.into()),
        }
    }

    /// Returns the repository this job belongs to.
    pub fn repo_id(&self) -> RepoId {
        RepoId::new(&self.repo_owner, &self.repo_name)
    }
}

/// The minimal PR summary returned to the webhook caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrSummary {
    /// The pull request number.
    pub number: PrNumber,
    /// The pull request title.
    pub title: String,
    /// The pull request's HTML URL.
    pub url: String,
}

impl From<&ReviewJob> for PrSummary {
    fn from(job: &ReviewJob) -> Self {
        PrSummary {
            number: job.pr_number,
            title: job.pr_title.clone(),
            url: job.pr_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhooks::events::{PullRequestPayload, ReviewCommentPayload};
    use std::collections::HashSet;

    fn sample_payload() -> PullRequestPayload {
        PullRequestPayload::from_value(&crate::webhooks::events::tests::pull_request_json(
            "opened",
        ))
        .unwrap()
    }

    #[test]
    fn pr_review_populates_all_fields() {
        let payload = sample_payload();
        let job = ReviewJob::pr_review(&payload);

        assert_eq!(job.review_type, ReviewType::PrReview);
        assert_eq!(job.pr_number, PrNumber(1347));
        assert_eq!(job.pr_title, "Amazing new feature");
        assert_eq!(job.pr_url, "https://github.com/octocat/hello-world/pull/1347");
        assert_eq!(job.repo_owner, "octocat");
        assert_eq!(job.repo_name, "hello-world");
        assert_eq!(job.repo_url, "https://github.com/octocat/hello-world.git");
        assert_eq!(job.pr_author, "monalisa");
        assert_eq!(job.base_branch, "main");
        assert_eq!(job.head_branch, "feature/amazing");
        assert_eq!(job.head_sha.as_str(), "6dcb09b5b57875f334f61aebed695e2e4193db5e");
        assert_eq!(job.installation_id, InstallationId(12345));
        assert_eq!(job.user_question, None);
    }

    #[test]
    fn re_review_carries_full_context_and_question() {
        let payload = ReviewCommentPayload::from_value(
            &crate::webhooks::events::tests::review_comment_json(
                "created",
                "@codereview-ai explain this",
            ),
        )
        .unwrap();

        let job = ReviewJob::re_review(&payload, "explain this");

        assert_eq!(job.review_type, ReviewType::ReReview);
        assert_eq!(job.user_question.as_deref(), Some("explain this"));
        // Spot-check that the PR/repo context is not left empty.
        assert_eq!(job.pr_number, PrNumber(1347));
        assert_eq!(job.repo_owner, "octocat");
        assert_eq!(job.head_sha.as_str(), "6dcb09b5b57875f334f61aebed695e2e4193db5e");
    }

    #[test]
    fn job_ids_are_unique_across_many_builds() {
        let payload = sample_payload();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let job = ReviewJob::pr_review(&payload);
            assert!(seen.insert(job.id), "duplicate job id: {}", job.id);
        }
    }

    #[test]
    fn wire_format_uses_camel_case_and_type_tag() {
        let job = ReviewJob::pr_review(&sample_payload());
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["type"], "PR_REVIEW");
        assert_eq!(value["prNumber"], 1347);
        assert_eq!(value["repoOwner"], "octocat");
        assert_eq!(value["headSha"], "6dcb09b5b57875f334f61aebed695e2e4193db5e");
        assert_eq!(value["installationId"], 12345);
        // RFC 3339 timestamp.
        let created_at = value["createdAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
        // No userQuestion key on PR_REVIEW jobs.
        assert!(value.get("userQuestion").is_none());
    }

    #[test]
    fn wire_format_roundtrips() {
        let job = ReviewJob::pr_review(&sample_payload());
        let json = serde_json::to_string(&job).unwrap();
        let parsed: ReviewJob = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, job);
    }

    #[test]
    fn re_review_type_tag() {
        assert_eq!(
            serde_json::to_value(ReviewType::ReReview).unwrap(),
            serde_json::json!("RE_REVIEW")
        );
    }
}
