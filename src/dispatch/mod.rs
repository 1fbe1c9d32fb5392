//! Job dispatch: enqueue plus best-effort notification.
//!
//! The dispatcher is the seam between the webhook handler and the external
//! queue. Its two steps live in different failure domains:
//!
//! 1. **Enqueue** (must succeed): a failure propagates as [`EnqueueError`] and
//!    the whole webhook request fails with a 5xx, so GitHub's own redelivery
//!    applies.
//! 2. **Notify** (best-effort): posting the pending comment is cosmetic.
//!    Failures are logged at warn and swallowed.

use std::sync::Arc;

use tracing::{info, warn};

pub mod notify;
pub mod queue;

pub use notify::{GitHubNotifier, NoopNotifier, NotificationError, ReviewNotifier};
pub use queue::{
    EnqueueError, InMemoryMessage, InMemoryQueue, InMemorySource, JobQueue, MessageSource,
    QueueMessage,
};

use crate::types::{PrSummary, ReviewId, ReviewJob};

/// What the webhook handler needs back from a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    /// The id of the queued job.
    pub review_id: ReviewId,

    /// The minimal PR summary for the caller's response.
    pub pr: PrSummary,
}

/// Hands built jobs to the queue and triggers the pending-comment side effect.
#[derive(Clone)]
pub struct Dispatcher {
    queue: Arc<dyn JobQueue>,
    notifier: Arc<dyn ReviewNotifier>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given queue and notifier.
    pub fn new(queue: Arc<dyn JobQueue>, notifier: Arc<dyn ReviewNotifier>) -> Self {
        Self { queue, notifier }
    }

    /// Dispatches a job: enqueue, then best-effort notification.
    pub async fn dispatch(&self, job: &ReviewJob) -> Result<DispatchResult, EnqueueError> {
        self.queue.send(job).await?;

        if let Err(e) = self.notifier.post_pending_comment(job).await {
            // The queued job is the source of truth; the comment is cosmetic.
            warn!(
                review_id = %job.id,
                pr = %job.pr_number,
                error = %e,
                "Failed to post pending comment"
            );
        }

        info!(
            review_id = %job.id,
            pr = %job.pr_number,
            repo = %job.repo_id(),
            "Queued review job"
        );

        Ok(DispatchResult {
            review_id: job.id,
            pr: PrSummary::from(job),
        })
    }
}
