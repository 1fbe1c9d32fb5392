//! The review job consumer.
//!
//! Drains queued jobs, invokes the external review backend, and settles each
//! message: acknowledge on success, schedule a redelivery on failure.
//!
//! # Per-message state machine
//!
//! `Received → Processing → {Acknowledged | RetryScheduled}`
//!
//! Messages in a batch are processed independently; one message's failure
//! never affects another's outcome, and a per-message error never exits the
//! consumer loop. The queue owns the retry counter and dead-lettering, so the
//! consumer does not track attempt counts.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

pub mod backend;

pub use backend::{BackendError, HttpReviewBackend, ReviewBackend, ReviewReceipt};

use crate::dispatch::queue::{MessageSource, QueueMessage};

/// Fixed backoff before a failed job is redelivered.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Consumer tuning knobs.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Delay before a failed message is redelivered.
    pub retry_delay: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Runs the consumer loop until the queue closes.
pub async fn run_consumer<S>(mut source: S, backend: Arc<dyn ReviewBackend>, config: ConsumerConfig)
where
    S: MessageSource,
{
    info!("Review consumer started");

    while let Some(batch) = source.receive().await {
        debug!(batch_size = batch.len(), "Received job batch");
        process_batch(batch, backend.as_ref(), &config).await;
    }

    info!("Queue closed; review consumer exiting");
}

/// Processes one batch, settling every message.
async fn process_batch<M>(batch: Vec<M>, backend: &dyn ReviewBackend, config: &ConsumerConfig)
where
    M: QueueMessage,
{
    for mut message in batch {
        process_message(&mut message, backend, config).await;
    }
}

/// Processes a single message: invoke the backend, then ack or retry.
async fn process_message<M>(message: &mut M, backend: &dyn ReviewBackend, config: &ConsumerConfig)
where
    M: QueueMessage,
{
    let job_id = message.job().id;
    debug!(review_id = %job_id, "Processing review job");

    match backend.request_review(message.job()).await {
        Ok(receipt) => {
            info!(
                review_id = %job_id,
                backend_review_id = %receipt.review_id,
                "Review completed"
            );
            message.ack().await;
        }
        Err(e) => {
            warn!(
                review_id = %job_id,
                error = %e,
                retry_delay_secs = config.retry_delay.as_secs(),
                "Review failed; scheduling retry"
            );
            message.retry(config.retry_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::types::{ReviewId, ReviewJob};
    use crate::webhooks::events::PullRequestPayload;
    use crate::webhooks::events::tests::pull_request_json;

    fn sample_job() -> ReviewJob {
        let payload = PullRequestPayload::from_value(&pull_request_json("opened")).unwrap();
        ReviewJob::pr_review(&payload)
    }

    /// How a test message was settled.
    #[derive(Debug, Clone, PartialEq)]
    enum Outcome {
        Acked,
        Retried(Duration),
    }

    /// Message double that records its settlement.
    struct TestMessage {
        job: ReviewJob,
        outcome: Arc<Mutex<Option<Outcome>>>,
    }

    impl TestMessage {
        fn new(job: ReviewJob) -> (Self, Arc<Mutex<Option<Outcome>>>) {
            let outcome = Arc::new(Mutex::new(None));
            (
                TestMessage {
                    job,
                    outcome: outcome.clone(),
                },
                outcome,
            )
        }
    }

    #[async_trait]
    impl QueueMessage for TestMessage {
        fn job(&self) -> &ReviewJob {
            &self.job
        }

        async fn ack(&mut self) {
            *self.outcome.lock().unwrap() = Some(Outcome::Acked);
        }

        async fn retry(&mut self, delay: Duration) {
            *self.outcome.lock().unwrap() = Some(Outcome::Retried(delay));
        }
    }

    /// Backend double that fails for a chosen set of jobs.
    struct TestBackend {
        fail_for: Vec<ReviewId>,
        calls: Mutex<Vec<ReviewId>>,
    }

    impl TestBackend {
        fn succeeding() -> Self {
            Self {
                fail_for: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_for(ids: Vec<ReviewId>) -> Self {
            Self {
                fail_for: ids,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ReviewBackend for TestBackend {
        async fn request_review(&self, job: &ReviewJob) -> Result<ReviewReceipt, BackendError> {
            self.calls.lock().unwrap().push(job.id);
            if self.fail_for.contains(&job.id) {
                Err(BackendError::Status { status: 500 })
            } else {
                Ok(ReviewReceipt {
                    review_id: format!("backend-{}", job.id),
                })
            }
        }
    }

    #[tokio::test]
    async fn successful_review_is_acknowledged() {
        let job = sample_job();
        let (msg, outcome) = TestMessage::new(job);
        let backend = TestBackend::succeeding();

        process_batch(vec![msg], &backend, &ConsumerConfig::default()).await;

        assert_eq!(*outcome.lock().unwrap(), Some(Outcome::Acked));
    }

    #[tokio::test]
    async fn backend_failure_schedules_sixty_second_retry() {
        let job = sample_job();
        let (msg, outcome) = TestMessage::new(job.clone());
        let backend = TestBackend::failing_for(vec![job.id]);

        process_batch(vec![msg], &backend, &ConsumerConfig::default()).await;

        // Retried with the fixed delay, never acknowledged.
        assert_eq!(
            *outcome.lock().unwrap(),
            Some(Outcome::Retried(Duration::from_secs(60)))
        );
    }

    #[tokio::test]
    async fn one_failure_does_not_affect_other_messages() {
        let good = sample_job();
        let bad = sample_job();
        let (good_msg, good_outcome) = TestMessage::new(good.clone());
        let (bad_msg, bad_outcome) = TestMessage::new(bad.clone());
        let backend = TestBackend::failing_for(vec![bad.id]);

        process_batch(
            vec![bad_msg, good_msg],
            &backend,
            &ConsumerConfig::default(),
        )
        .await;

        assert_eq!(*good_outcome.lock().unwrap(), Some(Outcome::Acked));
        assert_eq!(
            *bad_outcome.lock().unwrap(),
            Some(Outcome::Retried(Duration::from_secs(60)))
        );
        // Both messages reached the backend.
        assert_eq!(backend.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn consumer_loop_drains_queue_end_to_end() {
        use crate::dispatch::queue::{InMemoryQueue, JobQueue};

        let (queue, source) = InMemoryQueue::channel();
        let backend = Arc::new(TestBackend::succeeding());

        let job = sample_job();
        queue.send(&job).await.unwrap();
        drop(queue); // close the queue so the loop exits after draining

        run_consumer(source, backend.clone(), ConsumerConfig::default()).await;

        assert_eq!(*backend.calls.lock().unwrap(), vec![job.id]);
    }
}
