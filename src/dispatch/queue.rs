//! Queue capability interfaces and the in-memory implementation.
//!
//! The external queue owns delivery, retry scheduling, and dead-lettering; the
//! relay only needs two capabilities from it:
//!
//! - [`JobQueue::send`]: durably enqueue a job (producer side)
//! - [`MessageSource::receive`]: receive batches of messages that can be
//!   acknowledged or scheduled for redelivery (consumer side)
//!
//! Modeling these as traits lets tests substitute in-memory implementations,
//! and keeps the consumer loop independent of any particular queue service.
//!
//! [`InMemoryQueue`] is a tokio-channel-backed implementation with
//! at-least-once semantics: a message dropped without an explicit ack is
//! immediately redelivered, approximating a visibility timeout.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::types::{ReviewId, ReviewJob};

/// The queue refused or failed to accept a job.
///
/// The dispatcher never retries this itself: the webhook request fails with a
/// 5xx so that GitHub's own webhook redelivery applies.
#[derive(Debug, thiserror::Error)]
#[error("failed to enqueue job {job_id}: {reason}")]
pub struct EnqueueError {
    /// The job that could not be enqueued.
    pub job_id: ReviewId,

    /// Why the enqueue failed.
    pub reason: String,
}

/// Producer-side queue capability.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueues a job for the review consumer.
    async fn send(&self, job: &ReviewJob) -> Result<(), EnqueueError>;
}

/// A single received message.
///
/// Each message is settled independently: exactly one of [`ack`] or [`retry`]
/// should be called. A message dropped unsettled is redelivered by the queue.
///
/// [`ack`]: QueueMessage::ack
/// [`retry`]: QueueMessage::retry
#[async_trait]
pub trait QueueMessage: Send {
    /// The job carried by this message.
    fn job(&self) -> &ReviewJob;

    /// Acknowledges the message, removing it from the queue permanently.
    async fn ack(&mut self);

    /// Schedules the message for redelivery after `delay`, without
    /// acknowledging it. The queue owns the retry counter and eventual
    /// dead-lettering.
    async fn retry(&mut self, delay: Duration);
}

/// Consumer-side queue capability.
#[async_trait]
pub trait MessageSource: Send {
    /// The message type this source yields.
    type Message: QueueMessage;

    /// Receives the next batch of messages.
    ///
    /// Batch size and ordering are determined by the queue; callers must not
    /// assume any intra-batch ordering. Returns `None` when the queue is
    /// closed and fully drained.
    async fn receive(&mut self) -> Option<Vec<Self::Message>>;
}

/// Maximum number of messages returned per in-memory batch.
const DEFAULT_MAX_BATCH: usize = 10;

/// Producer half of the in-memory queue.
#[derive(Clone)]
pub struct InMemoryQueue {
    tx: mpsc::UnboundedSender<ReviewJob>,
}

/// Consumer half of the in-memory queue.
pub struct InMemorySource {
    rx: mpsc::UnboundedReceiver<ReviewJob>,
    /// Kept weakly so retries and unsettled drops can re-enqueue without
    /// holding the channel open after the producer is gone.
    tx: mpsc::WeakUnboundedSender<ReviewJob>,
    max_batch: usize,
}

impl InMemoryQueue {
    /// Creates a connected producer/consumer pair.
    pub fn channel() -> (InMemoryQueue, InMemorySource) {
        let (tx, rx) = mpsc::unbounded_channel();
        let weak = tx.downgrade();
        (
            InMemoryQueue { tx },
            InMemorySource {
                rx,
                tx: weak,
                max_batch: DEFAULT_MAX_BATCH,
            },
        )
    }
}

#[async_trait]
impl JobQueue for InMemoryQueue {
    async fn send(&self, job: &ReviewJob) -> Result<(), EnqueueError> {
        self.tx.send(job.clone()).map_err(|_| EnqueueError {
            job_id: job.id,
            reason: "queue channel closed".to_string(),
        })
    }
}

impl InMemorySource {
    /// Takes the next already-delivered message without waiting.
    ///
    /// Returns `None` if the queue is currently empty. Useful for tests that
    /// need to assert exactly how many jobs were enqueued.
    pub fn try_next(&mut self) -> Option<InMemoryMessage> {
        self.rx.try_recv().ok().map(|job| InMemoryMessage {
            job,
            tx: self.tx.clone(),
            settled: false,
        })
    }
}

#[async_trait]
impl MessageSource for InMemorySource {
    type Message = InMemoryMessage;

    async fn receive(&mut self) -> Option<Vec<InMemoryMessage>> {
        // Wait for at least one message, then drain whatever else is ready
        // up to the batch cap.
        let first = self.rx.recv().await?;
        let mut batch = vec![InMemoryMessage {
            job: first,
            tx: self.tx.clone(),
            settled: false,
        }];

        while batch.len() < self.max_batch {
            match self.rx.try_recv() {
                Ok(job) => batch.push(InMemoryMessage {
                    job,
                    tx: self.tx.clone(),
                    settled: false,
                }),
                Err(_) => break,
            }
        }

        Some(batch)
    }
}

/// A message delivered by the in-memory queue.
pub struct InMemoryMessage {
    job: ReviewJob,
    tx: mpsc::WeakUnboundedSender<ReviewJob>,
    settled: bool,
}

#[async_trait]
impl QueueMessage for InMemoryMessage {
    fn job(&self) -> &ReviewJob {
        &self.job
    }

    async fn ack(&mut self) {
        self.settled = true;
    }

    async fn retry(&mut self, delay: Duration) {
        self.settled = true;
        let tx = self.tx.clone();
        let job = self.job.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Redelivery is dropped if the queue has shut down meanwhile.
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(job);
            }
        });
    }
}

impl Drop for InMemoryMessage {
    fn drop(&mut self) {
        // Unsettled messages are redelivered, so a consumer crash between
        // receive and ack does not lose the job.
        if !self.settled {
            if let Some(tx) = self.tx.upgrade() {
                let _ = tx.send(self.job.clone());
            }
        }
    }
}
