//! # sv-queue
//!
//! At-least-once job delivery for Surveyor autosave.
//!
//! The engine enqueues opaque JSON payloads through [`JobQueue::enqueue`];
//! workers pull [`Delivery`] values with [`JobQueue::next`] and report the
//! outcome with [`JobQueue::settle`]. Redelivery and dead-lettering are the
//! queue's business, driven by its [`RetryConfig`].
//!
//! [`LocalQueue`] is the in-process implementation.

mod error;
mod job;
mod local;
mod retry;

pub use error::{JobError, QueueError};
pub use job::{DeadLetter, Delivery, Job, JobId};
pub use local::{LocalQueue, QueueStats};
pub use retry::RetryConfig;

use std::future::Future;

/// Contract the engine and its workers consume from a job queue.
pub trait JobQueue: Send + Sync {
    /// Append a job carrying `payload` to `queue`.
    fn enqueue(
        &self,
        queue: &str,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<JobId, QueueError>> + Send;

    /// Wait for the next delivery. `None` once the queue is closed and drained.
    fn next(&self) -> impl Future<Output = Option<Delivery>> + Send;

    /// Report the outcome of a delivery obtained from [`Self::next`].
    ///
    /// `Ok` acknowledges the job. `JobError::Terminal` dead-letters it.
    /// `JobError::Retriable` schedules a redelivery or dead-letters the job
    /// once its attempts are exhausted.
    fn settle(
        &self,
        delivery: Delivery,
        outcome: Result<(), JobError>,
    ) -> impl Future<Output = ()> + Send;
}
