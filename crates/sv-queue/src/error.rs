//! Queue and job error types.

use thiserror::Error;

/// Errors raised by queue operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The queue no longer accepts jobs.
    #[error("queue '{0}' is closed")]
    Closed(String),

    /// The job targets a queue this handle does not serve.
    #[error("unknown queue '{0}'")]
    UnknownQueue(String),
}

/// Outcome of a failed job, as reported by the consumer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    /// Retrying cannot succeed. The job is dead-lettered immediately.
    #[error("terminal job failure: {0}")]
    Terminal(String),

    /// The job may succeed on redelivery; the queue's backoff policy applies.
    #[error("job processing failed: {0}")]
    Retriable(String),
}

impl JobError {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}
