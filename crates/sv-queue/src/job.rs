//! Job envelope and delivery types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queue-assigned job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// A named job with an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub queue: String,
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
}

/// One delivery attempt of a job. `attempt` starts at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub job: Job,
    pub attempt: u32,
}

/// A job that will not be delivered again.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadLetter {
    pub job: Job,
    pub attempts: u32,
    pub reason: String,
}
