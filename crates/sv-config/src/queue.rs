//! Autosave queue and worker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_name() -> String {
    "question_save".to_string()
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_base_delay_ms() -> u64 {
    200
}

const fn default_max_delay_ms() -> u64 {
    10_000
}

const fn default_workers() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Queue name autosave jobs are enqueued on.
    #[serde(default = "default_name")]
    pub name: String,

    /// Deliveries per job before it is dead-lettered (including the first).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first redelivery; doubles per attempt.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Cap on the redelivery delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Number of concurrent autosave workers.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            workers: default_workers(),
        }
    }
}

impl QueueConfig {
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}
