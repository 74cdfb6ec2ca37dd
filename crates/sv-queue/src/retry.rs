//! Redelivery backoff policy.
//!
//! Retriable job failures are redelivered after an exponentially growing
//! delay until `max_attempts` deliveries have been made; the job is then
//! dead-lettered.

use std::time::Duration;

/// Configuration for redelivery of retriable job failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of deliveries (including the initial one).
    pub max_attempts: u32,
    /// Delay before the first redelivery.
    pub base_delay: Duration,
    /// Maximum delay between deliveries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Whether a job that just failed its `attempt`-th delivery gets another one.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay before redelivering a job whose `attempt`-th delivery failed.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }
}
