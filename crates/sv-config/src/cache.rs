//! Cache store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Snapshot lifetime, one hour.
const fn default_ttl_secs() -> u64 {
    3_600
}

const fn default_max_capacity() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Time-to-live of a questionnaire snapshot, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached snapshots.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,

    /// Whether `get` stores the snapshot it assembled on a cache miss.
    /// Off by default: only write paths populate the cache.
    #[serde(default)]
    pub populate_on_read: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_capacity: default_max_capacity(),
            populate_on_read: false,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl(), Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 10_000);
        assert!(!config.populate_on_read);
    }
}
