//! # sv-cache
//!
//! Key/value cache with per-entry TTL, used as a read accelerator for
//! questionnaire snapshots and a write-through target after updates.
//!
//! The engine depends only on the [`CacheStore`] contract. [`MokaCache`] is the
//! in-process implementation backed by `moka::future::Cache`.

mod error;
mod moka_cache;

pub use error::CacheError;
pub use moka_cache::MokaCache;

use std::future::Future;
use std::time::Duration;

/// Contract the engine consumes from a cache store.
///
/// Values are opaque strings (the engine stores JSON snapshots). Keys are
/// namespaced by the caller.
pub trait CacheStore: Send + Sync {
    /// Fetch a live value, or `None` when absent or expired.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, CacheError>> + Send;

    /// Store `value` under `key`, replacing any previous value and its TTL.
    fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Drop `key` if present.
    fn invalidate(&self, key: &str) -> impl Future<Output = Result<(), CacheError>> + Send;
}
