//! Cache error types.
//!
//! Callers in the engine never propagate these: a failed cache operation is
//! logged as a warning and the operation continues against the store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing cache could not be reached.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// The value exceeds the per-entry size limit.
    #[error("value for '{key}' is {size} bytes, limit is {limit}")]
    ValueTooLarge { key: String, size: usize, limit: usize },

    /// A snapshot could not be encoded or decoded.
    #[error("cache payload error: {0}")]
    Payload(String),
}
