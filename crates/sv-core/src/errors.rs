//! Caller-facing error taxonomy for the mutation engine.
//!
//! Store-level errors (`DatabaseError` in `sv-db`) and cache errors
//! (`CacheError` in `sv-cache`) never reach callers directly: store failures
//! are logged and collapsed into [`EngineError::Persistence`], cache failures
//! are logged as warnings and swallowed.

use thiserror::Error;

/// Errors returned by engine operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Entity lookup returned no result.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    /// Caller input was malformed (bad id, undecodable payload, unknown component key).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store rejected or failed an operation. Carries no store detail.
    #[error("failed to {operation}")]
    Persistence { operation: &'static str },
}

impl EngineError {
    /// Shorthand for a missing questionnaire.
    #[must_use]
    pub fn questionnaire_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "questionnaire",
            id: id.to_string(),
        }
    }

    #[must_use]
    pub const fn persistence(operation: &'static str) -> Self {
        Self::Persistence { operation }
    }

    /// Whether this is a `NotFound`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
