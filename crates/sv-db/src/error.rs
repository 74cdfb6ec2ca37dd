//! Database error types for sv-db.
//!
//! These stay inside the store layer. `QuestionnaireService` logs them and
//! maps them onto `sv_core::errors::EngineError` before returning.

use sv_core::errors::EngineError;
use sv_core::ids::QuestionnaireId;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned an unexpected shape.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The addressed entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected before touching the store.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A JSON column or payload could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl DatabaseError {
    pub(crate) fn questionnaire_not_found(id: QuestionnaireId) -> Self {
        Self::NotFound {
            entity: "questionnaire",
            id: id.to_string(),
        }
    }

    /// Collapse into the caller-facing taxonomy.
    ///
    /// `NotFound` and `Validation` pass through unchanged. Everything else is
    /// logged with full detail and reported as a bare `Persistence` failure.
    pub(crate) fn into_engine(self, operation: &'static str) -> EngineError {
        match self {
            Self::NotFound { entity, id } => EngineError::NotFound { entity, id },
            Self::Validation(msg) => EngineError::Validation(msg),
            other => {
                tracing::error!(operation, error = %other, "store operation failed");
                EngineError::persistence(operation)
            }
        }
    }
}
