//! Identifier types.
//!
//! Questionnaires are keyed by a store-assigned positive integer. Components
//! are keyed by the caller-supplied `fe_id` string; their row ids stay inside
//! the store layer.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Prefix for `fe_id` values generated server-side (questionnaire copies).
pub const PREFIX_COMPONENT: &str = "fe";

/// Store-assigned questionnaire identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct QuestionnaireId(i64);

impl QuestionnaireId {
    /// Wrap a raw id read from the store.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parse a caller-supplied id (path segment, CLI argument).
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` if the input is not a positive
    /// base-10 integer.
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        let trimmed = raw.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| EngineError::Validation(format!("invalid questionnaire id '{raw}'")))?;
        if value <= 0 {
            return Err(EngineError::Validation(format!(
                "questionnaire id must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }
}

impl FromStr for QuestionnaireId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for QuestionnaireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<QuestionnaireId> for i64 {
    fn from(id: QuestionnaireId) -> Self {
        id.0
    }
}

/// Store-assigned answer identifier.
pub type AnswerId = i64;
