use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{AnswerId, QuestionnaireId};

/// One submission against a questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionnaireId,
    pub created_at: DateTime<Utc>,
    pub items: Vec<AnswerItem>,
}

/// The value submitted for one component, referenced by `fe_id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerItem {
    pub id: i64,
    pub answer_id: AnswerId,
    pub fe_id: String,
    pub value: String,
}

/// A submitted value before it is stored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerInput {
    #[serde(rename = "fe_id")]
    pub fe_id: String,
    pub value: String,
}
