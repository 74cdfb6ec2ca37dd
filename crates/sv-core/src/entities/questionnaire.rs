use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PublishState;
use crate::ids::QuestionnaireId;

/// A survey document. Components are loaded separately.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: QuestionnaireId,
    pub owner_id: i64,
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub css: String,
    pub js: String,
    pub is_published: bool,
    pub is_star: bool,
    pub is_deleted: bool,
    pub answer_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Questionnaire {
    #[must_use]
    pub const fn publish_state(&self) -> PublishState {
        PublishState::from_flag(self.is_published)
    }
}
