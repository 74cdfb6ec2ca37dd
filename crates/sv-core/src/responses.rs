//! Read-side shapes returned by engine operations.
//!
//! `QuestionnaireView` doubles as the cache snapshot: it is what `get`
//! returns and what write paths store under `questionId:{id}`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Component, ComponentData, Questionnaire};
use crate::ids::QuestionnaireId;

/// Denormalized questionnaire plus its ordered component list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireView {
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
    pub component_list: Vec<ComponentData>,
}

impl QuestionnaireView {
    /// Assemble a view from a stored questionnaire and its components.
    ///
    /// Components are expected in render order (`order` ascending).
    #[must_use]
    pub fn assemble(q: Questionnaire, components: &[Component]) -> Self {
        Self {
            id: q.id,
            owner_id: q.owner_id,
            title: q.title,
            description: q.description,
            css: q.css,
            js: q.js,
            is_published: q.is_published,
            is_star: q.is_star,
            is_deleted: q.is_deleted,
            answer_count: q.answer_count,
            created_at: q.created_at,
            component_list: components.iter().map(ComponentData::from).collect(),
        }
    }

    /// The `fe_id`s in render order.
    #[must_use]
    pub fn fe_ids(&self) -> Vec<&str> {
        self.component_list.iter().map(|c| c.fe_id.as_str()).collect()
    }
}

/// One row of a questionnaire listing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireSummary {
    pub id: QuestionnaireId,
    pub owner_id: i64,
    pub title: String,
    pub is_published: bool,
    pub is_star: bool,
    pub is_deleted: bool,
    pub answer_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<Questionnaire> for QuestionnaireSummary {
    fn from(q: Questionnaire) -> Self {
        Self {
            id: q.id,
            owner_id: q.owner_id,
            title: q.title,
            is_published: q.is_published,
            is_star: q.is_star,
            is_deleted: q.is_deleted,
            answer_count: q.answer_count,
            created_at: q.created_at,
        }
    }
}

/// A page of questionnaire summaries plus the unpaged total.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionnairePage {
    pub list: Vec<QuestionnaireSummary>,
    pub total: u64,
}

/// Response for operations that produce a new questionnaire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreatedResponse {
    pub id: QuestionnaireId,
}
