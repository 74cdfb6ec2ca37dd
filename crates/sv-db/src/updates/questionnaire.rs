//! Questionnaire patch and builder.
//!
//! A patch carries only the fields the caller wants to change. Absent fields
//! are left untouched, so applying the same patch twice yields the same row.

use serde::{Deserialize, Serialize};
use sv_core::entities::ComponentData;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnairePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_star: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_list: Option<Vec<ComponentData>>,
}

pub struct QuestionnairePatchBuilder(QuestionnairePatch);

impl Default for QuestionnairePatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionnairePatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(QuestionnairePatch::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.0.css = Some(css.into());
        self
    }

    #[must_use]
    pub fn js(mut self, js: impl Into<String>) -> Self {
        self.0.js = Some(js.into());
        self
    }

    #[must_use]
    pub const fn published(mut self, is_published: bool) -> Self {
        self.0.is_published = Some(is_published);
        self
    }

    #[must_use]
    pub const fn star(mut self, is_star: bool) -> Self {
        self.0.is_star = Some(is_star);
        self
    }

    #[must_use]
    pub const fn deleted(mut self, is_deleted: bool) -> Self {
        self.0.is_deleted = Some(is_deleted);
        self
    }

    #[must_use]
    pub fn components(mut self, components: Vec<ComponentData>) -> Self {
        self.0.component_list = Some(components);
        self
    }

    #[must_use]
    pub fn build(self) -> QuestionnairePatch {
        self.0
    }
}
