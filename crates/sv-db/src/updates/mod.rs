//! Partial-update payloads and their builders.

pub mod questionnaire;

pub use questionnaire::{QuestionnairePatch, QuestionnairePatchBuilder};
