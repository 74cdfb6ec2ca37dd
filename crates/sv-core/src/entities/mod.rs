//! Entity structs for all Surveyor domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation of payloads that cross the cache and queue boundaries.

mod answer;
mod component;
mod questionnaire;

pub use answer::{Answer, AnswerInput, AnswerItem};
pub use component::{Component, ComponentData};
pub use questionnaire::Questionnaire;
