//! Engine operations, grouped by the entity they act on.

pub mod answer;
pub mod autosave;
pub mod questionnaire;

pub use questionnaire::ListQuery;
