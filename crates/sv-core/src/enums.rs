//! Component kinds and the questionnaire publish lifecycle.
//!
//! `ComponentType` serializes with the camelCase names clients send
//! (`questionRadio`, `questionInput`, ...). The same string is stored in SQL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ComponentType
// ---------------------------------------------------------------------------

/// The fixed set of question kinds a component can render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ComponentType {
    QuestionTitle,
    QuestionTextArea,
    QuestionRadio,
    QuestionParagraph,
    QuestionInput,
    QuestionInfo,
    QuestionCheckbox,
}

impl ComponentType {
    pub const ALL: [Self; 7] = [
        Self::QuestionTitle,
        Self::QuestionTextArea,
        Self::QuestionRadio,
        Self::QuestionParagraph,
        Self::QuestionInput,
        Self::QuestionInfo,
        Self::QuestionCheckbox,
    ];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuestionTitle => "questionTitle",
            Self::QuestionTextArea => "questionTextArea",
            Self::QuestionRadio => "questionRadio",
            Self::QuestionParagraph => "questionParagraph",
            Self::QuestionInput => "questionInput",
            Self::QuestionInfo => "questionInfo",
            Self::QuestionCheckbox => "questionCheckbox",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PublishState
// ---------------------------------------------------------------------------

/// Publish lifecycle of a questionnaire.
///
/// ```text
/// draft ⇄ published
/// ```
///
/// Both directions are allowed. Leaving `published` wipes collected answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    Draft,
    Published,
}

impl PublishState {
    /// Map the stored `is_published` flag to a state.
    #[must_use]
    pub const fn from_flag(is_published: bool) -> Self {
        if is_published {
            Self::Published
        } else {
            Self::Draft
        }
    }

    /// The `is_published` flag value for this state.
    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }

    /// Valid next states from the current state (self-loops included).
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft | Self::Published => &[Self::Draft, Self::Published],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether the component list and descriptive fields may change.
    #[must_use]
    pub const fn allows_structure_edits(self) -> bool {
        matches!(self, Self::Draft)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
