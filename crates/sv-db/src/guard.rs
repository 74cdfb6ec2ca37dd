//! Publish guard: which patch fields a questionnaire accepts in its current
//! publish state.
//!
//! Pure. The orchestrator feeds it the stored state and the caller's patch
//! and applies only what comes back in [`GuardDecision::accepted`].

use sv_core::enums::PublishState;

use crate::updates::QuestionnairePatch;

/// Outcome of evaluating a patch against a publish state.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardDecision {
    /// The subset of the patch that may be applied.
    pub accepted: QuestionnairePatch,
    /// Delete every answer and reset `answer_count` when applying.
    pub wipe_answers: bool,
    /// State the questionnaire is in after the accepted patch is applied.
    pub next_state: PublishState,
    /// Names of fields that were present but silently dropped.
    pub dropped: Vec<&'static str>,
}

pub struct PublishGuard;

impl PublishGuard {
    /// Filter `patch` according to `state`.
    ///
    /// A draft accepts everything. A published questionnaire accepts only
    /// `isStar`, `isDeleted` and `isPublished`; un-publishing sets
    /// `wipe_answers`. Other fields in the same patch are dropped, including
    /// when the patch also un-publishes.
    #[must_use]
    pub fn evaluate(state: PublishState, patch: &QuestionnairePatch) -> GuardDecision {
        let next_state = patch
            .is_published
            .map_or(state, PublishState::from_flag);

        if state.allows_structure_edits() {
            return GuardDecision {
                accepted: patch.clone(),
                wipe_answers: false,
                next_state,
                dropped: Vec::new(),
            };
        }

        let mut dropped = Vec::new();
        if patch.title.is_some() {
            dropped.push("title");
        }
        if patch.description.is_some() {
            dropped.push("desc");
        }
        if patch.css.is_some() {
            dropped.push("css");
        }
        if patch.js.is_some() {
            dropped.push("js");
        }
        if patch.component_list.is_some() {
            dropped.push("componentList");
        }

        GuardDecision {
            accepted: QuestionnairePatch {
                is_published: patch.is_published,
                is_star: patch.is_star,
                is_deleted: patch.is_deleted,
                ..QuestionnairePatch::default()
            },
            wipe_answers: next_state == PublishState::Draft,
            next_state,
            dropped,
        }
    }
}
