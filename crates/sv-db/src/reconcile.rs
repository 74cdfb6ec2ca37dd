//! Component list reconciliation keyed by `fe_id`.
//!
//! [`ComponentDiff::plan`] compares the stored components with the caller's
//! list and sorts every `fe_id` into delete, update or insert. Applying the
//! plan is the orchestrator's job and happens inside its transaction.

use std::collections::HashSet;

use sv_core::entities::{Component, ComponentData};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("component fe_id must not be empty")]
    EmptyKey,

    #[error("duplicate component fe_id: {0}")]
    DuplicateKey(String),
}

/// Key sets produced by comparing stored and incoming components.
///
/// Each list keeps the order in which keys appear in its source list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentDiff {
    pub to_delete: Vec<String>,
    pub to_update: Vec<String>,
    pub to_insert: Vec<String>,
}

impl ComponentDiff {
    /// Plan the changes that turn `existing` into `incoming`.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError` if an incoming `fe_id` is blank or repeated.
    pub fn plan(
        existing: &[Component],
        incoming: &[ComponentData],
    ) -> Result<Self, ReconcileError> {
        let mut seen = HashSet::with_capacity(incoming.len());
        for c in incoming {
            if c.fe_id.trim().is_empty() {
                return Err(ReconcileError::EmptyKey);
            }
            if !seen.insert(c.fe_id.as_str()) {
                return Err(ReconcileError::DuplicateKey(c.fe_id.clone()));
            }
        }

        let stored: HashSet<&str> = existing.iter().map(|c| c.fe_id.as_str()).collect();

        let to_delete = existing
            .iter()
            .filter(|c| !seen.contains(c.fe_id.as_str()))
            .map(|c| c.fe_id.clone())
            .collect();
        let (to_update, to_insert): (Vec<String>, Vec<String>) = incoming
            .iter()
            .map(|c| c.fe_id.clone())
            .partition(|fe_id| stored.contains(fe_id.as_str()));

        Ok(Self {
            to_delete,
            to_update,
            to_insert,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sv_core::enums::ComponentType;
    use sv_core::ids::QuestionnaireId;

    fn stored(fe_id: &str, row_id: i64) -> Component {
        Component {
            row_id,
            question_id: QuestionnaireId::new(1),
            fe_id: fe_id.into(),
            component_type: ComponentType::QuestionInput,
            title: fe_id.into(),
            props: serde_json::json!({}),
            order: row_id,
            is_hidden: false,
            is_locked: false,
        }
    }

    fn incoming(fe_id: &str) -> ComponentData {
        ComponentData::from(&stored(fe_id, 0))
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn replaces_a_b_with_b_c() {
        let diff = ComponentDiff::plan(
            &[stored("a", 1), stored("b", 2)],
            &[incoming("b"), incoming("c")],
        )
        .unwrap();
        assert_eq!(
            diff,
            ComponentDiff {
                to_delete: keys(&["a"]),
                to_update: keys(&["b"]),
                to_insert: keys(&["c"]),
            }
        );
    }

    #[test]
    fn empty_incoming_deletes_everything() {
        let diff = ComponentDiff::plan(&[stored("a", 1), stored("b", 2)], &[]).unwrap();
        assert_eq!(diff.to_delete, keys(&["a", "b"]));
        assert!(diff.to_update.is_empty());
        assert!(diff.to_insert.is_empty());
    }

    #[test]
    fn first_save_inserts_everything() {
        let diff = ComponentDiff::plan(&[], &[incoming("x"), incoming("y")]).unwrap();
        assert_eq!(diff.to_insert, keys(&["x", "y"]));
        assert!(diff.to_delete.is_empty());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = ComponentDiff::plan(&[], &[incoming("a"), incoming("a")]).unwrap_err();
        assert_eq!(err, ReconcileError::DuplicateKey("a".into()));
    }

    #[test]
    fn blank_keys_are_rejected() {
        let err = ComponentDiff::plan(&[], &[incoming(" ")]).unwrap_err();
        assert_eq!(err, ReconcileError::EmptyKey);
    }
}
