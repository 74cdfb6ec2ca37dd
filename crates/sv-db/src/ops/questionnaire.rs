//! Questionnaire operations: create, get, update, delete, copy, list.

use libsql::Connection;
use sv_cache::CacheStore;
use sv_core::entities::ComponentData;
use sv_core::errors::EngineError;
use sv_core::ids::QuestionnaireId;
use sv_core::responses::{QuestionnairePage, QuestionnaireSummary, QuestionnaireView};
use sv_queue::JobQueue;

use crate::SurveyDb;
use crate::error::DatabaseError;
use crate::guard::PublishGuard;
use crate::reconcile::ComponentDiff;
use crate::repos::questionnaire::{ListFilter, NewQuestionnaire};
use crate::repos::{answer, component, questionnaire};
use crate::service::QuestionnaireService;
use crate::updates::QuestionnairePatch;

const PLACEHOLDER_TITLE: &str = "Questionnaire title";
const PLACEHOLDER_DESCRIPTION: &str = "Questionnaire description";
const COPY_SUFFIX: &str = " (copy)";
const MAX_PAGE_SIZE: u32 = 100;

/// Listing filters and paging. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub owner_id: Option<i64>,
    pub keyword: Option<String>,
    pub is_star: Option<bool>,
    pub is_deleted: bool,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            owner_id: None,
            keyword: None,
            is_star: None,
            is_deleted: false,
            page: 1,
            page_size: 10,
        }
    }
}

async fn load_view(
    conn: &Connection,
    id: QuestionnaireId,
) -> Result<QuestionnaireView, DatabaseError> {
    let q = questionnaire::get(conn, id).await?;
    let components = component::list_for(conn, id).await?;
    Ok(QuestionnaireView::assemble(q, &components))
}

/// Replace the stored component list with `incoming`, keyed by `fe_id`.
async fn reconcile_components(
    conn: &Connection,
    id: QuestionnaireId,
    incoming: &[ComponentData],
) -> Result<(), DatabaseError> {
    let existing = component::list_for(conn, id).await?;
    let diff = ComponentDiff::plan(&existing, incoming)
        .map_err(|e| DatabaseError::Validation(e.to_string()))?;
    tracing::debug!(
        questionnaire = %id,
        delete = diff.to_delete.len(),
        update = diff.to_update.len(),
        insert = diff.to_insert.len(),
        "component reconciliation plan"
    );

    if !diff.to_delete.is_empty() {
        answer::delete_items_for_components(conn, id, &diff.to_delete).await?;
        component::delete_by_fe_ids(conn, id, &diff.to_delete).await?;
        answer::delete_orphans(conn, id).await?;
    }
    for data in incoming {
        component::upsert(conn, id, data).await?;
    }
    Ok(())
}

async fn apply_update(
    conn: &Connection,
    id: QuestionnaireId,
    patch: &QuestionnairePatch,
) -> Result<QuestionnaireView, DatabaseError> {
    let current = questionnaire::get(conn, id).await?;
    let decision = PublishGuard::evaluate(current.publish_state(), patch);
    if !decision.dropped.is_empty() {
        tracing::debug!(
            questionnaire = %id,
            state = %current.publish_state(),
            dropped = ?decision.dropped,
            "fields not writable in current state"
        );
    }

    if let Some(ref incoming) = decision.accepted.component_list {
        reconcile_components(conn, id, incoming).await?;
    }
    if decision.wipe_answers {
        let wiped = answer::wipe(conn, &[id.get()]).await?;
        tracing::info!(questionnaire = %id, answers = wiped, "unpublished, answers wiped");
    }

    let answer_count = answer::count_for(conn, id).await?;
    questionnaire::apply_fields(conn, id, &decision.accepted, answer_count).await?;
    load_view(conn, id).await
}

async fn copy_rows(
    conn: &Connection,
    id: QuestionnaireId,
) -> Result<QuestionnaireId, DatabaseError> {
    let source = questionnaire::get(conn, id).await?;
    let components = component::list_for(conn, id).await?;

    let title = format!("{}{COPY_SUFFIX}", source.title);
    let new_id = questionnaire::insert(
        conn,
        &NewQuestionnaire {
            owner_id: source.owner_id,
            title: &title,
            description: &source.description,
            css: &source.css,
            js: &source.js,
        },
    )
    .await?;

    for c in &components {
        let mut data = ComponentData::from(c);
        data.fe_id = component::generate_fe_id(conn).await?;
        component::upsert(conn, new_id, &data).await?;
    }
    Ok(new_id)
}

async fn delete_rows(conn: &Connection, ids: &[i64]) -> Result<u64, DatabaseError> {
    answer::wipe(conn, ids).await?;
    component::delete_for_questionnaires(conn, ids).await?;
    questionnaire::delete_many(conn, ids).await
}

fn id_list(ids: &[QuestionnaireId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

impl<C: CacheStore, Q: JobQueue> QuestionnaireService<C, Q> {
    /// Create an empty questionnaire owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// `Persistence` if the insert fails.
    pub async fn create(&self, owner_id: i64) -> Result<QuestionnaireId, EngineError> {
        const OP: &str = "create questionnaire";
        let tx = self.db().begin().await.map_err(|e| e.into_engine(OP))?;
        let result = questionnaire::insert(
            &tx,
            &NewQuestionnaire {
                owner_id,
                title: PLACEHOLDER_TITLE,
                description: PLACEHOLDER_DESCRIPTION,
                css: "",
                js: "",
            },
        )
        .await;
        let id = SurveyDb::finish(tx, result)
            .await
            .map_err(|e| e.into_engine(OP))?;
        tracing::info!(owner_id, questionnaire = %id, "questionnaire created");
        Ok(id)
    }

    /// Read a questionnaire with its components in render order.
    ///
    /// Served from the cache when a snapshot is present.
    ///
    /// # Errors
    ///
    /// `NotFound` if the questionnaire does not exist, `Persistence` if the
    /// store read fails.
    pub async fn get(&self, id: QuestionnaireId) -> Result<QuestionnaireView, EngineError> {
        const OP: &str = "read questionnaire";
        if let Some(view) = self.read_snapshot(id).await {
            tracing::debug!(questionnaire = %id, "served from cache");
            return Ok(view);
        }

        let conn = self.db().connect().await.map_err(|e| e.into_engine(OP))?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| DatabaseError::from(e).into_engine(OP))?;
        let result = load_view(&tx, id).await;
        let view = SurveyDb::finish(tx, result)
            .await
            .map_err(|e| e.into_engine(OP))?;

        if self.options().populate_on_read {
            self.write_snapshot(&view).await;
        }
        Ok(view)
    }

    /// Apply a partial update under the publish guard.
    ///
    /// All-or-nothing: fields, component reconciliation, answer wipe and the
    /// recomputed answer count commit together. The merged view is written to
    /// the cache afterwards.
    ///
    /// # Errors
    ///
    /// `NotFound` if the questionnaire does not exist, `Validation` for a
    /// component list with blank or repeated `fe_id`s, `Persistence` for store
    /// failures. Nothing is written on error.
    pub async fn update(
        &self,
        id: QuestionnaireId,
        patch: QuestionnairePatch,
    ) -> Result<QuestionnaireView, EngineError> {
        const OP: &str = "update questionnaire";
        let tx = self.db().begin().await.map_err(|e| e.into_engine(OP))?;
        let result = apply_update(&tx, id, &patch).await;
        let view = SurveyDb::finish(tx, result)
            .await
            .map_err(|e| e.into_engine(OP))?;

        self.write_snapshot(&view).await;
        Ok(view)
    }

    /// Delete questionnaires with their components and answers.
    ///
    /// Ids that do not exist are skipped as long as at least one matched.
    /// Returns the number of questionnaires deleted.
    ///
    /// # Errors
    ///
    /// `NotFound` if none of `ids` existed, `Persistence` for store failures.
    pub async fn delete(&self, ids: &[QuestionnaireId]) -> Result<u64, EngineError> {
        const OP: &str = "delete questionnaires";
        let mut raw: Vec<i64> = ids.iter().copied().map(QuestionnaireId::get).collect();
        raw.sort_unstable();
        raw.dedup();
        if raw.is_empty() {
            return Err(EngineError::questionnaire_not_found("[]"));
        }

        let tx = self.db().begin().await.map_err(|e| e.into_engine(OP))?;
        let result = match delete_rows(&tx, &raw).await {
            Ok(0) => Err(DatabaseError::NotFound {
                entity: "questionnaire",
                id: id_list(ids),
            }),
            other => other,
        };
        let deleted = SurveyDb::finish(tx, result)
            .await
            .map_err(|e| e.into_engine(OP))?;

        for id in &raw {
            self.invalidate_snapshot(QuestionnaireId::new(*id)).await;
        }
        tracing::info!(requested = raw.len(), deleted, "questionnaires deleted");
        Ok(deleted)
    }

    /// Duplicate a questionnaire as a fresh draft with new component keys.
    ///
    /// # Errors
    ///
    /// `NotFound` if the source does not exist, `Persistence` for store failures.
    pub async fn copy(&self, id: QuestionnaireId) -> Result<QuestionnaireId, EngineError> {
        const OP: &str = "copy questionnaire";
        let tx = self.db().begin().await.map_err(|e| e.into_engine(OP))?;
        let result = copy_rows(&tx, id).await;
        let new_id = SurveyDb::finish(tx, result)
            .await
            .map_err(|e| e.into_engine(OP))?;
        tracing::info!(source = %id, questionnaire = %new_id, "questionnaire copied");
        Ok(new_id)
    }

    /// Page through questionnaires, newest first.
    ///
    /// # Errors
    ///
    /// `Validation` for a zero page or a page size outside `1..=100`,
    /// `Persistence` for store failures.
    pub async fn list(&self, query: &ListQuery) -> Result<QuestionnairePage, EngineError> {
        const OP: &str = "list questionnaires";
        if query.page == 0 {
            return Err(EngineError::Validation("page starts at 1".into()));
        }
        if query.page_size == 0 || query.page_size > MAX_PAGE_SIZE {
            return Err(EngineError::Validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let filter = ListFilter {
            owner_id: query.owner_id,
            keyword: query.keyword.as_deref(),
            is_star: query.is_star,
            is_deleted: query.is_deleted,
        };
        let offset = u64::from(query.page - 1) * u64::from(query.page_size);

        let conn = self.db().connect().await.map_err(|e| e.into_engine(OP))?;
        let rows = questionnaire::list(&conn, &filter, query.page_size, offset)
            .await
            .map_err(|e| e.into_engine(OP))?;
        let total = questionnaire::count(&conn, &filter)
            .await
            .map_err(|e| e.into_engine(OP))?;

        Ok(QuestionnairePage {
            list: rows.into_iter().map(QuestionnaireSummary::from).collect(),
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sv_core::enums::ComponentType;

    use super::*;
    use crate::test_support::helpers::{component, seed_answer, test_service};
    use crate::updates::QuestionnairePatchBuilder;

    #[tokio::test]
    async fn create_inserts_placeholder_draft() {
        let (_dir, svc) = test_service().await;
        let id = svc.create(7).await.unwrap();
        let view = svc.get(id).await.unwrap();
        assert_eq!(view.owner_id, 7);
        assert_eq!(view.title, PLACEHOLDER_TITLE);
        assert_eq!(view.description, PLACEHOLDER_DESCRIPTION);
        assert!(!view.is_published);
        assert!(view.component_list.is_empty());
        assert_eq!(view.answer_count, 0);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (_dir, svc) = test_service().await;
        let err = svc.get(QuestionnaireId::new(404)).await.unwrap_err();
        assert_eq!(err, EngineError::questionnaire_not_found(404));
    }

    #[tokio::test]
    async fn update_missing_is_not_found_and_writes_nothing() {
        let (_dir, svc) = test_service().await;
        let patch = QuestionnairePatchBuilder::new().title("x").build();
        let err = svc.update(QuestionnaireId::new(9), patch).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(svc.cache().get("questionId:9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_applies_scalar_fields_and_writes_cache() {
        let (_dir, svc) = test_service().await;
        let id = svc.create(1).await.unwrap();
        let patch = QuestionnairePatchBuilder::new()
            .title("Feedback")
            .description("Tell us")
            .css("body{}")
            .js("void 0")
            .star(true)
            .build();
        let view = svc.update(id, patch).await.unwrap();
        assert_eq!(view.title, "Feedback");
        assert_eq!(view.description, "Tell us");
        assert_eq!(view.css, "body{}");
        assert_eq!(view.js, "void 0");
        assert!(view.is_star);

        let cached = svc.cache().get(&format!("questionId:{id}")).await.unwrap().unwrap();
        let cached: QuestionnaireView = serde_json::from_str(&cached).unwrap();
        assert_eq!(cached, view);
    }

    #[tokio::test]
    async fn update_keeps_primary_key_of_surviving_components() {
        let (_dir, svc) = test_service().await;
        let id = svc.create(1).await.unwrap();
        svc.update(
            id,
            QuestionnairePatchBuilder::new()
                .components(vec![component("a", 0), component("b", 1)])
                .build(),
        )
        .await
        .unwrap();
        let conn = svc.db().connect().await.unwrap();
        let before = component::list_for(&conn, id).await.unwrap();

        let mut renamed = component("b", 0);
        renamed.title = "B renamed".into();
        renamed.component_type = ComponentType::QuestionTextArea;
        svc.update(id, QuestionnairePatchBuilder::new().components(vec![renamed]).build())
            .await
            .unwrap();
        let after = component::list_for(&conn, id).await.unwrap();

        assert_eq!(after.len(), 1);
        assert_eq!(after[0].row_id, before[1].row_id);
        assert_eq!(after[0].title, "B renamed");
        assert_eq!(after[0].component_type, ComponentType::QuestionTextArea);
        assert_eq!(after[0].order, 0);
    }

    #[tokio::test]
    async fn duplicate_fe_ids_are_rejected_without_side_effects() {
        let (_dir, svc) = test_service().await;
        let id = svc.create(1).await.unwrap();
        let patch = QuestionnairePatchBuilder::new()
            .title("changed")
            .components(vec![component("a", 0), component("a", 1)])
            .build();
        let err = svc.update(id, patch).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let view = svc.get(id).await.unwrap();
        assert_eq!(view.title, PLACEHOLDER_TITLE);
        assert!(view.component_list.is_empty());
    }

    async fn scalar(svc: &crate::service::LocalService, sql: &str) -> i64 {
        let conn = svc.db().connect().await.unwrap();
        let mut rows = conn.query(sql, ()).await.unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }

    #[tokio::test]
    async fn store_failure_after_deletes_rolls_back_whole_update() {
        let (_dir, svc) = test_service().await;
        let id = svc.create(1).await.unwrap();
        svc.update(
            id,
            QuestionnairePatchBuilder::new()
                .components(vec![component("a", 0), component("b", 1)])
                .build(),
        )
        .await
        .unwrap();
        seed_answer(&svc, id, &[("a", "only a")]).await;
        seed_answer(&svc, id, &[("a", "x"), ("b", "y")]).await;

        svc.db()
            .connect()
            .await
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_boom BEFORE INSERT ON components \
                 WHEN NEW.fe_id = 'boom' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .await
            .unwrap();

        let err = svc
            .update(
                id,
                QuestionnairePatchBuilder::new()
                    .title("never stored")
                    .components(vec![component("b", 0), component("boom", 1)])
                    .build(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Persistence { .. }), "got {err:?}");

        let kept = format!(
            "SELECT COUNT(*) FROM components WHERE question_id = {id} AND fe_id IN ('a', 'b')"
        );
        assert_eq!(scalar(&svc, &kept).await, 2);
        let items = "SELECT COUNT(*) FROM answer_items WHERE fe_id = 'a'";
        assert_eq!(scalar(&svc, items).await, 2);
        let count = format!("SELECT answer_count FROM questions WHERE question_id = {id}");
        assert_eq!(scalar(&svc, &count).await, 2);

        let answers = svc.answers(id).await.unwrap();
        assert_eq!(answers.len(), 2);
        let stored = svc.list(&ListQuery::default()).await.unwrap();
        assert_eq!(stored.list[0].title, PLACEHOLDER_TITLE);
    }

    #[tokio::test]
    async fn removing_a_component_drops_its_answer_items_and_empty_answers() {
        let (_dir, svc) = test_service().await;
        let id = svc.create(1).await.unwrap();
        svc.update(
            id,
            QuestionnairePatchBuilder::new()
                .components(vec![component("a", 0), component("b", 1)])
                .build(),
        )
        .await
        .unwrap();
        seed_answer(&svc, id, &[("a", "only a")]).await;
        seed_answer(&svc, id, &[("a", "x"), ("b", "y")]).await;

        let view = svc
            .update(
                id,
                QuestionnairePatchBuilder::new()
                    .components(vec![component("b", 0)])
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(view.answer_count, 1);

        let answers = svc.answers(id).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].items.len(), 1);
        assert_eq!(answers[0].items[0].fe_id, "b");
    }

    #[tokio::test]
    async fn delete_cascades_and_reports_count() {
        let (_dir, svc) = test_service().await;
        let a = svc.create(1).await.unwrap();
        let b = svc.create(1).await.unwrap();
        svc.update(a, QuestionnairePatchBuilder::new().components(vec![component("c1", 0)]).build())
            .await
            .unwrap();
        seed_answer(&svc, a, &[("c1", "v")]).await;

        let deleted = svc.delete(&[a, QuestionnaireId::new(999)]).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(svc.get(a).await.unwrap_err().is_not_found());
        assert!(svc.get(b).await.is_ok());
        assert!(svc.cache().get(&format!("questionId:{a}")).await.unwrap().is_none());

        let conn = svc.db().connect().await.unwrap();
        for table in ["components", "answers", "answer_items"] {
            let mut rows = conn
                .query(&format!("SELECT COUNT(*) FROM {table}"), ())
                .await
                .unwrap();
            let n = rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap();
            assert_eq!(n, 0, "{table} should be empty");
        }
    }

    #[tokio::test]
    async fn delete_nothing_matched_is_not_found() {
        let (_dir, svc) = test_service().await;
        let err = svc
            .delete(&[QuestionnaireId::new(5), QuestionnaireId::new(6)])
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::questionnaire_not_found("5,6"));
        assert!(svc.delete(&[]).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn copy_resets_flags_and_regenerates_keys() {
        let (_dir, svc) = test_service().await;
        let id = svc.create(3).await.unwrap();
        svc.update(
            id,
            QuestionnairePatchBuilder::new()
                .title("Survey")
                .components(vec![component("a", 0), component("b", 1)])
                .star(true)
                .published(true)
                .build(),
        )
        .await
        .unwrap();
        seed_answer(&svc, id, &[("a", "1")]).await;

        let copy_id = svc.copy(id).await.unwrap();
        assert_ne!(copy_id, id);
        let copy = svc.get(copy_id).await.unwrap();
        let source = svc.get(id).await.unwrap();

        assert_eq!(copy.title, "Survey (copy)");
        assert_eq!(copy.owner_id, 3);
        assert!(!copy.is_published && !copy.is_star && !copy.is_deleted);
        assert_eq!(copy.answer_count, 0);
        assert_eq!(copy.component_list.len(), 2);
        for (c, s) in copy.component_list.iter().zip(&source.component_list) {
            assert_ne!(c.fe_id, s.fe_id);
            assert!(c.fe_id.starts_with("fe-"));
            assert_eq!(c.title, s.title);
            assert_eq!(c.order, s.order);
            assert_eq!(c.props, s.props);
        }
    }

    #[tokio::test]
    async fn copy_missing_is_not_found() {
        let (_dir, svc) = test_service().await;
        assert!(svc.copy(QuestionnaireId::new(1)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_filters_pages_and_orders_newest_first() {
        let (_dir, svc) = test_service().await;
        let mut ids = Vec::new();
        for title in ["alpha", "beta", "alphabet", "gamma"] {
            let id = svc.create(1).await.unwrap();
            svc.update(id, QuestionnairePatchBuilder::new().title(title).build())
                .await
                .unwrap();
            ids.push(id);
        }
        let other = svc.create(2).await.unwrap();
        svc.update(ids[3], QuestionnairePatchBuilder::new().deleted(true).build())
            .await
            .unwrap();
        svc.update(ids[0], QuestionnairePatchBuilder::new().star(true).build())
            .await
            .unwrap();

        let page = svc
            .list(&ListQuery {
                owner_id: Some(1),
                ..ListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        let listed: Vec<_> = page.list.iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);

        let keyword = svc
            .list(&ListQuery {
                keyword: Some("alpha".into()),
                ..ListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(keyword.total, 2);

        let starred = svc
            .list(&ListQuery {
                is_star: Some(true),
                ..ListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(starred.list.len(), 1);
        assert_eq!(starred.list[0].id, ids[0]);

        let trash = svc
            .list(&ListQuery {
                is_deleted: true,
                ..ListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(trash.list[0].id, ids[3]);

        let second_page = svc
            .list(&ListQuery {
                page: 2,
                page_size: 2,
                ..ListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(second_page.total, 4);
        let listed: Vec<_> = second_page.list.iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![ids[1], ids[0]]);
        assert!(!listed.contains(&other));
    }

    #[tokio::test]
    async fn list_keyword_matches_wildcards_literally() {
        let (_dir, svc) = test_service().await;
        for title in ["alpha", "beta", "100% done", "back\\slash"] {
            let id = svc.create(1).await.unwrap();
            svc.update(id, QuestionnairePatchBuilder::new().title(title).build())
                .await
                .unwrap();
        }

        for (keyword, expected) in [("%", 1), ("_", 0), ("0%", 1), ("\\", 1), ("a", 3)] {
            let page = svc
                .list(&ListQuery {
                    keyword: Some(keyword.into()),
                    ..ListQuery::default()
                })
                .await
                .unwrap();
            assert_eq!(page.total, expected, "keyword {keyword:?}");
        }
    }

    #[tokio::test]
    async fn list_rejects_bad_paging() {
        let (_dir, svc) = test_service().await;
        for (page, page_size) in [(0, 10), (1, 0), (1, 101)] {
            let err = svc
                .list(&ListQuery {
                    page,
                    page_size,
                    ..ListQuery::default()
                })
                .await
                .unwrap_err();
            assert!(matches!(err, EngineError::Validation(_)));
        }
    }
}
