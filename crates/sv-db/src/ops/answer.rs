//! Answer submission and retrieval.

use std::collections::HashSet;

use libsql::Connection;
use sv_cache::CacheStore;
use sv_core::entities::{Answer, AnswerInput};
use sv_core::errors::EngineError;
use sv_core::ids::{AnswerId, QuestionnaireId};
use sv_queue::JobQueue;

use crate::SurveyDb;
use crate::error::DatabaseError;
use crate::repos::{answer, component, questionnaire};
use crate::service::QuestionnaireService;

async fn insert_answer(
    conn: &Connection,
    id: QuestionnaireId,
    items: &[AnswerInput],
) -> Result<AnswerId, DatabaseError> {
    questionnaire::get(conn, id).await?;
    let components = component::list_for(conn, id).await?;
    let known: HashSet<&str> = components.iter().map(|c| c.fe_id.as_str()).collect();
    if let Some(unknown) = items.iter().find(|i| !known.contains(i.fe_id.as_str())) {
        return Err(DatabaseError::Validation(format!(
            "questionnaire {id} has no component '{}'",
            unknown.fe_id
        )));
    }

    let answer_id = answer::insert(conn, id, items).await?;
    let count = answer::count_for(conn, id).await?;
    questionnaire::set_answer_count(conn, id, count).await?;
    Ok(answer_id)
}

impl<C: CacheStore, Q: JobQueue> QuestionnaireService<C, Q> {
    /// Record one submission against a questionnaire.
    ///
    /// Every item must reference a current component. The answer count is
    /// recomputed in the same transaction and the cached snapshot dropped.
    ///
    /// # Errors
    ///
    /// `NotFound` if the questionnaire does not exist, `Validation` for an
    /// empty submission or an unknown `fe_id`, `Persistence` for store failures.
    pub async fn submit_answer(
        &self,
        id: QuestionnaireId,
        items: Vec<AnswerInput>,
    ) -> Result<AnswerId, EngineError> {
        const OP: &str = "submit answer";
        if items.is_empty() {
            return Err(EngineError::Validation("answer has no items".into()));
        }

        let tx = self.db().begin().await.map_err(|e| e.into_engine(OP))?;
        let result = insert_answer(&tx, id, &items).await;
        let answer_id = SurveyDb::finish(tx, result)
            .await
            .map_err(|e| e.into_engine(OP))?;

        self.invalidate_snapshot(id).await;
        tracing::info!(
            questionnaire = %id,
            answer = answer_id,
            items = items.len(),
            "answer submitted"
        );
        Ok(answer_id)
    }

    /// All answers of a questionnaire with their items, oldest first.
    ///
    /// # Errors
    ///
    /// `NotFound` if the questionnaire does not exist, `Persistence` for store failures.
    pub async fn answers(&self, id: QuestionnaireId) -> Result<Vec<Answer>, EngineError> {
        const OP: &str = "read answers";
        let conn = self.db().connect().await.map_err(|e| e.into_engine(OP))?;
        questionnaire::get(&conn, id)
            .await
            .map_err(|e| e.into_engine(OP))?;
        answer::list_for(&conn, id)
            .await
            .map_err(|e| e.into_engine(OP))
    }
}
