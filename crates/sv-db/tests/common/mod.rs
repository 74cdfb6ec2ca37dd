//! Shared helpers for sv-db integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sv_cache::MokaCache;
use sv_core::entities::{AnswerInput, ComponentData};
use sv_core::enums::ComponentType;
use sv_core::ids::QuestionnaireId;
use sv_db::SurveyDb;
use sv_db::service::{LocalService, QuestionnaireService, ServiceOptions};
use sv_queue::{LocalQueue, RetryConfig};
use tempfile::TempDir;

pub async fn service() -> (TempDir, Arc<LocalService>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.db");
    let db = SurveyDb::open_local(path.to_str().unwrap()).await.unwrap();
    let queue = LocalQueue::new(
        "question_save",
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
        },
    );
    let svc = QuestionnaireService::new(
        db,
        Arc::new(MokaCache::new(64)),
        Arc::new(queue),
        ServiceOptions::default(),
    );
    (dir, Arc::new(svc))
}

pub fn component(fe_id: &str, order: i64) -> ComponentData {
    ComponentData {
        fe_id: fe_id.into(),
        component_type: ComponentType::QuestionRadio,
        title: format!("Pick {fe_id}"),
        props: serde_json::json!({ "options": ["yes", "no"] }),
        order,
        is_hidden: false,
        is_locked: false,
    }
}

pub async fn answer(svc: &LocalService, id: QuestionnaireId, items: &[(&str, &str)]) {
    let items = items
        .iter()
        .map(|(fe_id, value)| AnswerInput {
            fe_id: (*fe_id).to_string(),
            value: (*value).to_string(),
        })
        .collect();
    svc.submit_answer(id, items).await.unwrap();
}

pub async fn row_count(svc: &LocalService, table: &str) -> i64 {
    let conn = svc.db().connect().await.unwrap();
    let mut rows = conn
        .query(&format!("SELECT COUNT(*) FROM {table}"), ())
        .await
        .unwrap();
    rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
}
