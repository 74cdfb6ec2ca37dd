//! Shared test utilities for sv-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use sv_cache::{CacheError, CacheStore, MokaCache};
    use sv_core::entities::{AnswerInput, ComponentData};
    use sv_core::enums::ComponentType;
    use sv_core::ids::QuestionnaireId;
    use sv_queue::{JobQueue, LocalQueue, RetryConfig};
    use tempfile::TempDir;

    use crate::SurveyDb;
    use crate::service::{LocalService, QuestionnaireService, ServiceOptions};

    pub fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
        }
    }

    async fn temp_db() -> (TempDir, SurveyDb) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("survey.db");
        let db = SurveyDb::open_local(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    /// A service over a fresh database file. Keep the `TempDir` alive.
    pub async fn test_service() -> (TempDir, LocalService) {
        test_service_with(ServiceOptions::default()).await
    }

    pub async fn test_service_with(options: ServiceOptions) -> (TempDir, LocalService) {
        let (dir, db) = temp_db().await;
        let svc = QuestionnaireService::new(
            db,
            Arc::new(MokaCache::new(64)),
            Arc::new(LocalQueue::new("question_save", fast_retry())),
            options,
        );
        (dir, svc)
    }

    /// A service whose cache fails every call.
    pub async fn failing_cache_service()
    -> (TempDir, QuestionnaireService<FailingCache, LocalQueue>) {
        let (dir, db) = temp_db().await;
        let svc = QuestionnaireService::new(
            db,
            Arc::new(FailingCache),
            Arc::new(LocalQueue::new("question_save", fast_retry())),
            ServiceOptions {
                populate_on_read: true,
                ..ServiceOptions::default()
            },
        );
        (dir, svc)
    }

    pub struct FailingCache;

    impl CacheStore for FailingCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }

        async fn invalidate(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
    }

    /// A working cache that starts rejecting writes once `reject_writes` is set.
    pub struct WriteRejectingCache {
        inner: MokaCache,
        reject_writes: AtomicBool,
    }

    impl WriteRejectingCache {
        pub fn new() -> Self {
            Self {
                inner: MokaCache::new(64),
                reject_writes: AtomicBool::new(false),
            }
        }

        pub fn start_rejecting(&self) {
            self.reject_writes.store(true, Ordering::SeqCst);
        }
    }

    impl CacheStore for WriteRejectingCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
            if self.reject_writes.load(Ordering::SeqCst) {
                return Err(CacheError::Unavailable("write rejected".into()));
            }
            self.inner.set(key, value, ttl).await
        }

        async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
            self.inner.invalidate(key).await
        }
    }

    pub async fn write_rejecting_service()
    -> (TempDir, QuestionnaireService<WriteRejectingCache, LocalQueue>) {
        let (dir, db) = temp_db().await;
        let svc = QuestionnaireService::new(
            db,
            Arc::new(WriteRejectingCache::new()),
            Arc::new(LocalQueue::new("question_save", fast_retry())),
            ServiceOptions::default(),
        );
        (dir, svc)
    }

    pub fn component(fe_id: &str, order: i64) -> ComponentData {
        ComponentData {
            fe_id: fe_id.into(),
            component_type: ComponentType::QuestionInput,
            title: format!("Question {fe_id}"),
            props: serde_json::json!({ "placeholder": fe_id }),
            order,
            is_hidden: false,
            is_locked: false,
        }
    }

    /// Submit one answer with the given `(fe_id, value)` items.
    pub async fn seed_answer<C: CacheStore, Q: JobQueue>(
        svc: &QuestionnaireService<C, Q>,
        id: QuestionnaireId,
        items: &[(&str, &str)],
    ) -> i64 {
        let items = items
            .iter()
            .map(|(fe_id, value)| AnswerInput {
                fe_id: (*fe_id).to_string(),
                value: (*value).to_string(),
            })
            .collect();
        svc.submit_answer(id, items).await.unwrap()
    }
}
