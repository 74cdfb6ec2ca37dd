//! Keeping `questionId:{id}` snapshots in step with the store.
//!
//! None of these return errors: the cache is never the source of truth, so
//! every failure is a logged cache warning.

use sv_cache::CacheStore;
use sv_core::ids::QuestionnaireId;
use sv_core::responses::QuestionnaireView;
use sv_queue::JobQueue;

use crate::service::QuestionnaireService;

pub(crate) fn questionnaire_key(id: QuestionnaireId) -> String {
    format!("questionId:{id}")
}

impl<C: CacheStore, Q: JobQueue> QuestionnaireService<C, Q> {
    pub(crate) async fn write_snapshot(&self, view: &QuestionnaireView) {
        let key = questionnaire_key(view.id);
        let payload = match serde_json::to_string(view) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(%key, %error, "cache warning: snapshot encode failed");
                self.evict(&key).await;
                return;
            }
        };
        if let Err(error) = self.cache().set(&key, payload, self.options().cache_ttl).await {
            tracing::warn!(%key, %error, "cache warning: snapshot write failed");
            // An older snapshot must not outlive a skipped write.
            self.evict(&key).await;
        }
    }

    /// A cached snapshot, or `None` on miss, cache failure or undecodable entry.
    pub(crate) async fn read_snapshot(&self, id: QuestionnaireId) -> Option<QuestionnaireView> {
        let key = questionnaire_key(id);
        let raw = match self.cache().get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!(%key, %error, "cache warning: snapshot read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(view) => Some(view),
            Err(error) => {
                tracing::warn!(%key, %error, "cache warning: snapshot decode failed");
                None
            }
        }
    }

    pub(crate) async fn invalidate_snapshot(&self, id: QuestionnaireId) {
        self.evict(&questionnaire_key(id)).await;
    }

    async fn evict(&self, key: &str) {
        if let Err(error) = self.cache().invalidate(key).await {
            tracing::warn!(%key, %error, "cache warning: invalidation failed");
        }
    }
}
