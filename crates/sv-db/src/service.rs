//! The questionnaire engine.
//!
//! `QuestionnaireService` owns the store handle plus shared handles to the
//! cache and the autosave queue. Operations live in [`crate::ops`] as
//! `impl QuestionnaireService` blocks.

use std::sync::Arc;
use std::time::Duration;

use sv_cache::{CacheStore, MokaCache};
use sv_config::SurveyorConfig;
use sv_queue::{JobQueue, LocalQueue, RetryConfig};

use crate::SurveyDb;
use crate::error::DatabaseError;

/// Engine knobs that do not belong to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    /// TTL of snapshots written to the cache.
    pub cache_ttl: Duration,
    /// Store a snapshot on a cache miss in `get`.
    pub populate_on_read: bool,
    /// Queue name autosave jobs are enqueued on.
    pub autosave_queue: String,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            populate_on_read: false,
            autosave_queue: "question_save".to_string(),
        }
    }
}

impl ServiceOptions {
    #[must_use]
    pub fn from_config(config: &SurveyorConfig) -> Self {
        Self {
            cache_ttl: config.cache.ttl(),
            populate_on_read: config.cache.populate_on_read,
            autosave_queue: config.queue.name.clone(),
        }
    }
}

/// Runs every questionnaire operation.
///
/// Each mutation follows the same protocol:
/// 1. Begin an immediate transaction
/// 2. Load and validate current state
/// 3. Execute SQL
/// 4. Commit
/// 5. Bring the cache in line (failures only logged)
pub struct QuestionnaireService<C = MokaCache, Q = LocalQueue> {
    db: SurveyDb,
    cache: Arc<C>,
    queue: Arc<Q>,
    options: ServiceOptions,
}

/// The engine wired to the in-process cache and queue.
pub type LocalService = QuestionnaireService<MokaCache, LocalQueue>;

impl<C: CacheStore, Q: JobQueue> QuestionnaireService<C, Q> {
    #[must_use]
    pub const fn new(db: SurveyDb, cache: Arc<C>, queue: Arc<Q>, options: ServiceOptions) -> Self {
        Self {
            db,
            cache,
            queue,
            options,
        }
    }

    #[must_use]
    pub const fn db(&self) -> &SurveyDb {
        &self.db
    }

    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    #[must_use]
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Shared handle to the queue, for workers.
    #[must_use]
    pub fn queue_handle(&self) -> Arc<Q> {
        Arc::clone(&self.queue)
    }

    #[must_use]
    pub const fn options(&self) -> &ServiceOptions {
        &self.options
    }
}

impl LocalService {
    /// Build the engine from configuration: open the database, create the
    /// moka cache and the local autosave queue.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn from_config(config: &SurveyorConfig) -> Result<Self, DatabaseError> {
        let db = SurveyDb::open_with(&config.database).await?;
        let cache = MokaCache::new(config.cache.max_capacity);
        let queue = LocalQueue::new(
            config.queue.name.clone(),
            RetryConfig {
                max_attempts: config.queue.max_attempts,
                base_delay: config.queue.base_delay(),
                max_delay: config.queue.max_delay(),
            },
        );
        Ok(Self::new(
            db,
            Arc::new(cache),
            Arc::new(queue),
            ServiceOptions::from_config(config),
        ))
    }
}
