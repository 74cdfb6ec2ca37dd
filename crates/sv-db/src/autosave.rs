//! Autosave worker.
//!
//! Consumes `question_save` deliveries and replays them through
//! [`QuestionnaireService::update`], so the async path runs exactly the same
//! code as a direct update. Replays are safe: an update overwrites the
//! fields it carries and recomputes the answer count from the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sv_cache::CacheStore;
use sv_core::errors::EngineError;
use sv_core::ids::QuestionnaireId;
use sv_queue::{Job, JobError, JobQueue};
use tokio::task::JoinSet;

use crate::service::QuestionnaireService;
use crate::updates::QuestionnairePatch;

/// Payload carried by an autosave job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosaveJob {
    pub questionnaire_id: QuestionnaireId,
    pub patch: QuestionnairePatch,
}

/// What a worker (or a group of workers) got through before the queue drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub applied: u64,
    pub failed: u64,
}

impl WorkerReport {
    fn merge(&mut self, other: Self) {
        self.applied += other.applied;
        self.failed += other.failed;
    }
}

pub struct AutosaveWorker<C, Q> {
    service: Arc<QuestionnaireService<C, Q>>,
}

impl<C, Q> Clone for AutosaveWorker<C, Q> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<C, Q> AutosaveWorker<C, Q>
where
    C: CacheStore + 'static,
    Q: JobQueue + 'static,
{
    #[must_use]
    pub const fn new(service: Arc<QuestionnaireService<C, Q>>) -> Self {
        Self { service }
    }

    /// Apply one job.
    ///
    /// # Errors
    ///
    /// `JobError::Terminal` for an undecodable payload or a questionnaire
    /// that no longer exists; `JobError::Retriable` for anything else.
    pub async fn process(&self, job: &Job) -> Result<(), JobError> {
        let AutosaveJob {
            questionnaire_id,
            patch,
        } = serde_json::from_value(job.payload.clone())
            .map_err(|e| JobError::Terminal(format!("malformed autosave payload: {e}")))?;

        match self.service.update(questionnaire_id, patch).await {
            Ok(_) => {
                tracing::info!(
                    job = %job.id,
                    questionnaire = %questionnaire_id,
                    "autosave applied"
                );
                Ok(())
            }
            Err(err @ EngineError::NotFound { .. }) => Err(JobError::Terminal(err.to_string())),
            Err(err) => Err(JobError::Retriable(err.to_string())),
        }
    }

    /// Pull and settle deliveries until the queue is closed and drained.
    pub async fn run(self) -> WorkerReport {
        let queue = self.service.queue_handle();
        let mut report = WorkerReport::default();
        while let Some(delivery) = queue.next().await {
            let outcome = self.process(&delivery.job).await;
            if outcome.is_ok() {
                report.applied += 1;
            } else {
                report.failed += 1;
            }
            queue.settle(delivery, outcome).await;
        }
        report
    }

    /// Run `count` workers concurrently and wait for all of them.
    pub async fn run_pool(self, count: usize) -> WorkerReport {
        let mut set = JoinSet::new();
        for _ in 0..count.max(1) {
            set.spawn(self.clone().run());
        }

        let mut total = WorkerReport::default();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(report) => total.merge(report),
                Err(error) => tracing::error!(%error, "autosave worker panicked"),
            }
        }
        total
    }
}
