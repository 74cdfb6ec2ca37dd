//! Autosave enqueue.

use sv_cache::CacheStore;
use sv_core::errors::EngineError;
use sv_core::ids::QuestionnaireId;
use sv_queue::{JobId, JobQueue};

use crate::autosave::AutosaveJob;
use crate::service::QuestionnaireService;
use crate::updates::QuestionnairePatch;

impl<C: CacheStore, Q: JobQueue> QuestionnaireService<C, Q> {
    /// Hand a patch to the autosave queue instead of applying it inline.
    ///
    /// The worker applies it later through [`Self::update`]. Existence is not
    /// checked here; a job for a missing questionnaire is dead-lettered.
    ///
    /// # Errors
    ///
    /// `Persistence` if the queue rejects the job.
    pub async fn enqueue_autosave(
        &self,
        id: QuestionnaireId,
        patch: QuestionnairePatch,
    ) -> Result<JobId, EngineError> {
        const OP: &str = "enqueue autosave";
        let payload = serde_json::to_value(AutosaveJob {
            questionnaire_id: id,
            patch,
        })
        .map_err(|error| {
            tracing::error!(questionnaire = %id, %error, "autosave payload encode failed");
            EngineError::persistence(OP)
        })?;

        let job = self
            .queue()
            .enqueue(&self.options().autosave_queue, payload)
            .await
            .map_err(|error| {
                tracing::error!(questionnaire = %id, %error, "autosave enqueue failed");
                EngineError::persistence(OP)
            })?;
        tracing::debug!(questionnaire = %id, %job, "autosave enqueued");
        Ok(job)
    }
}
