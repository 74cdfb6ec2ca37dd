use std::sync::Arc;

use serde::Serialize;
use sv_db::autosave::AutosaveWorker;
use sv_db::updates::QuestionnairePatch;
use sv_queue::JobId;

use crate::cli::GlobalFlags;
use crate::commands::parse::{parse_id, parse_json};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AutosaveResponse {
    job: String,
    applied: u64,
    failed: u64,
    dead_letters: Vec<DeadLetterSummary>,
}

#[derive(Debug, Serialize)]
struct DeadLetterSummary {
    job: String,
    attempts: u32,
    reason: String,
}

/// Enqueue the patch, close the queue and let the worker pool drain it.
pub async fn run(
    id: &str,
    patch: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let patch: QuestionnairePatch = parse_json(patch, "patch")?;

    let job: JobId = ctx.service.enqueue_autosave(id, patch).await?;
    let queue = ctx.service.queue_handle();
    queue.close();

    let report = AutosaveWorker::new(Arc::clone(&ctx.service))
        .run_pool(ctx.config.queue.workers)
        .await;

    tracing::info!(
        questionnaire = %id,
        applied = report.applied,
        failed = report.failed,
        "autosave: queue drained"
    );

    let dead_letters = queue
        .dead_letters()
        .into_iter()
        .map(|dead| {
            tracing::warn!(
                job = %dead.job.id,
                attempts = dead.attempts,
                reason = %dead.reason,
                "autosave: job dead-lettered"
            );
            DeadLetterSummary {
                job: dead.job.id.to_string(),
                attempts: dead.attempts,
                reason: dead.reason,
            }
        })
        .collect();

    output(
        &AutosaveResponse {
            job: job.to_string(),
            applied: report.applied,
            failed: report.failed,
            dead_letters,
        },
        flags.format,
    )
}
