mod answer;
mod autosave;
mod parse;
mod questionnaire;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Create { owner } => questionnaire::create(owner, ctx, flags).await,
        Commands::Get { id } => questionnaire::get(&id, ctx, flags).await,
        Commands::Update { id, patch } => questionnaire::update(&id, &patch, ctx, flags).await,
        Commands::Delete { ids } => questionnaire::delete(&ids, ctx, flags).await,
        Commands::Copy { id } => questionnaire::copy(&id, ctx, flags).await,
        Commands::List {
            owner,
            keyword,
            star,
            deleted,
            page,
            page_size,
        } => {
            let query = sv_db::ops::ListQuery {
                owner_id: owner,
                keyword,
                is_star: star,
                is_deleted: deleted,
                page,
                page_size,
            };
            questionnaire::list(&query, ctx, flags).await
        }
        Commands::Submit { id, answers } => answer::submit(&id, &answers, ctx, flags).await,
        Commands::Answers { id } => answer::list(&id, ctx, flags).await,
        Commands::Autosave { id, patch } => autosave::run(&id, &patch, ctx, flags).await,
    }
}
