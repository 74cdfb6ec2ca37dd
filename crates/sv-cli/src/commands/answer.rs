use serde_json::json;
use sv_core::entities::AnswerInput;

use crate::cli::GlobalFlags;
use crate::commands::parse::{parse_id, parse_json};
use crate::context::AppContext;
use crate::output::output;

pub async fn submit(
    id: &str,
    answers: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let items: Vec<AnswerInput> = parse_json(answers, "answers")?;
    let answer_id = ctx.service.submit_answer(id, items).await?;
    output(&json!({ "answerId": answer_id }), flags.format)
}

pub async fn list(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let answers = ctx.service.answers(parse_id(id)?).await?;
    output(&answers, flags.format)
}
