use serde_json::json;
use sv_core::responses::CreatedResponse;
use sv_db::ops::ListQuery;
use sv_db::updates::QuestionnairePatch;

use crate::cli::GlobalFlags;
use crate::commands::parse::{parse_id, parse_json};
use crate::context::AppContext;
use crate::output::output;

pub async fn create(owner: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let id = ctx.service.create(owner).await?;
    output(&CreatedResponse { id }, flags.format)
}

pub async fn get(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let view = ctx.service.get(parse_id(id)?).await?;
    output(&view, flags.format)
}

pub async fn update(
    id: &str,
    patch: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let patch: QuestionnairePatch = parse_json(patch, "patch")?;
    let view = ctx.service.update(id, patch).await?;
    output(&view, flags.format)
}

pub async fn delete(ids: &[String], ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ids = ids.iter().map(|raw| parse_id(raw)).collect::<anyhow::Result<Vec<_>>>()?;
    let deleted = ctx.service.delete(&ids).await?;
    output(&json!({ "deleted": deleted }), flags.format)
}

pub async fn copy(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let id = ctx.service.copy(parse_id(id)?).await?;
    output(&CreatedResponse { id }, flags.format)
}

pub async fn list(query: &ListQuery, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let page = ctx.service.list(query).await?;
    output(&page, flags.format)
}
