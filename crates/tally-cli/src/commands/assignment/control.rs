use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_count;
use crate::context::AppContext;
use crate::output::output;

pub async fn count(
    id: &str,
    quantity: &str,
    notes: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let quantity = parse_count(quantity)?;
    let response = ctx.service.record_count(id, quantity, notes).await?;
    output(&response, flags.format)
}

pub async fn correct(
    id: &str,
    quantity: &str,
    notes: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let quantity = parse_count(quantity)?;
    let response = ctx.service.correct_count(id, quantity, notes).await?;
    output(&response, flags.format)
}

pub async fn validate(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx.service.validate_assignment(id).await?;
    output(&response, flags.format)
}
