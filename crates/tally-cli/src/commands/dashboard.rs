use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally dashboard`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.dashboard().await, flags.format)
}
