use crate::cli::GlobalFlags;
use crate::cli::root_commands::MetricsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally metrics`.
pub async fn handle(args: &MetricsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx.service.session_metrics(&args.session).await?;
    output(&response, flags.format)
}
