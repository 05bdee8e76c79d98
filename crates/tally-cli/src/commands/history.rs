use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryArgs;
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally history`: finalized-session reports, newest first.
pub async fn handle(args: &HistoryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(args.limit, flags.limit, ctx.config.general.default_limit);
    let reports = ctx.service.history().await;
    output(&truncate(reports, limit), flags.format)
}
