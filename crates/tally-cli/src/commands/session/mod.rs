mod create;
mod get;
mod list;
mod report;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally session`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Create {
            name,
            inventory_type,
            created_by,
        } => create::run(name, inventory_type, created_by.as_deref(), ctx, flags).await,
        SessionCommands::List { status, limit } => {
            list::run(status.as_deref(), *limit, ctx, flags).await
        }
        SessionCommands::Get { id } => get::run(id, ctx, flags).await,
        SessionCommands::Finalize { id } => {
            output(&ctx.service.finalize_session(id).await?, flags.format)
        }
        SessionCommands::Report { id } => report::run(id, ctx, flags).await,
    }
}
