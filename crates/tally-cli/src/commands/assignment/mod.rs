mod control;
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AssignmentCommands;
use crate::context::AppContext;

/// Handle `tally assignment`.
pub async fn handle(
    action: &AssignmentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AssignmentCommands::List {
            session,
            status,
            auditor,
            limit,
        } => {
            let filter = list::Filter::parse(status.as_deref(), auditor.as_deref())?;
            list::run(session, &filter, *limit, ctx, flags).await
        }
        AssignmentCommands::Count {
            id,
            quantity,
            notes,
        } => control::count(id, quantity, notes.as_deref(), ctx, flags).await,
        AssignmentCommands::Correct {
            id,
            quantity,
            notes,
        } => control::correct(id, quantity, notes.as_deref(), ctx, flags).await,
        AssignmentCommands::Validate { id } => control::validate(id, ctx, flags).await,
    }
}
