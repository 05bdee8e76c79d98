use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Session { action } => commands::session::handle(&action, ctx, flags).await,
        Commands::Import(args) => commands::import::handle(&args, ctx, flags).await,
        Commands::Assignment { action } => commands::assignment::handle(&action, ctx, flags).await,
        Commands::Metrics(args) => commands::metrics::handle(&args, ctx, flags).await,
        Commands::History(args) => commands::history::handle(&args, ctx, flags).await,
        Commands::Dashboard => commands::dashboard::handle(ctx, flags).await,
        Commands::Rebuild => commands::rebuild::handle(ctx, flags).await,
        Commands::Init(_) => unreachable!("init is pre-dispatched in main"),
    }
}
