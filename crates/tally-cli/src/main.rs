use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tally_config::PROJECT_DIR;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod ui;
mod write_lock;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("tally error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    if let cli::Commands::Init(args) = &cli.command {
        return commands::init::handle(args, &flags);
    }

    let project_root = resolve_project_root(flags.project.as_deref())?;
    let config = bootstrap::load_config(&project_root)?;

    let command = cli.command;
    let write_lock = if command_requires_write_lock(&command) {
        Some(write_lock::acquire_for_project(&project_root).await?)
    } else {
        None
    };

    let ctx = context::AppContext::init(project_root, config)
        .await
        .context("failed to initialize tally application context")?;

    let result = commands::dispatch::dispatch(command, &ctx, &flags).await;
    drop(write_lock);
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TALLY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);

        if explicit
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == PROJECT_DIR)
        {
            return explicit
                .parent()
                .map(std::path::Path::to_path_buf)
                .context("invalid --project path: '.tally' directory has no parent");
        }

        if explicit.join(PROJECT_DIR).is_dir() {
            return Ok(explicit);
        }

        anyhow::bail!(
            "invalid --project '{}': no .tally directory. Run 'tally init --project {}' first.",
            explicit.display(),
            explicit.display()
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    context::find_project_root(&start)
        .context("not a tally project (no .tally directory found). Run 'tally init' first.")
}

fn command_requires_write_lock(command: &cli::Commands) -> bool {
    use crate::cli::subcommands::{AssignmentCommands, SessionCommands};

    match command {
        cli::Commands::Session { action } => matches!(
            action,
            SessionCommands::Create { .. } | SessionCommands::Finalize { .. }
        ),
        cli::Commands::Assignment { action } => !matches!(action, AssignmentCommands::List { .. }),
        cli::Commands::Import(args) => !args.dry_run,
        cli::Commands::Metrics(_)
        | cli::Commands::History(_)
        | cli::Commands::Dashboard
        | cli::Commands::Rebuild
        | cli::Commands::Init(_) => false,
    }
}
