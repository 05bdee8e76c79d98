use clap::{Args, Subcommand};

use crate::cli::subcommands::{AssignmentCommands, SessionCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize tally for a project.
    Init(InitArgs),
    /// Inventory sessions.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Import an ERP extract into a session.
    Import(ImportArgs),
    /// Assignment controls.
    Assignment {
        #[command(subcommand)]
        action: AssignmentCommands,
    },
    /// Metrics of one session.
    Metrics(MetricsArgs),
    /// Reports of finalized sessions.
    History(HistoryArgs),
    /// Workspace-wide counters.
    Dashboard,
    /// Rebuild state from the JSONL trail.
    Rebuild,
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing `.tally/config.toml`.
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Session ID.
    #[arg(long)]
    pub session: String,
    /// Path to the CSV extract.
    pub file: String,
    /// Auditor the rows are assigned to (defaults to auditor.default_id).
    #[arg(long)]
    pub auditor: Option<String>,
    /// Field delimiter, overriding import.delimiter.
    #[arg(long)]
    pub delimiter: Option<String>,
    /// Parse and report without creating assignments.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, Args)]
pub struct MetricsArgs {
    /// Session ID.
    pub session: String,
}

#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    /// Maximum number of reports.
    #[arg(long)]
    pub limit: Option<u32>,
}
