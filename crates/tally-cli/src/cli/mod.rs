use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `tally` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    about = "Tally - inventory count reconciliation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .tally)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Table colors: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            project: self.project.clone(),
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::subcommands::{AssignmentCommands, SessionCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "tally",
            "--format",
            "table",
            "--limit",
            "10",
            "--verbose",
            "dashboard",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Dashboard));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["tally", "dashboard", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["tally", "--format", "xml", "dashboard"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn session_create_takes_type_flag() {
        let cli = Cli::try_parse_from(["tally", "session", "create", "Dock 4", "--type", "w2w"])
            .expect("cli should parse");
        match cli.command {
            Commands::Session {
                action:
                    SessionCommands::Create {
                        name,
                        inventory_type,
                        created_by,
                    },
            } => {
                assert_eq!(name, "Dock 4");
                assert_eq!(inventory_type, "w2w");
                assert!(created_by.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn assignment_count_takes_quantity_as_text() {
        let cli = Cli::try_parse_from([
            "tally",
            "assignment",
            "count",
            "asg-00000001",
            "12.5",
            "--notes",
            "top shelf",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Assignment {
                action: AssignmentCommands::Count { id, quantity, notes },
            } => {
                assert_eq!(id, "asg-00000001");
                assert_eq!(quantity, "12.5");
                assert_eq!(notes.as_deref(), Some("top shelf"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn import_requires_session() {
        assert!(Cli::try_parse_from(["tally", "import", "extract.csv"]).is_err());
        assert!(
            Cli::try_parse_from(["tally", "import", "extract.csv", "--session", "inv-1"]).is_ok()
        );
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["tally", "--project", "/tmp/demo", "dashboard"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}
