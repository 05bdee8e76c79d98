use clap::Subcommand;

/// Assignment control commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AssignmentCommands {
    /// List a session's assignments.
    List {
        /// Session ID.
        #[arg(long)]
        session: String,
        /// Optional status filter: pending, controlled, error, validated.
        #[arg(long)]
        status: Option<String>,
        /// Only assignments of this auditor.
        #[arg(long)]
        auditor: Option<String>,
        /// Maximum number of assignments.
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Record the physical count of a pending assignment.
    Count {
        /// Assignment ID.
        id: String,
        /// Counted quantity (non-negative decimal).
        quantity: String,
        /// Free-text notes.
        #[arg(long)]
        notes: Option<String>,
    },
    /// Replace the count of a controlled or errored assignment.
    Correct {
        /// Assignment ID.
        id: String,
        /// Corrected quantity (non-negative decimal).
        quantity: String,
        /// Free-text notes.
        #[arg(long)]
        notes: Option<String>,
    },
    /// Acknowledge a counted assignment. Terminal.
    Validate {
        /// Assignment ID.
        id: String,
    },
}
