use clap::Subcommand;

/// Inventory session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Open a new inventory session.
    Create {
        /// Human-readable session name.
        name: String,
        /// Inventory type: inbound, outbound, general, w2w.
        #[arg(long = "type", default_value = "general")]
        inventory_type: String,
        /// Creator recorded on the session (defaults to auditor.creator_id).
        #[arg(long)]
        created_by: Option<String>,
    },
    /// List sessions, newest first.
    List {
        /// Optional status filter: active, finalized.
        #[arg(long)]
        status: Option<String>,
        /// Maximum number of sessions.
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one session.
    Get {
        /// Session ID.
        id: String,
    },
    /// Close a session. Fails while assignments are pending.
    Finalize {
        /// Session ID.
        id: String,
    },
    /// Show the report of a finalized session.
    Report {
        /// Session ID.
        id: String,
    },
}
