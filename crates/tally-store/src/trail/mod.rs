//! JSONL trail writer and replayer.
//!
//! The trail is the source of truth for all mutations. Per-session JSONL files
//! live in `.tally/trail/` and the in-memory state is rebuilt from them.

pub mod replayer;
pub mod writer;

pub use replayer::TrailReplayer;
pub use writer::TrailWriter;
