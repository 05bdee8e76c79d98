//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to per-session `.tally/trail/{session_id}.jsonl`
//! files. Uses `serde_jsonlines::append_json_lines` for atomic per-line appends.

use std::path::{Path, PathBuf};

use tally_core::trail::TrailOperation;

use crate::error::StoreError;

/// Appends trail operations to per-session JSONL files.
///
/// Every mutation in `InventoryService` calls `append()` before the change is
/// committed in memory. The trail is the source of truth.
#[derive(Debug)]
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a new `TrailWriter` pointing at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Trail` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&trail_dir)
            .map_err(|e| StoreError::Trail(format!("{}: {e}", trail_dir.display())))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// Create a disabled writer (for tests that don't need trail files).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    /// Whether trail writing is currently enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append a trail operation to the session's JSONL file.
    ///
    /// File path: `{trail_dir}/{op.ses}.jsonl`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Trail` if the file write fails.
    pub fn append(&self, op: &TrailOperation) -> Result<(), StoreError> {
        self.append_all(std::slice::from_ref(op))
    }

    /// Append several operations of one session in a single write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Trail` if the file write fails or the operations
    /// span more than one session.
    pub fn append_all(&self, ops: &[TrailOperation]) -> Result<(), StoreError> {
        if !self.enabled {
            return Ok(());
        }
        let Some(first) = ops.first() else {
            return Ok(());
        };
        if ops.iter().any(|op| op.ses != first.ses) {
            return Err(StoreError::Trail(
                "a batch of trail operations must belong to one session".into(),
            ));
        }

        let path = self.path_for(&first.ses);
        serde_jsonlines::append_json_lines(&path, ops)
            .map_err(|e| StoreError::Trail(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    /// Trail file of one session.
    #[must_use]
    pub fn path_for(&self, session_id: &str) -> PathBuf {
        self.trail_dir.join(format!("{session_id}.jsonl"))
    }

    /// The directory where trail files are stored.
    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }
}
