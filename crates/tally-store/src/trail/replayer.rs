//! Rebuild inventory state from trail files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tally_core::responses::RebuildResponse;
use tally_core::trail::TrailOperation;

use crate::error::StoreError;
use crate::state::InventoryState;

pub struct TrailReplayer;

impl TrailReplayer {
    /// Replay every `*.jsonl` file in `trail_dir` into a fresh state.
    ///
    /// Session files are replayed one after another in file-name order, each
    /// in line order: a session's file is its own total order, and no
    /// operation refers to another session. A missing directory replays as an
    /// empty state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Trail` if a file cannot be read or a line is not
    /// a valid operation, and whatever [`InventoryState::apply`] returns.
    pub fn replay(trail_dir: &Path) -> Result<(InventoryState, RebuildResponse), StoreError> {
        let start = Instant::now();
        let mut state = InventoryState::default();

        let files = trail_files(trail_dir)?;
        let mut operations_replayed = 0u32;
        let mut entities_created = 0u32;

        for path in &files {
            for op in read_operations(path)? {
                if state.apply(&op)? {
                    entities_created += 1;
                }
                operations_replayed += 1;
            }
        }

        tracing::debug!(
            files = files.len(),
            operations = operations_replayed,
            "trail replayed"
        );

        Ok((
            state,
            RebuildResponse {
                rebuilt: true,
                trail_files: u32::try_from(files.len()).unwrap_or(u32::MAX),
                operations_replayed,
                entities_created,
                duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            },
        ))
    }
}

fn trail_files(trail_dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !trail_dir.exists() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(trail_dir)
        .map_err(|e| StoreError::Trail(format!("{}: {e}", trail_dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| StoreError::Trail(format!("{}: {e}", trail_dir.display())))?
            .path();
        if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_operations(path: &Path) -> Result<Vec<TrailOperation>, StoreError> {
    serde_jsonlines::json_lines(path)
        .map_err(|e| StoreError::Trail(format!("{}: {e}", path.display())))?
        .collect::<Result<Vec<TrailOperation>, _>>()
        .map_err(|e| StoreError::Trail(format!("{}: {e}", path.display())))
}
