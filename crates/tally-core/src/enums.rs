//! Status enums, inventory types, entity types, and trail ops for Tally.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` so the
//! engine and the service share one transition table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ControlStatus
// ---------------------------------------------------------------------------

/// Control status of an assignment.
///
/// ```text
/// pending → controlled → validated
///         → error      → validated
/// controlled ↔ error (count correction)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    Pending,
    Controlled,
    Error,
    Validated,
}

impl ControlStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Controlled, Self::Error],
            Self::Controlled => &[Self::Error, Self::Validated],
            Self::Error => &[Self::Controlled, Self::Validated],
            Self::Validated => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether a physical quantity must be present in this state.
    #[must_use]
    pub const fn has_count(self) -> bool {
        !matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Validated)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Controlled => "controlled",
            Self::Error => "error",
            Self::Validated => "validated",
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Status of an inventory session.
///
/// ```text
/// active → finalized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Finalized,
}

impl SessionStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Finalized],
            Self::Finalized => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InventoryType
// ---------------------------------------------------------------------------

/// Kind of count campaign.
///
/// Each kind names the pair of ERP tables its extract is usually cut from.
/// The table names are metadata for the import and presentation layers; the
/// reconciliation engine never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InventoryType {
    Inbound,
    Outbound,
    General,
    W2w,
}

impl InventoryType {
    pub const ALL: [Self; 4] = [Self::Inbound, Self::Outbound, Self::General, Self::W2w];

    /// Informational source tables for this kind of extract.
    #[must_use]
    pub const fn source_tables(self) -> [&'static str; 2] {
        match self {
            Self::Inbound => ["EKPO", "MSEG"],
            Self::Outbound => ["LIPS", "VBAK"],
            Self::General => ["MARD", "MBEW"],
            Self::W2w => ["LAGP", "LQUA"],
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inbound => "Inbound control",
            Self::Outbound => "Outbound control",
            Self::General => "General control",
            Self::W2w => "Wall-to-wall inventory",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
            Self::General => "general",
            Self::W2w => "w2w",
        }
    }
}

impl fmt::Display for InventoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity recorded in the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Session,
    Assignment,
    /// Unmapped extract columns of one material, keyed by material id.
    Extension,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Assignment => "assignment",
            Self::Extension => "extension",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TrailOp
// ---------------------------------------------------------------------------

/// Operation type recorded in JSONL trail files.
///
/// - `Create`: a new session or assignment (full entity in `data`)
/// - `Count`, `Correct`: a control entry or its correction on an assignment
/// - `Transition`: a status change that carries no new count (validate, finalize)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    Create,
    Count,
    Correct,
    Transition,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Count => "count",
            Self::Correct => "correct",
            Self::Transition => "transition",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
