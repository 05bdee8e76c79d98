//! Import error types.

use serde::Serialize;
use tally_config::ConfigError;

/// File-level failures that stop an import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid import configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Extract is empty")]
    Empty,

    #[error("Required column '{column}' not found (accepted headers: {accepted})")]
    MissingColumn { column: String, accepted: String },

    #[error("Extract has more than {limit} data rows")]
    TooManyRows { limit: usize },
}

/// Why a single row was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorKind {
    MissingValue,
    InvalidQuantity,
    DuplicateInFile,
}

impl RowErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingValue => "missing_value",
            Self::InvalidQuantity => "invalid_quantity",
            Self::DuplicateInFile => "duplicate_in_file",
        }
    }
}

impl std::fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected row. `line_number` is 1-based and counts the header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub line_number: u64,
    pub material_id: Option<String>,
    pub column_name: Option<String>,
    pub kind: RowErrorKind,
    pub message: String,
}
