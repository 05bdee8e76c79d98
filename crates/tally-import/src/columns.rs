//! Header resolution: which CSV column feeds which [`ExtractRow`] field.
//!
//! [`ExtractRow`]: tally_core::entities::ExtractRow

use tally_config::ColumnAliases;

use crate::error::ImportError;

/// Column indices for the row model plus the leftovers that go to the
/// extension side-table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub material: usize,
    pub quantity: usize,
    pub description: Option<usize>,
    pub location: Option<usize>,
    pub lot: Option<usize>,
    /// `(index, header)` for every unmapped column.
    pub extras: Vec<(usize, String)>,
}

impl ColumnMap {
    /// Resolve header names against the configured aliases.
    ///
    /// Material and quantity are required; description, location, and lot
    /// are optional.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::MissingColumn` when a required column is absent.
    pub fn from_headers<S: AsRef<str>>(
        headers: &[S],
        aliases: &ColumnAliases,
    ) -> Result<Self, ImportError> {
        let headers: Vec<&str> = headers.iter().map(|h| h.as_ref().trim()).collect();
        let normalized: Vec<String> = headers.iter().map(|h| normalize(h)).collect();

        let find = |names: &[String]| {
            normalized
                .iter()
                .position(|header| names.iter().any(|name| normalize(name) == *header))
        };
        let require = |field: &str, names: &[String]| {
            find(names).ok_or_else(|| ImportError::MissingColumn {
                column: field.to_string(),
                accepted: names.join(", "),
            })
        };

        let material = require("material", &aliases.material)?;
        let quantity = require("quantity", &aliases.quantity)?;
        let description = find(&aliases.description);
        let location = find(&aliases.location);
        let lot = find(&aliases.lot);

        let mapped = [Some(material), Some(quantity), description, location, lot];
        let extras = headers
            .iter()
            .enumerate()
            .filter(|(index, header)| !mapped.contains(&Some(*index)) && !header.is_empty())
            .map(|(index, header)| (index, (*header).to_string()))
            .collect();

        Ok(Self {
            material,
            quantity,
            description,
            location,
            lot,
            extras,
        })
    }

    /// Headerless layout: material, description, quantity, location, lot,
    /// then `column_6`, `column_7`, ... for anything wider.
    #[must_use]
    pub fn positional(width: usize) -> Self {
        Self {
            material: 0,
            description: Some(1),
            quantity: 2,
            location: Some(3),
            lot: Some(4),
            extras: (5..width).map(|i| (i, format!("column_{}", i + 1))).collect(),
        }
    }
}

/// Case-insensitive, whitespace- and separator-tolerant header key.
fn normalize(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
