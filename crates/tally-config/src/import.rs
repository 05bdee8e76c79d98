//! Extract import configuration: delimiter, limits, and header aliases.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_delimiter() -> String {
    String::from(",")
}

const fn default_has_headers() -> bool {
    true
}

/// Maximum rows per import.
const fn default_max_rows() -> usize {
    10_000
}

fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn default_material() -> Vec<String> {
    aliases(&["material", "material_id", "matnr"])
}

fn default_description() -> Vec<String> {
    aliases(&["description", "descripcion", "maktx"])
}

fn default_quantity() -> Vec<String> {
    aliases(&["expected_quantity", "quantity", "cantidad_sap", "labst"])
}

fn default_location() -> Vec<String> {
    aliases(&["location", "location_code", "ubicacion", "lgpla"])
}

fn default_lot() -> Vec<String> {
    aliases(&["lot", "lot_id", "id_lote", "charg"])
}

/// Header names accepted for each core extract field. Matching is
/// case-insensitive; the first header that matches an alias wins.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnAliases {
    #[serde(default = "default_material")]
    pub material: Vec<String>,
    #[serde(default = "default_description")]
    pub description: Vec<String>,
    #[serde(default = "default_quantity")]
    pub quantity: Vec<String>,
    #[serde(default = "default_location")]
    pub location: Vec<String>,
    #[serde(default = "default_lot")]
    pub lot: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            material: default_material(),
            description: default_description(),
            quantity: default_quantity(),
            location: default_location(),
            lot: default_lot(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Single-character field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Whether the first record is a header row. Without headers, columns
    /// are read positionally: material, description, quantity, location, lot.
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,

    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    #[serde(default)]
    pub columns: ColumnAliases,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_headers: default_has_headers(),
            max_rows: default_max_rows(),
            columns: ColumnAliases::default(),
        }
    }
}

impl ImportConfig {
    /// The delimiter as the single byte the CSV reader expects.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` unless the delimiter is exactly one
    /// ASCII character. `\t` and `tab` both mean a tab.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_str() {
            "\\t" | "tab" => return Ok(b'\t'),
            _ => {}
        }
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(ConfigError::InvalidValue {
                field: "import.delimiter".into(),
                reason: format!(
                    "expected a single ASCII character, got '{}'",
                    self.delimiter
                ),
            }),
        }
    }

    /// Check values figment cannot check by type alone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a bad delimiter, a zero row
    /// limit, or an empty alias list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter_byte()?;
        if self.max_rows == 0 {
            return Err(ConfigError::InvalidValue {
                field: "import.max_rows".into(),
                reason: "must be greater than zero".into(),
            });
        }
        for (field, names) in [
            ("material", &self.columns.material),
            ("description", &self.columns.description),
            ("quantity", &self.columns.quantity),
            ("location", &self.columns.location),
            ("lot", &self.columns.lot),
        ] {
            if names.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("import.columns.{field}"),
                    reason: "at least one header alias is required".into(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ImportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert_eq!(config.max_rows, 10_000);
        assert!(config.columns.quantity.contains(&"cantidad_sap".to_string()));
    }

    #[test]
    fn tab_aliases_resolve() {
        for raw in ["\t", "\\t", "tab"] {
            let config = ImportConfig {
                delimiter: raw.into(),
                ..ImportConfig::default()
            };
            assert_eq!(config.delimiter_byte().unwrap(), b'\t');
        }
    }

    #[test]
    fn multi_char_delimiter_is_invalid() {
        let config = ImportConfig {
            delimiter: ";;".into(),
            ..ImportConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "import.delimiter"
        ));
    }

    #[test]
    fn zero_max_rows_is_invalid() {
        let config = ImportConfig {
            max_rows: 0,
            ..ImportConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
