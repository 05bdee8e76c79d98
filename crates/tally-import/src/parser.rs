//! CSV extract parser.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tally_config::ImportConfig;
use tally_core::entities::{ExtensionAttributes, ExtractRow};
use tally_engine::parse_quantity;
use tracing::{debug, warn};

use crate::columns::ColumnMap;
use crate::error::{ImportError, RowError, RowErrorKind};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Everything recovered from one extract file.
#[derive(Debug, Clone, Default)]
pub struct ParsedExtract {
    /// Accepted rows, in file order, with unique material ids.
    pub rows: Vec<ExtractRow>,
    /// Unmapped column values of the accepted rows.
    pub extensions: ExtensionAttributes,
    /// Rejected rows.
    pub errors: Vec<RowError>,
    /// Data rows seen, accepted or not.
    pub total_rows: usize,
}

impl ParsedExtract {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Reads extracts according to an [`ImportConfig`].
#[derive(Debug, Clone)]
pub struct ExtractParser {
    config: ImportConfig,
    delimiter: u8,
}

impl ExtractParser {
    /// # Errors
    ///
    /// Returns `ImportError::Config` if the configuration is invalid.
    pub fn new(config: ImportConfig) -> Result<Self, ImportError> {
        config.validate()?;
        let delimiter = config.delimiter_byte()?;
        Ok(Self { config, delimiter })
    }

    /// # Errors
    ///
    /// See [`Self::parse_reader`]; also fails if the file cannot be opened.
    pub fn parse_path(&self, path: &Path) -> Result<ParsedExtract, ImportError> {
        debug!(path = %path.display(), "reading extract");
        let file = std::fs::File::open(path)?;
        self.parse_reader(file)
    }

    /// Parse an extract from any reader.
    ///
    /// # Errors
    ///
    /// - `Empty` if there is nothing to read
    /// - `MissingColumn` if the header lacks a material or quantity column
    /// - `TooManyRows` past the configured row limit
    /// - `Io` / `Csv` on read failures
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<ParsedExtract, ImportError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.parse_bytes(&data)
    }

    /// # Errors
    ///
    /// See [`Self::parse_reader`].
    pub fn parse_bytes(&self, data: &[u8]) -> Result<ParsedExtract, ImportError> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(ImportError::Empty);
        }

        let mut csv = csv::ReaderBuilder::new()
            .has_headers(self.config.has_headers)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(data);

        let header_map = if self.config.has_headers {
            let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
            Some(ColumnMap::from_headers(&headers, &self.config.columns)?)
        } else {
            None
        };

        let mut parsed = ParsedExtract::default();
        let mut seen = HashSet::new();

        for (index, record) in csv.records().enumerate() {
            let record = record?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            parsed.total_rows += 1;
            if parsed.total_rows > self.config.max_rows {
                return Err(ImportError::TooManyRows {
                    limit: self.config.max_rows,
                });
            }

            let line_number = record
                .position()
                .map_or_else(|| self.fallback_line(index), csv::Position::line);

            let positional;
            let map = match &header_map {
                Some(map) => map,
                None => {
                    positional = ColumnMap::positional(record.len());
                    &positional
                }
            };

            match read_row(&record, map, line_number) {
                Ok(row) => {
                    if !seen.insert(row.material_id.clone()) {
                        parsed.errors.push(RowError {
                            line_number,
                            material_id: Some(row.material_id.clone()),
                            column_name: Some("material".into()),
                            kind: RowErrorKind::DuplicateInFile,
                            message: format!(
                                "Duplicate material '{}' within extract",
                                row.material_id
                            ),
                        });
                        continue;
                    }
                    for (column, header) in &map.extras {
                        if let Some(value) = record.get(*column).map(str::trim) {
                            if !value.is_empty() {
                                parsed.extensions.insert(&row.material_id, header, value);
                            }
                        }
                    }
                    parsed.rows.push(row);
                }
                Err(error) => parsed.errors.push(error),
            }
        }

        if !parsed.errors.is_empty() {
            warn!(
                rejected = parsed.errors.len(),
                accepted = parsed.rows.len(),
                "extract rows skipped"
            );
        }
        debug!(
            rows = parsed.rows.len(),
            extended = parsed.extensions.len(),
            "extract parsed"
        );
        Ok(parsed)
    }

    fn fallback_line(&self, index: usize) -> u64 {
        let offset = if self.config.has_headers { 2 } else { 1 };
        u64::try_from(index).unwrap_or(u64::MAX).saturating_add(offset)
    }
}

fn read_row(
    record: &csv::StringRecord,
    map: &ColumnMap,
    line_number: u64,
) -> Result<ExtractRow, RowError> {
    let field = |index: Option<usize>| {
        index
            .and_then(|i| record.get(i))
            .map(str::trim)
            .unwrap_or_default()
    };

    let material_id = field(Some(map.material));
    if material_id.is_empty() {
        return Err(RowError {
            line_number,
            material_id: None,
            column_name: Some("material".into()),
            kind: RowErrorKind::MissingValue,
            message: "Material id is empty".into(),
        });
    }

    let raw_quantity = field(Some(map.quantity));
    if raw_quantity.is_empty() {
        return Err(RowError {
            line_number,
            material_id: Some(material_id.to_string()),
            column_name: Some("quantity".into()),
            kind: RowErrorKind::MissingValue,
            message: "Expected quantity is empty".into(),
        });
    }
    let expected_quantity = parse_quantity(raw_quantity).map_err(|e| RowError {
        line_number,
        material_id: Some(material_id.to_string()),
        column_name: Some("quantity".into()),
        kind: RowErrorKind::InvalidQuantity,
        message: e.to_string(),
    })?;

    let lot = field(map.lot);
    Ok(ExtractRow {
        material_id: material_id.to_string(),
        description: field(map.description).to_string(),
        expected_quantity,
        location_code: field(map.location).to_string(),
        lot_id: (!lot.is_empty()).then(|| lot.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal::Decimal;

    use super::*;

    fn parser() -> ExtractParser {
        ExtractParser::new(ImportConfig::default()).unwrap()
    }

    #[test]
    fn parses_basic_extract() {
        let data = b"material,description,quantity,location,lot\n\
A,Widget,100,A-01,\n\
B,Gadget,50.5,B-02,L7\n";
        let parsed = parser().parse_bytes(data).unwrap();
        assert!(parsed.is_clean());
        assert_eq!(parsed.total_rows, 2);
        assert_eq!(parsed.rows[0].material_id, "A");
        assert_eq!(parsed.rows[0].expected_quantity, Decimal::from(100));
        assert_eq!(parsed.rows[0].lot_id, None);
        assert_eq!(parsed.rows[1].expected_quantity, Decimal::new(505, 1));
        assert_eq!(parsed.rows[1].lot_id.as_deref(), Some("L7"));
    }

    #[test]
    fn strips_bom() {
        let data = b"\xEF\xBB\xBFmaterial,quantity\nA,1\n";
        let parsed = parser().parse_bytes(data).unwrap();
        assert_eq!(parsed.rows.len(), 1);
    }

    #[test]
    fn duplicate_material_is_a_row_error() {
        let data = b"material,quantity\nA,1\nA,2\n";
        let parsed = parser().parse_bytes(data).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].kind, RowErrorKind::DuplicateInFile);
        assert_eq!(parsed.errors[0].line_number, 3);
    }

    #[rstest]
    #[case(b"material,quantity\nA,-5\n", RowErrorKind::InvalidQuantity)]
    #[case(b"material,quantity\nA,ten\n", RowErrorKind::InvalidQuantity)]
    #[case(b"material,quantity\nA,\n", RowErrorKind::MissingValue)]
    #[case(b"material,quantity\n,4\n", RowErrorKind::MissingValue)]
    fn bad_rows_are_collected(#[case] data: &[u8], #[case] kind: RowErrorKind) {
        let parsed = parser().parse_bytes(data).unwrap();
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].kind, kind);
        assert_eq!(parsed.total_rows, 1);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let data = b"material,quantity\nA,1\n,\nB,2\n";
        let parsed = parser().parse_bytes(data).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.total_rows, 2);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            parser().parse_bytes(b"\xEF\xBB\xBF  \n"),
            Err(ImportError::Empty)
        ));
    }

    #[test]
    fn row_limit_is_enforced() {
        let config = ImportConfig {
            max_rows: 2,
            ..ImportConfig::default()
        };
        let parser = ExtractParser::new(config).unwrap();
        let err = parser
            .parse_bytes(b"material,quantity\nA,1\nB,1\nC,1\n")
            .unwrap_err();
        assert!(matches!(err, ImportError::TooManyRows { limit: 2 }));
    }

    #[test]
    fn headerless_extract_is_positional() {
        let config = ImportConfig {
            has_headers: false,
            delimiter: ";".into(),
            ..ImportConfig::default()
        };
        let parser = ExtractParser::new(config).unwrap();
        let parsed = parser.parse_bytes(b"A;Widget;3;A-01;;1000\n").unwrap();
        assert_eq!(parsed.rows[0].description, "Widget");
        assert_eq!(parsed.rows[0].location_code, "A-01");
        assert_eq!(
            parsed.extensions.get("A").unwrap()["column_6"],
            "1000".to_string()
        );
    }
}
