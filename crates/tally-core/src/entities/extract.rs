use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Quantity;

/// One line of an ERP extract: the expected quantity of a material at a location.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExtractRow {
    pub material_id: String,
    pub description: String,
    pub expected_quantity: Quantity,
    pub location_code: String,
    pub lot_id: Option<String>,
}

/// Extra extract columns that have no place in [`ExtractRow`], keyed by
/// material id. Kept beside the rows, never handed to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExtensionAttributes {
    pub by_material: BTreeMap<String, BTreeMap<String, String>>,
}

impl ExtensionAttributes {
    pub fn insert(&mut self, material_id: &str, column: &str, value: &str) {
        self.by_material
            .entry(material_id.to_string())
            .or_default()
            .insert(column.to_string(), value.to_string());
    }

    #[must_use]
    pub fn get(&self, material_id: &str) -> Option<&BTreeMap<String, String>> {
        self.by_material.get(material_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_material.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_material.len()
    }
}
