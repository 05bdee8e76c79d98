use serde::de::DeserializeOwned;
use tally_core::entities::Quantity;

/// Parse a `snake_case` enum value using serde deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a counted quantity typed on the command line.
pub fn parse_count(raw: &str) -> anyhow::Result<Quantity> {
    Ok(tally_engine::parse_quantity(raw)?)
}
