//! Entity structs for all Tally domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip, trail persistence, and schema validation.

mod assignment;
mod extract;
mod metrics;
mod report;
mod session;

pub use assignment::Assignment;
pub use extract::{ExtensionAttributes, ExtractRow};
pub use metrics::Metrics;
pub use report::SessionReport;
pub use session::Session;

/// Quantities are exact decimals so the count comparison is exact.
pub type Quantity = rust_decimal::Decimal;
