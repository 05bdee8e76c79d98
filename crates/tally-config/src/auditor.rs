//! Default identities used when a command does not name one.

use serde::{Deserialize, Serialize};

fn default_auditor_id() -> String {
    String::from("ctrl01")
}

fn default_creator_id() -> String {
    String::from("admin")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditorConfig {
    /// Auditor that imported rows are assigned to by default.
    #[serde(default = "default_auditor_id")]
    pub default_id: String,

    /// Recorded as the creator of new sessions.
    #[serde(default = "default_creator_id")]
    pub creator_id: String,
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            default_id: default_auditor_id(),
            creator_id: default_creator_id(),
        }
    }
}
