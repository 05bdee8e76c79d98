//! # tally-config
//!
//! Layered configuration loading for Tally using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TALLY_*` prefix, `__` as separator)
//! 2. Project-level `.tally/config.toml`
//! 3. User-level `~/.config/tally/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TALLY_IMPORT__DELIMITER` -> `import.delimiter`,
//! `TALLY_AUDITOR__DEFAULT_ID` -> `auditor.default_id`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use tally_config::TallyConfig;
//!
//! let config = TallyConfig::load_with_dotenv().expect("config");
//! println!("default auditor: {}", config.auditor.default_id);
//! ```

mod auditor;
mod error;
mod general;
mod import;

pub use auditor::AuditorConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use import::{ColumnAliases, ImportConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project state directory.
pub const PROJECT_DIR: &str = ".tally";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub auditor: AuditorConfig,
}

impl TallyConfig {
    /// Load configuration from all sources, resolving the project-local file
    /// against the current directory.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for_project(Path::new("."))
    }

    /// Load configuration using `project_root/.tally/config.toml` as the
    /// project-local layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for_project(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain rooted at the current directory.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for_project(Path::new("."))
    }

    /// Build the figment provider chain for a given project root.
    #[must_use]
    pub fn figment_for_project(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TALLY_").split("__"))
    }

    /// Check cross-field constraints after extraction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.import.validate()?;
        if self.auditor.default_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auditor.default_id".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
    }
}
