//! Environment variables sit on top of every file layer.

use figment::Jail;
use pretty_assertions::assert_eq;
use tally_config::TallyConfig;

#[test]
fn env_overrides_nested_fields() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_IMPORT__DELIMITER", ";");
        jail.set_env("TALLY_IMPORT__MAX_ROWS", "250");
        jail.set_env("TALLY_GENERAL__DEFAULT_LIMIT", "5");
        jail.set_env("TALLY_AUDITOR__DEFAULT_ID", "ctrl05");

        let config = TallyConfig::load()?;
        assert_eq!(config.import.delimiter, ";");
        assert_eq!(config.import.max_rows, 250);
        assert_eq!(config.general.default_limit, 5);
        assert_eq!(config.auditor.default_id, "ctrl05");
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".tally")).map_err(|e| e.to_string())?;
        jail.create_file(
            ".tally/config.toml",
            r#"
[auditor]
default_id = "from_file"
"#,
        )?;
        jail.set_env("TALLY_AUDITOR__DEFAULT_ID", "from_env");

        let config = TallyConfig::load()?;
        assert_eq!(config.auditor.default_id, "from_env");
        Ok(())
    });
}

#[test]
fn log_filter_variable_does_not_break_extraction() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_LOG", "debug");
        let config = TallyConfig::load()?;
        assert_eq!(config.general.default_limit, 20);
        Ok(())
    });
}
