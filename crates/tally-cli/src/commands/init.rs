use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tally_config::{PROJECT_DIR, TallyConfig};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: String,
    config_path: String,
    config_written: bool,
}

/// Handle `tally init`: create `.tally/trail/` and a default `config.toml`.
pub fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = match &flags.project {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let response = init_project(&root, args.force)?;
    output(&response, flags.format)
}

fn init_project(root: &Path, force: bool) -> anyhow::Result<InitResponse> {
    let tally_dir = root.join(PROJECT_DIR);
    let trail_dir = tally_dir.join("trail");
    std::fs::create_dir_all(&trail_dir)
        .with_context(|| format!("failed to create {}", trail_dir.display()))?;

    let config_path = tally_dir.join("config.toml");
    let config_written = force || !config_path.exists();
    if config_written {
        let rendered = toml::to_string_pretty(&TallyConfig::default())
            .context("failed to render default configuration")?;
        std::fs::write(&config_path, rendered)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
    }

    tracing::info!(root = %root.display(), config_written, "project initialized");
    Ok(InitResponse {
        project_root: root.display().to_string(),
        config_path: config_path.display().to_string(),
        config_written,
    })
}

#[cfg(test)]
mod tests {
    use tally_config::TallyConfig;

    use super::init_project;

    #[test]
    fn creates_layout_and_loadable_config() {
        let temp = tempfile::tempdir().expect("tempdir should create");

        let response = init_project(temp.path(), false).expect("init should work");
        assert!(response.config_written);
        assert!(temp.path().join(".tally/trail").is_dir());

        let config =
            TallyConfig::load_for_project(temp.path()).expect("written config should load");
        assert_eq!(config.import.delimiter, ",");
    }

    #[test]
    fn existing_config_is_kept_unless_forced() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let config_path = temp.path().join(".tally/config.toml");
        std::fs::create_dir_all(config_path.parent().expect("parent")).expect("dir");
        std::fs::write(&config_path, "[auditor]\ndefault_id = \"ctrl07\"\n").expect("write");

        let kept = init_project(temp.path(), false).expect("init should work");
        assert!(!kept.config_written);
        assert!(
            std::fs::read_to_string(&config_path)
                .expect("read")
                .contains("ctrl07")
        );

        let forced = init_project(temp.path(), true).expect("init should work");
        assert!(forced.config_written);
        assert!(
            !std::fs::read_to_string(&config_path)
                .expect("read")
                .contains("ctrl07")
        );
    }
}
