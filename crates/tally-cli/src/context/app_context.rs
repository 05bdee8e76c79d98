use std::path::PathBuf;

use anyhow::Context;
use tally_config::{PROJECT_DIR, TallyConfig};
use tally_store::InventoryService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: InventoryService,
    pub config: TallyConfig,
}

impl AppContext {
    /// Open the inventory service on `<root>/.tally/trail`, replaying any
    /// existing trail files.
    pub async fn init(project_root: PathBuf, config: TallyConfig) -> anyhow::Result<Self> {
        let trail_dir = project_root.join(PROJECT_DIR).join("trail");
        let service = InventoryService::open(trail_dir.clone())
            .await
            .with_context(|| format!("failed to replay trail at {}", trail_dir.display()))?;

        tracing::debug!(root = %project_root.display(), "application context ready");
        Ok(Self { service, config })
    }
}
