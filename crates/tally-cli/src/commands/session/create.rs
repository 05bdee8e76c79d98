use tally_core::enums::InventoryType;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    inventory_type: &str,
    created_by: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let inventory_type: InventoryType = parse_enum(inventory_type, "inventory type")?;
    let created_by = created_by.unwrap_or(&ctx.config.auditor.creator_id);
    let session = ctx
        .service
        .create_session(name, inventory_type, created_by)
        .await?;
    output(&session, flags.format)
}
