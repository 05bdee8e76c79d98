use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally rebuild`: replay every trail file and report what was found.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx
        .service
        .rebuild()
        .await
        .context("trail replay failed")?;
    output(&response, flags.format)
}
