use anyhow::bail;
use tally_core::enums::SessionStatus;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Print the report of a finalized session.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.service.get_session(id).await?;
    if session.status != SessionStatus::Finalized {
        bail!("session {id} is still {}; finalize it first", session.status);
    }

    let Some(report) = ctx
        .service
        .history()
        .await
        .into_iter()
        .find(|report| report.session_id == id)
    else {
        bail!("no report recorded for finalized session {id}");
    };
    output(&report, flags.format)
}
