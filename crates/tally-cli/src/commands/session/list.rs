use tally_core::enums::SessionStatus;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    status: Option<&str>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let status = status
        .map(|value| parse_enum::<SessionStatus>(value, "status"))
        .transpose()?;
    let limit = effective_limit(limit, flags.limit, ctx.config.general.default_limit);

    let sessions = ctx
        .service
        .load_sessions()
        .await
        .into_iter()
        .filter(|session| status.is_none_or(|wanted| session.status == wanted))
        .collect();
    output(&truncate(sessions, limit), flags.format)
}
