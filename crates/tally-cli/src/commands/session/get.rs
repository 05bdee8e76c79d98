use serde::Serialize;
use tally_core::entities::Session;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// A session with the description of its inventory type.
#[derive(Debug, Serialize)]
struct SessionView {
    #[serde(flatten)]
    session: Session,
    type_label: &'static str,
    source_tables: [&'static str; 2],
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            type_label: session.inventory_type.label(),
            source_tables: session.inventory_type.source_tables(),
            session,
        }
    }
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.service.get_session(id).await?;
    output(&SessionView::from(session), flags.format)
}
