use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tally_core::responses::ImportResponse;
use tally_import::{ExtractParser, ParsedExtract, RowError};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ImportOutput {
    #[serde(flatten)]
    summary: ImportResponse,
    dry_run: bool,
    rejected: Vec<RowError>,
}

/// Handle `tally import`.
///
/// Accepted rows become pending assignments and their unmapped columns are
/// kept alongside; rejected rows are reported with their line numbers and
/// never block the rest of the file.
pub async fn handle(args: &ImportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut import_config = ctx.config.import.clone();
    if let Some(delimiter) = &args.delimiter {
        import_config.delimiter.clone_from(delimiter);
    }
    let parser = ExtractParser::new(import_config).context("invalid import configuration")?;
    let parsed = parser
        .parse_path(Path::new(&args.file))
        .with_context(|| format!("failed to read extract {}", args.file))?;

    let auditor_id = args
        .auditor
        .clone()
        .unwrap_or_else(|| ctx.config.auditor.default_id.clone());

    let created = if args.dry_run {
        let session = ctx.service.get_session(&args.session).await?;
        tally_engine::ensure_mutable(&session)?;
        parsed.rows.len()
    } else {
        ctx.service
            .push_import_with_extensions(
                &args.session,
                &auditor_id,
                &parsed.rows,
                &parsed.extensions,
            )
            .await?
            .len()
    };

    output(
        &summarize(&args.session, auditor_id, created, parsed, args.dry_run),
        flags.format,
    )
}

fn summarize(
    session_id: &str,
    auditor_id: String,
    created: usize,
    parsed: ParsedExtract,
    dry_run: bool,
) -> ImportOutput {
    let to_u32 = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    ImportOutput {
        summary: ImportResponse {
            session_id: session_id.to_string(),
            auditor_id,
            assignments_created: to_u32(created),
            rows_rejected: to_u32(parsed.errors.len()),
            materials_with_extensions: to_u32(parsed.extensions.len()),
        },
        dry_run,
        rejected: parsed.errors,
    }
}
