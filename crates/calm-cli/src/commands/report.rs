use std::path::PathBuf;

use anyhow::Context;
use calm_analysis::{render_download, report_file_name};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReportArgs;
use crate::context::AppContext;
use crate::output::output;

use super::shared::sync_quietly;
use super::types::ReportResponse;

pub async fn run(args: &ReportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (mut engine, _) = ctx.open(&args.session_id).await?;
    sync_quietly(&mut engine).await;

    let session = engine.session();
    let analysis = session.analysis.as_ref().with_context(|| {
        format!(
            "session {} has no analysis yet (status {}, step {}); advance it from results first",
            session.session_id, session.status, session.current_step
        )
    })?;

    let date = session.completed_at.unwrap_or(session.updated_at).date_naive();
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(report_file_name(date)));
    std::fs::write(&path, render_download(analysis, date))
        .with_context(|| format!("failed to write report to {}", path.display()))?;

    output(
        &ReportResponse {
            session_id: session.session_id.clone(),
            path: path.display().to_string(),
            overall_severity: analysis.overall_severity.label(),
            risk_level: analysis.risk_level.label(),
        },
        flags.format,
    )
}
