use calm_session::{AssessmentEngine, ResumeSource};
use calm_store::{RecordStore, WriteOutcome};

use super::types::{AnalysisView, PersistenceView, SessionResponse, StepSummary, resume_label, summarize};

/// Push writes the primary missed earlier. Anything still undelivered stays
/// in the local cache and is re-queued by the next resume.
pub async fn sync_quietly<P: RecordStore>(engine: &mut AssessmentEngine<P>) {
    let pending = engine.store().pending_writes();
    if pending == 0 {
        return;
    }
    match engine.sync().await {
        Ok(delivered) => tracing::debug!(delivered, "delivered queued writes"),
        Err(error) => tracing::warn!(
            %error,
            pending,
            "remote store still unreachable; queued writes remain in the local cache"
        ),
    }
}

pub fn session_response<P: RecordStore>(
    engine: &AssessmentEngine<P>,
    source: Option<ResumeSource>,
    outcome: Option<&WriteOutcome>,
) -> SessionResponse {
    let session = engine.session();
    let (position, total) = engine.progress();
    SessionResponse {
        session_id: session.session_id.clone(),
        user_id: session.user_id.clone(),
        status: session.status,
        current_step: session.current_step,
        progress: format!("{position}/{total}"),
        results: session
            .step_results
            .iter()
            .map(|(step, result)| StepSummary {
                step: *step,
                summary: summarize(result),
            })
            .collect(),
        skipped_steps: session.skipped_steps.clone(),
        revision: session.revision,
        resumed_from: source.map(resume_label),
        persistence: outcome.map(PersistenceView::from_outcome),
        pending_writes: engine.store().pending_writes(),
        analysis: session.analysis.as_ref().map(|analysis| AnalysisView {
            overall_severity: analysis.overall_severity.label(),
            risk_level: analysis.risk_level.label(),
            risk_flags: analysis.risk_flags.iter().map(|flag| flag.as_str()).collect(),
            recommendations: analysis.recommendations.clone(),
        }),
    }
}
