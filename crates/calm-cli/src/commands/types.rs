use calm_core::enums::{SessionStatus, Step};
use calm_core::results::StepResult;
use calm_session::ResumeSource;
use calm_store::WriteOutcome;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub user_id: String,
    pub status: SessionStatus,
    pub current_step: Step,
    /// `position/total`, 1-based.
    pub progress: String,
    pub results: Vec<StepSummary>,
    pub skipped_steps: Vec<Step>,
    pub revision: u64,
    pub resumed_from: Option<&'static str>,
    pub persistence: Option<PersistenceView>,
    pub pending_writes: usize,
    pub analysis: Option<AnalysisView>,
}

#[derive(Debug, Serialize)]
pub struct StepSummary {
    pub step: Step,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct PersistenceView {
    pub outcome: &'static str,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisView {
    pub overall_severity: &'static str,
    pub risk_level: &'static str,
    pub risk_flags: Vec<&'static str>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SampleResponse {
    pub samples_read: usize,
    #[serde(flatten)]
    pub session: SessionResponse,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub session_id: String,
    pub path: String,
    pub overall_severity: &'static str,
    pub risk_level: &'static str,
}

impl PersistenceView {
    pub fn from_outcome(outcome: &WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Replicated => Self {
                outcome: "replicated",
                reason: None,
            },
            WriteOutcome::LocalOnly => Self {
                outcome: "local_only",
                reason: None,
            },
            WriteOutcome::Degraded { reason } => Self {
                outcome: "degraded",
                reason: Some(reason.clone()),
            },
            WriteOutcome::Unpersisted { reason } => Self {
                outcome: "unpersisted",
                reason: Some(reason.clone()),
            },
        }
    }
}

pub const fn resume_label(source: ResumeSource) -> &'static str {
    match source {
        ResumeSource::Primary => "primary",
        ResumeSource::LocalCache => "local_cache",
        ResumeSource::StepRecordsOnly => "step_records",
        ResumeSource::New => "new",
    }
}

/// One-line description of a recorded result.
pub fn summarize(result: &StepResult) -> String {
    match result {
        StepResult::Scored(scored) => {
            format!("{} ({})", scored.total_score, scored.severity_label)
        }
        StepResult::Emotion(summary) => format!(
            "{} ({} of {} samples counted, distress {:.0}/{:.0})",
            summary.dominant_label,
            summary.counted_samples,
            summary.sample_count,
            summary.distress.depression_like,
            summary.distress.anxiety_like,
        ),
        StepResult::Wellness(summary) => summary
            .subscales
            .iter()
            .map(|s| format!("{} {}", s.instrument, s.severity_label))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
