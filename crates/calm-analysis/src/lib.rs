//! # calm-analysis
//!
//! The composite analysis generator. Given a session's recorded step
//! results it derives:
//!
//! - overall severity: the mean of per-instrument severity ordinals
//! - risk level: a count of risk flags
//! - correlations between facial distress indices and questionnaires
//! - a templated narrative report
//! - recommendations selected by severity and risk
//!
//! [`generate`] is pure. It never touches session state and returns the same
//! value for the same input.

pub mod error;
pub mod inputs;
pub mod narrative;
pub mod recommendations;
pub mod report;
pub mod severity;

use std::collections::BTreeMap;

use calm_core::analysis::CompositeAnalysis;
use calm_core::enums::Step;
use calm_core::results::StepResult;
use tracing::debug;

pub use error::AnalysisError;
pub use inputs::Inputs;
pub use report::{render_download, report_file_name};

/// Build the composite analysis from recorded step results.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientInputs`] when no depression, anxiety,
/// or mood result is present, and [`AnalysisError::InvalidResult`] when a
/// questionnaire score is outside its instrument's range.
pub fn generate(step_results: &BTreeMap<Step, StepResult>) -> Result<CompositeAnalysis, AnalysisError> {
    let inputs = Inputs::from_results(step_results);
    if !inputs.has_severity_input() {
        return Err(AnalysisError::InsufficientInputs);
    }

    let overall_severity = severity::overall_severity(&inputs)?;
    let risk_flags = severity::risk_flags(&inputs);
    let risk_level = severity::risk_level(&risk_flags);
    let correlations = narrative::correlations(&inputs);
    let narrative_report = narrative::render(&inputs, overall_severity, risk_level, &correlations);
    let recommendations = recommendations::recommend(&inputs, overall_severity, risk_level);

    debug!(
        severity = overall_severity.as_str(),
        risk = risk_level.label(),
        flags = risk_flags.len(),
        "generated composite analysis"
    );

    Ok(CompositeAnalysis {
        overall_severity,
        risk_level,
        risk_flags,
        correlations,
        narrative_report,
        recommendations,
    })
}
