//! Overall severity and risk classification.

use calm_core::analysis::RiskFlag;
use calm_core::enums::{InstrumentId, OverallSeverity, RiskLevel, Step};
use calm_core::results::{DistressIndices, ScoredAnswers};
use calm_scoring::definition;

use crate::error::AnalysisError;
use crate::inputs::Inputs;

/// Questionnaire score at or above which a risk flag is raised.
pub const HIGH_SCORE_THRESHOLD: u32 = 15;

/// Distress index at or above which a risk flag is raised.
pub const HIGH_DISTRESS_THRESHOLD: f64 = 60.0;

/// 1-based bucket position of a questionnaire score on its own scale.
///
/// The 4-bucket anxiety scale tops out at 4.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidResult`] when the score is outside the
/// instrument's range.
pub fn questionnaire_ordinal(step: Step, scored: &ScoredAnswers) -> Result<u8, AnalysisError> {
    definition(scored.instrument)
        .severity_ordinal(scored.total_score)
        .ok_or_else(|| AnalysisError::InvalidResult {
            step,
            reason: format!(
                "{} score {} is outside the instrument's range",
                scored.instrument, scored.total_score
            ),
        })
}

/// Ordinal from the mean of the two distress indices:
/// `≤20` → 1, `≤40` → 2, `≤60` → 3, else 4.
#[must_use]
pub fn mood_ordinal(distress: &DistressIndices) -> u8 {
    let mean = distress.mean();
    if mean <= 20.0 {
        1
    } else if mean <= 40.0 {
        2
    } else if mean <= 60.0 {
        3
    } else {
        4
    }
}

/// Mean of every available ordinal, bucketed.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientInputs`] when no depression, anxiety,
/// or mood result is present.
pub fn overall_severity(inputs: &Inputs<'_>) -> Result<OverallSeverity, AnalysisError> {
    let mut ordinals: Vec<u8> = Vec::with_capacity(3);
    if let Some(d) = inputs.depression {
        ordinals.push(questionnaire_ordinal(Step::Depression, d)?);
    }
    if let Some(a) = inputs.anxiety {
        ordinals.push(questionnaire_ordinal(Step::Anxiety, a)?);
    }
    if let Some(m) = inputs.mood {
        ordinals.push(mood_ordinal(&m.distress));
    }
    if ordinals.is_empty() {
        return Err(AnalysisError::InsufficientInputs);
    }
    let sum: u32 = ordinals.iter().map(|&o| u32::from(o)).sum();
    let count = u32::try_from(ordinals.len()).unwrap_or(1);
    Ok(OverallSeverity::from_mean_ordinal(
        f64::from(sum) / f64::from(count),
    ))
}

/// Raised risk flags, in a fixed order.
#[must_use]
pub fn risk_flags(inputs: &Inputs<'_>) -> Vec<RiskFlag> {
    let mut flags = Vec::new();
    if inputs
        .depression
        .is_some_and(|d| d.total_score >= HIGH_SCORE_THRESHOLD)
    {
        flags.push(RiskFlag::DepressionScore);
    }
    if inputs
        .anxiety
        .is_some_and(|a| a.total_score >= HIGH_SCORE_THRESHOLD)
    {
        flags.push(RiskFlag::AnxietyScore);
    }
    if inputs.mood.is_some_and(|m| {
        m.distress.depression_like >= HIGH_DISTRESS_THRESHOLD
            || m.distress.anxiety_like >= HIGH_DISTRESS_THRESHOLD
    }) {
        flags.push(RiskFlag::EmotionDistress);
    }
    flags
}

#[must_use]
pub const fn risk_level(flags: &[RiskFlag]) -> RiskLevel {
    RiskLevel::from_flag_count(flags.len())
}

/// Bucket position of the anxiety or depression result, if present.
pub(crate) fn ordinal_of(inputs: &Inputs<'_>, id: InstrumentId) -> Option<u8> {
    let (step, scored) = match id {
        InstrumentId::Depression => (Step::Depression, inputs.depression?),
        InstrumentId::Anxiety => (Step::Anxiety, inputs.anxiety?),
        _ => return None,
    };
    questionnaire_ordinal(step, scored).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scored(instrument: InstrumentId, total: u32) -> ScoredAnswers {
        ScoredAnswers {
            instrument,
            items: vec![],
            total_score: total,
            severity_label: String::new(),
        }
    }

    #[rstest]
    #[case(0.0, 0.0, 1)]
    #[case(20.0, 20.0, 1)]
    #[case(30.0, 40.0, 2)]
    #[case(60.0, 60.0, 3)]
    #[case(61.0, 60.0, 4)]
    fn mood_ordinal_thresholds(#[case] d: f64, #[case] a: f64, #[case] expected: u8) {
        let distress = DistressIndices {
            depression_like: d,
            anxiety_like: a,
        };
        assert_eq!(mood_ordinal(&distress), expected);
    }

    #[rstest]
    #[case(InstrumentId::Depression, 4, 1)]
    #[case(InstrumentId::Depression, 17, 4)]
    #[case(InstrumentId::Depression, 27, 5)]
    #[case(InstrumentId::Anxiety, 12, 3)]
    #[case(InstrumentId::Anxiety, 21, 4)]
    fn questionnaire_ordinals(#[case] id: InstrumentId, #[case] total: u32, #[case] expected: u8) {
        assert_eq!(questionnaire_ordinal(Step::Depression, &scored(id, total)).unwrap(), expected);
    }

    #[test]
    fn out_of_range_score_is_invalid() {
        let err = questionnaire_ordinal(Step::Anxiety, &scored(InstrumentId::Anxiety, 22)).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidResult { step: Step::Anxiety, .. }));
    }

    #[test]
    fn no_inputs_is_insufficient() {
        assert!(matches!(
            overall_severity(&Inputs::default()),
            Err(AnalysisError::InsufficientInputs)
        ));
    }

    #[test]
    fn mean_of_depression_and_anxiety() {
        let d = scored(InstrumentId::Depression, 22); // 5
        let a = scored(InstrumentId::Anxiety, 3); // 1
        let inputs = Inputs {
            depression: Some(&d),
            anxiety: Some(&a),
            ..Inputs::default()
        };
        assert_eq!(overall_severity(&inputs).unwrap(), OverallSeverity::Moderate);
    }

    #[test]
    fn flags_at_thresholds() {
        let d = scored(InstrumentId::Depression, 15);
        let a = scored(InstrumentId::Anxiety, 14);
        let inputs = Inputs {
            depression: Some(&d),
            anxiety: Some(&a),
            ..Inputs::default()
        };
        let flags = risk_flags(&inputs);
        assert_eq!(flags, vec![RiskFlag::DepressionScore]);
        assert_eq!(risk_level(&flags), RiskLevel::Medium);
    }
}
