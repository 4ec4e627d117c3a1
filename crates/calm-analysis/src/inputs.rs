//! Typed view over a session's recorded step results.

use std::collections::BTreeMap;

use calm_core::enums::{InstrumentId, Step};
use calm_core::results::{EmotionSummary, ScoredAnswers, StepResult, WellnessSummary};

/// The results the generator reads, each present only if its step recorded
/// the expected shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inputs<'a> {
    pub depression: Option<&'a ScoredAnswers>,
    pub anxiety: Option<&'a ScoredAnswers>,
    pub mood: Option<&'a EmotionSummary>,
    pub wellness: Option<&'a WellnessSummary>,
}

impl<'a> Inputs<'a> {
    #[must_use]
    pub fn from_results(results: &'a BTreeMap<Step, StepResult>) -> Self {
        let scored = |step: Step, id: InstrumentId| {
            results
                .get(&step)
                .and_then(StepResult::as_scored)
                .filter(|s| s.instrument == id)
        };
        Self {
            depression: scored(Step::Depression, InstrumentId::Depression),
            anxiety: scored(Step::Anxiety, InstrumentId::Anxiety),
            mood: results.get(&Step::MoodSampling).and_then(StepResult::as_emotion),
            wellness: results
                .get(&Step::WellnessSurvey)
                .and_then(StepResult::as_wellness),
        }
    }

    /// True when at least one severity-bearing instrument is present.
    /// Wellness alone does not count.
    #[must_use]
    pub const fn has_severity_input(&self) -> bool {
        self.depression.is_some() || self.anxiety.is_some() || self.mood.is_some()
    }

    #[must_use]
    pub fn wellness_label(&self, id: InstrumentId) -> Option<&'a str> {
        self.wellness
            .and_then(|w| w.subscale(id))
            .map(|s| s.severity_label.as_str())
    }
}
