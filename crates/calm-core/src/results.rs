//! Step result shapes.
//!
//! A step records exactly one [`StepResult`]. The variant must agree with
//! [`Step::expected_result`](crate::enums::Step::expected_result); the session
//! layer enforces that before storing anything.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EmotionLabel, InstrumentId, ResultKind, Step};

/// One answered question with the weight its option carries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScoredItem {
    pub question_id: String,
    pub option_value: String,
    pub weight: u32,
}

/// A fully answered questionnaire.
///
/// `total_score` is always the sum of `items[].weight`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScoredAnswers {
    pub instrument: InstrumentId,
    pub items: Vec<ScoredItem>,
    pub total_score: u32,
    pub severity_label: String,
}

impl ScoredAnswers {
    /// Weight recorded for `question_id`, if it was answered.
    #[must_use]
    pub fn weight_of(&self, question_id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|i| i.question_id == question_id)
            .map(|i| i.weight)
    }
}

/// Proxy distress indices in `[0, 100]`. Not clinical scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DistressIndices {
    /// 100 × mean probability of `sad` over counted samples.
    pub depression_like: f64,
    /// 100 × mean probability of `fearful` over counted samples.
    pub anxiety_like: f64,
}

impl DistressIndices {
    #[must_use]
    pub fn mean(&self) -> f64 {
        f64::midpoint(self.depression_like, self.anxiety_like)
    }
}

/// Reduction of a mood-sampling window.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EmotionSummary {
    /// Every sample received, including those below the confidence floor.
    pub sample_count: u32,
    /// Samples whose top label cleared the confidence floor.
    pub counted_samples: u32,
    pub dominant_label: EmotionLabel,
    /// Mean top-label probability of counted samples, in `[0, 1]`.
    pub mean_confidence: f64,
    pub distress: DistressIndices,
    /// Vote count per label among counted samples.
    pub distribution: BTreeMap<EmotionLabel, u32>,
}

/// The wellness survey: one scored sheet per sub-scale.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WellnessSummary {
    pub subscales: Vec<ScoredAnswers>,
}

impl WellnessSummary {
    #[must_use]
    pub fn subscale(&self, id: InstrumentId) -> Option<&ScoredAnswers> {
        self.subscales.iter().find(|s| s.instrument == id)
    }
}

/// The result recorded for a single step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepResult {
    Scored(ScoredAnswers),
    Emotion(EmotionSummary),
    Wellness(WellnessSummary),
}

impl StepResult {
    #[must_use]
    pub const fn kind(&self) -> ResultKind {
        match self {
            Self::Scored(s) => ResultKind::Scored(s.instrument),
            Self::Emotion(_) => ResultKind::Emotion,
            Self::Wellness(_) => ResultKind::Wellness,
        }
    }

    /// True when this result is the shape `step` records.
    #[must_use]
    pub fn fits(&self, step: Step) -> bool {
        step.expected_result() == Some(self.kind())
    }

    #[must_use]
    pub const fn as_scored(&self) -> Option<&ScoredAnswers> {
        match self {
            Self::Scored(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_emotion(&self) -> Option<&EmotionSummary> {
        match self {
            Self::Emotion(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_wellness(&self) -> Option<&WellnessSummary> {
        match self {
            Self::Wellness(w) => Some(w),
            _ => None,
        }
    }
}
