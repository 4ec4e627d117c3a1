//! Step, status, instrument, and classification enums.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Enums with state machines provide `allowed_next_states()` so the session
//! layer can enforce valid transitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One stage of the comprehensive assessment.
///
/// ```text
/// introduction → depression → anxiety → mood_sampling → wellness_survey → results
/// ```
///
/// Declaration order is the session order, so `Ord` compares positions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Introduction,
    Depression,
    Anxiety,
    MoodSampling,
    WellnessSurvey,
    Results,
}

/// Which result shape a step accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// A scored questionnaire for the given instrument.
    Scored(InstrumentId),
    /// An emotion sampling summary.
    Emotion,
    /// The four wellness sub-scales scored together.
    Wellness,
}

impl Step {
    /// Every step, in session order.
    pub const ALL: [Self; 6] = [
        Self::Introduction,
        Self::Depression,
        Self::Anxiety,
        Self::MoodSampling,
        Self::WellnessSurvey,
        Self::Results,
    ];

    /// Zero-based position in the session order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Introduction => 0,
            Self::Depression => 1,
            Self::Anxiety => 2,
            Self::MoodSampling => 3,
            Self::WellnessSurvey => 4,
            Self::Results => 5,
        }
    }

    /// The step that follows this one, or `None` for the terminal step.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Introduction => Some(Self::Depression),
            Self::Depression => Some(Self::Anxiety),
            Self::Anxiety => Some(Self::MoodSampling),
            Self::MoodSampling => Some(Self::WellnessSurvey),
            Self::WellnessSurvey => Some(Self::Results),
            Self::Results => None,
        }
    }

    /// Valid next states from the current state. Transitions are strictly forward.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Introduction => &[Self::Depression],
            Self::Depression => &[Self::Anxiety],
            Self::Anxiety => &[Self::MoodSampling],
            Self::MoodSampling => &[Self::WellnessSurvey],
            Self::WellnessSurvey => &[Self::Results],
            Self::Results => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// The result shape this step records, if it records one at all.
    #[must_use]
    pub const fn expected_result(self) -> Option<ResultKind> {
        match self {
            Self::Introduction | Self::Results => None,
            Self::Depression => Some(ResultKind::Scored(InstrumentId::Depression)),
            Self::Anxiety => Some(ResultKind::Scored(InstrumentId::Anxiety)),
            Self::MoodSampling => Some(ResultKind::Emotion),
            Self::WellnessSurvey => Some(ResultKind::Wellness),
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Results)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Introduction => "introduction",
            Self::Depression => "depression",
            Self::Anxiety => "anxiety",
            Self::MoodSampling => "mood_sampling",
            Self::WellnessSurvey => "wellness_survey",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Status of an assessment session.
///
/// ```text
/// in_progress → completed
///             → abandoned
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::InProgress => &[Self::Completed, Self::Abandoned],
            Self::Completed | Self::Abandoned => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InstrumentId
// ---------------------------------------------------------------------------

/// A fixed questionnaire with defined questions, option weights, and buckets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentId {
    /// PHQ-9 depression screener.
    Depression,
    /// GAD-7 anxiety screener.
    Anxiety,
    /// Brief resilience scale (wellness sub-scale).
    Resilience,
    /// Perceived stress (wellness sub-scale).
    Stress,
    /// Sleep quality (wellness sub-scale).
    SleepQuality,
    /// Social support (wellness sub-scale).
    SocialSupport,
}

impl InstrumentId {
    /// The four sub-scales scored together in the wellness survey step.
    pub const WELLNESS: [Self; 4] = [
        Self::Resilience,
        Self::Stress,
        Self::SleepQuality,
        Self::SocialSupport,
    ];

    #[must_use]
    pub const fn is_wellness(self) -> bool {
        matches!(
            self,
            Self::Resilience | Self::Stress | Self::SleepQuality | Self::SocialSupport
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Depression => "depression",
            Self::Anxiety => "anxiety",
            Self::Resilience => "resilience",
            Self::Stress => "stress",
            Self::SleepQuality => "sleep_quality",
            Self::SocialSupport => "social_support",
        }
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EmotionLabel
// ---------------------------------------------------------------------------

/// The fixed label set produced by the external emotion classifier.
///
/// Declaration order is the tie-break order when two labels share the top
/// probability within a single sample.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgusted,
    Surprised,
    Neutral,
}

impl EmotionLabel {
    pub const ALL: [Self; 7] = [
        Self::Happy,
        Self::Sad,
        Self::Angry,
        Self::Fearful,
        Self::Disgusted,
        Self::Surprised,
        Self::Neutral,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Fearful => "fearful",
            Self::Disgusted => "disgusted",
            Self::Surprised => "surprised",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OverallSeverity
// ---------------------------------------------------------------------------

/// Aggregated severity across all completed instruments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OverallSeverity {
    Minimal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
}

impl OverallSeverity {
    /// Bucket a mean severity ordinal.
    ///
    /// `≤1.5` Minimal, `≤2.5` Mild, `≤3.5` Moderate, `≤4.5` Moderately Severe,
    /// otherwise Severe.
    #[must_use]
    pub fn from_mean_ordinal(mean: f64) -> Self {
        if mean <= 1.5 {
            Self::Minimal
        } else if mean <= 2.5 {
            Self::Mild
        } else if mean <= 3.5 {
            Self::Moderate
        } else if mean <= 4.5 {
            Self::ModeratelySevere
        } else {
            Self::Severe
        }
    }

    /// Human-readable label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::ModeratelySevere => "Moderately Severe",
            Self::Severe => "Severe",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::ModeratelySevere => "moderately_severe",
            Self::Severe => "severe",
        }
    }
}

impl fmt::Display for OverallSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

/// Risk classification derived from the number of raised risk flags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// 2+ flags → High, 1 → Medium, 0 → Low.
    #[must_use]
    pub const fn from_flag_count(count: usize) -> Self {
        match count {
            0 => Self::Low,
            1 => Self::Medium,
            _ => Self::High,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CorrelationTier
// ---------------------------------------------------------------------------

/// Agreement between a facial distress index and its questionnaire score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationTier {
    Strong,
    Moderate,
    Minimal,
}

impl CorrelationTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Minimal => "minimal",
        }
    }
}

impl fmt::Display for CorrelationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
