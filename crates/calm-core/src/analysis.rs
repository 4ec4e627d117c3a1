//! The composite analysis produced when a session reaches its terminal step.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::{CorrelationTier, InstrumentId, OverallSeverity, RiskLevel};

/// A condition that contributes one count toward the risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    /// Depression questionnaire score ≥ 15.
    DepressionScore,
    /// Anxiety questionnaire score ≥ 15.
    AnxietyScore,
    /// Either facial distress index ≥ 60.
    EmotionDistress,
}

impl RiskFlag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DepressionScore => "depression_score",
            Self::AnxietyScore => "anxiety_score",
            Self::EmotionDistress => "emotion_distress",
        }
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agreement between a facial distress index and a questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Correlation {
    pub questionnaire: InstrumentId,
    pub tier: CorrelationTier,
    pub statement: String,
}

/// Terminal artifact of a completed session. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompositeAnalysis {
    pub overall_severity: OverallSeverity,
    pub risk_level: RiskLevel,
    pub risk_flags: Vec<RiskFlag>,
    pub correlations: Vec<Correlation>,
    pub narrative_report: String,
    pub recommendations: Vec<String>,
}
