//! Scoring and aggregation error types.

use calm_core::enums::{EmotionLabel, InstrumentId};
use thiserror::Error;

/// Malformed or incomplete input. The step is not recorded and the caller
/// must correct the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{instrument}: unknown question '{question_id}'")]
    UnknownQuestion {
        instrument: InstrumentId,
        question_id: String,
    },

    #[error("{instrument}: question '{question_id}' answered more than once")]
    DuplicateAnswer {
        instrument: InstrumentId,
        question_id: String,
    },

    #[error("{instrument}: missing answers for {}", .missing.join(", "))]
    MissingAnswers {
        instrument: InstrumentId,
        missing: Vec<String>,
    },

    #[error("{instrument}: '{option_value}' is not a valid option for '{question_id}'")]
    InvalidOption {
        instrument: InstrumentId,
        question_id: String,
        option_value: String,
    },

    #[error("expected answers for {expected}, got {found}")]
    WrongInstrument {
        expected: InstrumentId,
        found: InstrumentId,
    },

    #[error("{instrument}: recorded score does not match its answers: {reason}")]
    InconsistentScore {
        instrument: InstrumentId,
        reason: String,
    },

    #[error("{0} is not a wellness sub-scale")]
    NotWellness(InstrumentId),

    #[error("wellness sub-scale {0} submitted more than once")]
    DuplicateSubscale(InstrumentId),

    #[error("wellness survey is missing sub-scales: {}", join_ids(.missing))]
    MissingSubscales { missing: Vec<InstrumentId> },

    #[error("probability for '{label}' must be within [0, 1], got {value}")]
    InvalidProbability { label: EmotionLabel, value: String },

    #[error("emotion summary is inconsistent: {0}")]
    InconsistentSummary(String),
}

fn join_ids(ids: &[InstrumentId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No sample cleared the confidence floor.
    #[error("Insufficient emotion data: {samples} samples, none above confidence {floor}")]
    InsufficientData { samples: usize, floor: f64 },

    /// A built-in instrument definition is malformed.
    #[error("Instrument definition {instrument} is invalid: {reason}")]
    Definition {
        instrument: InstrumentId,
        reason: String,
    },
}
