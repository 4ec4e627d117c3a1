use calm_core::enums::Step;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No depression, anxiety, or mood result is available.
    #[error("Analysis needs at least one completed instrument (depression, anxiety, or mood sampling)")]
    InsufficientInputs,

    /// A recorded result cannot be placed on its instrument's scale.
    #[error("Result for step {step} is unusable: {reason}")]
    InvalidResult { step: Step, reason: String },
}
