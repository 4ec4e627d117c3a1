//! Session error types.

use calm_analysis::AnalysisError;
use calm_core::enums::{SessionStatus, Step};
use calm_core::errors::CoreError;
use calm_scoring::ScoringError;
use calm_store::StoreError;
use thiserror::Error;

/// Errors from session operations. Persistence degradation is not an error;
/// it is reported as a [`calm_store::WriteOutcome`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The submitted answers or samples were rejected by the scorer.
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Neither store tier could be read, or a stored record is corrupt.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Session {session_id} is {status} and accepts no further changes")]
    SessionClosed {
        session_id: String,
        status: SessionStatus,
    },

    #[error("Session {0} already exists; resume it instead")]
    SessionExists(String),

    #[error("Cannot move session {session_id} from {from} to {to}")]
    InvalidTransition {
        session_id: String,
        from: String,
        to: String,
    },

    #[error("Step {step} is not the current step ({current})")]
    NotCurrentStep { step: Step, current: Step },

    /// A different result is already recorded for the step.
    #[error("Step {0} already has a recorded result")]
    StepAlreadyRecorded(Step),

    /// `advance` was called before the step's result was recorded or the
    /// step was skipped.
    #[error("Step {0} needs a recorded result or an explicit skip before advancing")]
    StepIncomplete(Step),

    #[error("Step {step} cannot record this result: {reason}")]
    UnexpectedResult { step: Step, reason: String },

    #[error("Step {0} cannot be skipped")]
    NotSkippable(Step),
}
