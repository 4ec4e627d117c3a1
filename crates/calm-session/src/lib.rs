//! # calm-session
//!
//! The assessment state machine. An [`AssessmentEngine`] owns one
//! [`AssessmentSession`](calm_core::session::AssessmentSession) and the
//! [`TieredStore`](calm_store::TieredStore) it persists to, and is the only
//! thing that mutates either.
//!
//! ```text
//! introduction → depression → anxiety → mood_sampling → wellness_survey → results
//! ```
//!
//! - `record_step_result` stores a validated result for the current step
//! - `advance` moves forward once the step is recorded or skipped, and
//!   completes the session from `results`
//! - `resume` reloads a session from whichever tier is freshest

pub mod engine;
pub mod error;
pub mod resume;

pub use engine::AssessmentEngine;
pub use error::SessionError;
pub use resume::ResumeSource;
