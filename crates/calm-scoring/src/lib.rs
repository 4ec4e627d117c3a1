//! # calm-scoring
//!
//! Pure scoring for the assessment instruments and emotion sampling.
//!
//! - [`catalogue`]: the built-in instruments (depression, anxiety, and the
//!   four wellness sub-scales) with their questions, options, and buckets
//! - [`answers`]: answer sheets and the questionnaire scorer
//! - [`emotion`]: emotion samples, the sample buffer, and the aggregator
//!
//! Nothing here performs I/O. Every function is deterministic.

pub mod answers;
pub mod catalogue;
pub mod emotion;
pub mod error;
pub mod instrument;

pub use answers::{Answer, AnswerSheet, score, score_sheet, score_sheet_for, score_wellness};
pub use catalogue::definition;
pub use emotion::{CONFIDENCE_FLOOR, EmotionSample, SampleBuffer, aggregate};
pub use error::{ScoringError, ValidationError};
pub use instrument::InstrumentDefinition;
