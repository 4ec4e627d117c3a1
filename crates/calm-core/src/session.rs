//! The assessment session envelope.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::CompositeAnalysis;
use crate::enums::{SessionStatus, Step};
use crate::results::StepResult;

/// One run through the step sequence.
///
/// `current_step` never moves backwards. `status` is `completed` only once
/// `analysis` is present.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AssessmentSession {
    pub session_id: String,
    pub user_id: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub current_step: Step,
    #[serde(default)]
    pub step_results: BTreeMap<Step, StepResult>,
    #[serde(default)]
    pub skipped_steps: Vec<Step>,
    #[serde(default)]
    pub analysis: Option<CompositeAnalysis>,
    /// Incremented on every mutation.
    #[serde(default)]
    pub revision: u64,
}

impl AssessmentSession {
    /// A fresh session positioned at `introduction`.
    #[must_use]
    pub fn new(session_id: impl Into<String>, user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            status: SessionStatus::InProgress,
            started_at: now,
            completed_at: None,
            updated_at: now,
            current_step: Step::Introduction,
            step_results: BTreeMap::new(),
            skipped_steps: Vec::new(),
            analysis: None,
            revision: 0,
        }
    }

    /// `(current position, total steps)`, both 1-based for display.
    #[must_use]
    pub const fn progress(&self) -> (usize, usize) {
        (self.current_step.index() + 1, Step::ALL.len())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status != SessionStatus::InProgress
    }

    #[must_use]
    pub fn is_skipped(&self, step: Step) -> bool {
        self.skipped_steps.contains(&step)
    }
}
