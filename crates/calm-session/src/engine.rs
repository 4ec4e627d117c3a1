//! The assessment engine: owns one session and its store.
//!
//! Every mutator validates against the current session state first, then
//! applies the change in memory, then persists. Persistence never fails a
//! mutation: the returned [`WriteOutcome`] says how durable the change is,
//! and degraded outcomes are logged here.

use calm_core::enums::{InstrumentId, ResultKind, SessionStatus, Step};
use calm_core::results::StepResult;
use calm_core::session::AssessmentSession;
use calm_scoring::answers::{validate_scored, validate_wellness};
use calm_scoring::emotion::validate_summary;
use calm_scoring::{AnswerSheet, EmotionSample, SampleBuffer, score_sheet_for, score_wellness};
use calm_store::{RecordKey, RecordStore, RemoteStore, TieredStore, WriteOutcome};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::SessionError;

pub struct AssessmentEngine<P: RecordStore = RemoteStore> {
    pub(crate) session: AssessmentSession,
    pub(crate) store: TieredStore<P>,
    pub(crate) samples: SampleBuffer,
}

impl<P: RecordStore> AssessmentEngine<P> {
    #[must_use]
    pub const fn session(&self) -> &AssessmentSession {
        &self.session
    }

    #[must_use]
    pub const fn store(&self) -> &TieredStore<P> {
        &self.store
    }

    #[must_use]
    pub const fn current_step(&self) -> Step {
        self.session.current_step
    }

    /// `(current position, total steps)`, 1-based.
    #[must_use]
    pub const fn progress(&self) -> (usize, usize) {
        self.session.progress()
    }

    /// Samples buffered for the mood-sampling step.
    #[must_use]
    pub const fn buffered_samples(&self) -> usize {
        self.samples.len()
    }

    /// Give up the engine, keeping the session and the store.
    pub fn into_parts(self) -> (AssessmentSession, TieredStore<P>) {
        (self.session, self.store)
    }

    /// Validate `result` for `step` and record it. Does not advance.
    ///
    /// Recording a result equal to the one already stored rewrites the same
    /// record and leaves the session unchanged.
    ///
    /// # Errors
    ///
    /// - [`SessionError::SessionClosed`] for a completed or abandoned session
    /// - [`SessionError::UnexpectedResult`] when `step` records no result or a
    ///   different shape
    /// - [`SessionError::Scoring`] when the result's content is inconsistent
    /// - [`SessionError::NotCurrentStep`] when `step` is not the current step
    /// - [`SessionError::StepAlreadyRecorded`] when a different result exists
    pub async fn record_step_result(
        &mut self,
        step: Step,
        result: StepResult,
    ) -> Result<WriteOutcome, SessionError> {
        self.ensure_open()?;
        check_shape(step, &result)?;
        match &result {
            StepResult::Scored(scored) => validate_scored(scored)?,
            StepResult::Emotion(summary) => validate_summary(summary)?,
            StepResult::Wellness(summary) => validate_wellness(summary)?,
        }

        if self.session.step_results.get(&step) == Some(&result) {
            debug!(session = %self.session.session_id, %step, "identical result re-recorded");
            return self.persist_step(step, &result).await;
        }
        if step != self.session.current_step {
            return Err(SessionError::NotCurrentStep {
                step,
                current: self.session.current_step,
            });
        }
        if self.session.step_results.contains_key(&step) {
            return Err(SessionError::StepAlreadyRecorded(step));
        }

        let outcome = self.persist_step(step, &result).await?;
        self.session.step_results.insert(step, result);
        self.touch();
        info!(session = %self.session.session_id, %step, "recorded step result");
        Ok(outcome)
    }

    /// Score a depression or anxiety sheet and record it for its step.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnexpectedResult`] for a wellness sheet (submit the
    /// survey with [`Self::submit_wellness`]), the scorer's validation errors,
    /// and everything [`Self::record_step_result`] returns.
    pub async fn submit_answers(&mut self, sheet: &AnswerSheet) -> Result<WriteOutcome, SessionError> {
        self.ensure_open()?;
        let step = step_for_instrument(sheet.instrument).ok_or_else(|| {
            SessionError::UnexpectedResult {
                step: Step::WellnessSurvey,
                reason: format!(
                    "{} is a wellness sub-scale; submit the whole survey at once",
                    sheet.instrument
                ),
            }
        })?;
        let scored = score_sheet_for(sheet, sheet.instrument)?;
        self.record_step_result(step, StepResult::Scored(scored)).await
    }

    /// Score all four wellness sub-scales and record the survey.
    ///
    /// # Errors
    ///
    /// The scorer's validation errors and everything
    /// [`Self::record_step_result`] returns.
    pub async fn submit_wellness(
        &mut self,
        sheets: &[AnswerSheet],
    ) -> Result<WriteOutcome, SessionError> {
        self.ensure_open()?;
        let summary = score_wellness(sheets)?;
        self.record_step_result(Step::WellnessSurvey, StepResult::Wellness(summary))
            .await
    }

    /// Buffer one classifier sample. Only accepted during mood sampling.
    ///
    /// # Errors
    ///
    /// [`SessionError::SessionClosed`] or [`SessionError::NotCurrentStep`].
    pub fn push_sample(&mut self, sample: EmotionSample) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.ensure_current(Step::MoodSampling)?;
        self.samples.push(sample);
        Ok(())
    }

    /// End the sampling window: aggregate the buffer and record the summary.
    ///
    /// The buffer is cleared either way. On
    /// [`ScoringError::InsufficientData`](calm_scoring::ScoringError::InsufficientData)
    /// the caller may sample again or [`skip`](Self::skip) the step.
    ///
    /// # Errors
    ///
    /// The aggregator's errors and everything [`Self::record_step_result`]
    /// returns.
    pub async fn finish_sampling(&mut self) -> Result<WriteOutcome, SessionError> {
        self.ensure_open()?;
        self.ensure_current(Step::MoodSampling)?;
        let buffered = self.samples.len();
        let summary = match self.samples.finish() {
            Ok(summary) => summary,
            Err(e) => {
                warn!(session = %self.session.session_id, samples = buffered, error = %e, "mood sampling produced no usable data");
                return Err(e.into());
            }
        };
        self.record_step_result(Step::MoodSampling, StepResult::Emotion(summary))
            .await
    }

    /// Skip the current instrument step without a result and advance.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotSkippable`] for `introduction` and `results`,
    /// [`SessionError::StepAlreadyRecorded`] when the step already has a
    /// result (advance instead).
    pub async fn skip(&mut self) -> Result<WriteOutcome, SessionError> {
        self.ensure_open()?;
        let step = self.session.current_step;
        if step.expected_result().is_none() {
            return Err(SessionError::NotSkippable(step));
        }
        if self.session.step_results.contains_key(&step) {
            return Err(SessionError::StepAlreadyRecorded(step));
        }
        if step == Step::MoodSampling {
            self.samples = SampleBuffer::new();
        }
        if !self.session.is_skipped(step) {
            self.session.skipped_steps.push(step);
        }
        info!(session = %self.session.session_id, %step, "skipped step");
        self.move_forward()?;
        self.persist_envelope().await
    }

    /// Move to the next step, or complete the session from `results`.
    ///
    /// At `results` the composite analysis is generated from the recorded
    /// step results and stored on the session, which becomes `completed`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::StepIncomplete`] when the current step has neither a
    ///   result nor a skip
    /// - [`SessionError::Analysis`] when completion has nothing to analyse;
    ///   the session stays at `results`
    pub async fn advance(&mut self) -> Result<WriteOutcome, SessionError> {
        self.ensure_open()?;
        let step = self.session.current_step;

        if step.is_terminal() {
            let analysis = calm_analysis::generate(&self.session.step_results)?;
            self.transition_status(SessionStatus::Completed)?;
            let now = Utc::now();
            self.session.analysis = Some(analysis);
            self.session.completed_at = Some(now);
            self.touch();
            info!(session = %self.session.session_id, "assessment completed");
            return self.persist_envelope().await;
        }

        if step.expected_result().is_some()
            && !self.session.step_results.contains_key(&step)
            && !self.session.is_skipped(step)
        {
            return Err(SessionError::StepIncomplete(step));
        }
        self.move_forward()?;
        self.persist_envelope().await
    }

    /// Mark the session abandoned. No further changes are accepted.
    ///
    /// # Errors
    ///
    /// [`SessionError::SessionClosed`] when already completed or abandoned.
    pub async fn abandon(&mut self) -> Result<WriteOutcome, SessionError> {
        self.ensure_open()?;
        self.transition_status(SessionStatus::Abandoned)?;
        self.samples = SampleBuffer::new();
        self.touch();
        info!(session = %self.session.session_id, step = %self.session.current_step, "assessment abandoned");
        self.persist_envelope().await
    }

    /// Retry writes the primary store missed.
    ///
    /// # Errors
    ///
    /// The primary's error for the first record it still rejects.
    pub async fn sync(&mut self) -> Result<usize, SessionError> {
        Ok(self.store.flush_outbox().await?)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.session.is_closed() {
            return Err(SessionError::SessionClosed {
                session_id: self.session.session_id.clone(),
                status: self.session.status,
            });
        }
        Ok(())
    }

    fn ensure_current(&self, step: Step) -> Result<(), SessionError> {
        if self.session.current_step == step {
            Ok(())
        } else {
            Err(SessionError::NotCurrentStep {
                step,
                current: self.session.current_step,
            })
        }
    }

    fn move_forward(&mut self) -> Result<(), SessionError> {
        let from = self.session.current_step;
        let to = from
            .next()
            .filter(|next| from.can_transition_to(*next))
            .ok_or_else(|| SessionError::InvalidTransition {
                session_id: self.session.session_id.clone(),
                from: from.to_string(),
                to: "none".to_string(),
            })?;
        self.session.current_step = to;
        self.touch();
        debug!(session = %self.session.session_id, %from, %to, "advanced step");
        Ok(())
    }

    fn transition_status(&mut self, to: SessionStatus) -> Result<(), SessionError> {
        let from = self.session.status;
        if !from.can_transition_to(to) {
            return Err(SessionError::InvalidTransition {
                session_id: self.session.session_id.clone(),
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.session.status = to;
        Ok(())
    }

    fn touch(&mut self) {
        self.session.revision += 1;
        self.session.updated_at = Utc::now();
    }

    async fn persist_step(
        &mut self,
        step: Step,
        result: &StepResult,
    ) -> Result<WriteOutcome, SessionError> {
        let key = RecordKey::step(self.session.session_id.clone(), step);
        let outcome = self.store.put_json(key, result).await?;
        log_outcome(&self.session.session_id, "step result", &outcome);
        Ok(outcome)
    }

    pub(crate) async fn persist_envelope(&mut self) -> Result<WriteOutcome, SessionError> {
        let key = RecordKey::envelope(self.session.session_id.clone());
        let outcome = self.store.put_json(key, &self.session).await?;
        log_outcome(&self.session.session_id, "session envelope", &outcome);
        Ok(outcome)
    }
}

/// The step that records a questionnaire. Wellness sub-scales share one step
/// and are not submitted individually.
pub(crate) const fn step_for_instrument(id: InstrumentId) -> Option<Step> {
    match id {
        InstrumentId::Depression => Some(Step::Depression),
        InstrumentId::Anxiety => Some(Step::Anxiety),
        InstrumentId::Resilience
        | InstrumentId::Stress
        | InstrumentId::SleepQuality
        | InstrumentId::SocialSupport => None,
    }
}

pub(crate) fn check_shape(step: Step, result: &StepResult) -> Result<(), SessionError> {
    if result.fits(step) {
        return Ok(());
    }
    let reason = match step.expected_result() {
        None => "this step records no result".to_string(),
        Some(expected) => format!(
            "expected {}, got {}",
            describe(expected),
            describe(result.kind())
        ),
    };
    Err(SessionError::UnexpectedResult { step, reason })
}

fn describe(kind: ResultKind) -> String {
    match kind {
        ResultKind::Scored(id) => format!("{id} answers"),
        ResultKind::Emotion => "an emotion summary".to_string(),
        ResultKind::Wellness => "a wellness survey".to_string(),
    }
}

fn log_outcome(session_id: &str, what: &str, outcome: &WriteOutcome) {
    match outcome {
        WriteOutcome::Replicated | WriteOutcome::LocalOnly => {
            debug!(session = session_id, what, ?outcome, "persisted");
        }
        WriteOutcome::Degraded { reason } => {
            warn!(session = session_id, what, reason = %reason, "persistence degraded");
        }
        WriteOutcome::Unpersisted { reason } => {
            warn!(session = session_id, what, reason = %reason, "not persisted; in-memory state is the only copy");
        }
    }
}
