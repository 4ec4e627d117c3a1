//! Starting and resuming sessions.
//!
//! Resume reads the session envelope and every per-step record. Step
//! records are written on every `record_step_result` while the envelope is
//! written on transitions, so a step record can be newer than the envelope
//! that should contain it. Such results are merged back in, which is what
//! keeps resume from losing a recorded step.

use calm_core::enums::Step;
use calm_core::errors::CoreError;
use calm_core::ids::{generate_session_id, validate_session_id};
use calm_core::results::StepResult;
use calm_core::session::AssessmentSession;
use calm_scoring::SampleBuffer;
use calm_store::{RecordKey, RecordStore, Source, TieredStore, WriteOutcome};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::engine::{AssessmentEngine, check_shape};
use crate::error::SessionError;

/// Where a resumed session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeSource {
    /// The envelope was read from the primary store.
    Primary,
    /// The primary was unreachable or stale; the local cache answered.
    LocalCache,
    /// No envelope was found, but step results were.
    StepRecordsOnly,
    /// Nothing was stored; a new session was started.
    New,
}

impl<P: RecordStore> AssessmentEngine<P> {
    /// Start a new session at `introduction` and persist its envelope.
    ///
    /// A missing `session_id` is generated.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Core`] for an invalid caller-supplied id
    /// - [`SessionError::SessionExists`] when records already exist for it
    /// - [`SessionError::Store`] when neither store tier can be read
    pub async fn start(
        mut store: TieredStore<P>,
        session_id: Option<String>,
        user_id: &str,
    ) -> Result<(Self, WriteOutcome), SessionError> {
        let session_id = match session_id {
            Some(id) => {
                validate_session_id(&id)?;
                if store.get(&RecordKey::envelope(id.clone())).await?.is_some() {
                    return Err(SessionError::SessionExists(id));
                }
                id
            }
            None => generate_session_id()?,
        };

        let mut engine = Self {
            session: AssessmentSession::new(session_id, user_id, Utc::now()),
            store,
            samples: SampleBuffer::new(),
        };
        let outcome = engine.persist_envelope().await?;
        info!(session = %engine.session.session_id, user = user_id, "assessment started");
        Ok((engine, outcome))
    }

    /// Load the most recent stored state for `session_id`.
    ///
    /// Step results stored after the envelope was last written are merged
    /// in. When nothing is stored a new session is started under
    /// `session_id` for `user_id`; otherwise `user_id` is ignored.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Core`] for an invalid id or an envelope stored
    ///   under a different id
    /// - [`SessionError::Store`] when neither tier can be read or a stored
    ///   record does not decode
    pub async fn resume(
        mut store: TieredStore<P>,
        session_id: &str,
        user_id: &str,
    ) -> Result<(Self, ResumeSource), SessionError> {
        validate_session_id(session_id)?;

        let envelope = store.get(&RecordKey::envelope(session_id)).await?;
        let (mut session, mut source) = match envelope {
            Some(lookup) => {
                let session: AssessmentSession = lookup.record.decode()?;
                if session.session_id != session_id {
                    return Err(CoreError::Validation(format!(
                        "stored envelope for {session_id} belongs to {}",
                        session.session_id
                    ))
                    .into());
                }
                let source = match lookup.source {
                    Source::Primary => ResumeSource::Primary,
                    Source::Local => ResumeSource::LocalCache,
                };
                (session, source)
            }
            None => (
                AssessmentSession::new(session_id, user_id, Utc::now()),
                ResumeSource::New,
            ),
        };

        let merged = merge_step_records(&mut store, &mut session).await?;
        if source == ResumeSource::New && merged > 0 {
            source = ResumeSource::StepRecordsOnly;
        }

        let mut engine = Self {
            session,
            store,
            samples: SampleBuffer::new(),
        };
        if source == ResumeSource::New {
            engine.persist_envelope().await?;
            info!(session = session_id, "no stored session; started a new one");
        } else {
            info!(
                session = session_id,
                ?source,
                step = %engine.session.current_step,
                status = %engine.session.status,
                merged,
                "assessment resumed"
            );
        }
        Ok((engine, source))
    }
}

/// Fold stored step results the envelope does not carry into `session`.
/// Returns how many were merged.
async fn merge_step_records<P: RecordStore>(
    store: &mut TieredStore<P>,
    session: &mut AssessmentSession,
) -> Result<usize, SessionError> {
    let mut merged = 0;
    for step in Step::ALL {
        if step.expected_result().is_none()
            || session.step_results.contains_key(&step)
            || session.is_skipped(step)
        {
            continue;
        }
        let Some(lookup) = store
            .get(&RecordKey::step(session.session_id.clone(), step))
            .await?
        else {
            continue;
        };
        let result: StepResult = lookup.record.decode()?;
        if let Err(e) = check_shape(step, &result) {
            warn!(session = %session.session_id, %step, error = %e, "ignoring stored step result");
            continue;
        }
        debug!(session = %session.session_id, %step, "merged stored step result");
        session.step_results.insert(step, result);
        if session.current_step < step && !session.is_closed() {
            session.current_step = step;
        }
        merged += 1;
    }
    if merged > 0 {
        session.revision += 1;
        session.updated_at = Utc::now();
    }
    Ok(merged)
}
