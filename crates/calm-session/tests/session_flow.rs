//! End-to-end engine behaviour with an in-process primary store.

mod support;

use calm_analysis::AnalysisError;
use calm_core::enums::{
    EmotionLabel, InstrumentId, OverallSeverity, RiskLevel, SessionStatus, Step,
};
use calm_scoring::ScoringError;
use calm_session::{AssessmentEngine, SessionError};
use calm_store::{MemoryStore, WriteOutcome};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

use support::{sample, sheet, tiered, wellness};

async fn started(dir: &TempDir, primary: &MemoryStore) -> AssessmentEngine<MemoryStore> {
    let (engine, outcome) =
        AssessmentEngine::start(tiered(dir, primary), Some("asm-test".into()), "user-1")
            .await
            .unwrap();
    assert_eq!(outcome, WriteOutcome::Replicated);
    engine
}

#[tokio::test]
async fn full_assessment_completes_with_analysis() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;
    assert_eq!(engine.progress(), (1, 6));

    engine.advance().await.unwrap();
    engine
        .submit_answers(&sheet(InstrumentId::Depression, "3"))
        .await
        .unwrap();
    engine.advance().await.unwrap();
    engine
        .submit_answers(&sheet(InstrumentId::Anxiety, "3"))
        .await
        .unwrap();
    engine.advance().await.unwrap();

    for secs in [0, 2, 4] {
        engine
            .push_sample(sample(secs, EmotionLabel::Sad, 0.7))
            .unwrap();
    }
    assert_eq!(engine.buffered_samples(), 3);
    engine.finish_sampling().await.unwrap();
    assert_eq!(engine.buffered_samples(), 0);
    engine.advance().await.unwrap();

    engine.submit_wellness(&wellness("3")).await.unwrap();
    engine.advance().await.unwrap();
    assert_eq!(engine.current_step(), Step::Results);
    assert_eq!(engine.progress(), (6, 6));

    engine.advance().await.unwrap();

    let session = engine.session();
    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.completed_at.is_some());
    assert_eq!(session.step_results.len(), 4);
    let analysis = session.analysis.as_ref().unwrap();
    // Ordinals 5 (depression 27), 4 (anxiety 21), 2 (distress mean 35).
    assert_eq!(analysis.overall_severity, OverallSeverity::ModeratelySevere);
    assert_eq!(analysis.risk_level, RiskLevel::High);
    assert_eq!(analysis.risk_flags.len(), 3);
    assert!(!analysis.recommendations.is_empty());

    let stored = primary
        .snapshot(&calm_store::RecordKey::envelope("asm-test"))
        .unwrap();
    let stored: calm_core::session::AssessmentSession = stored.decode().unwrap();
    assert_eq!(&stored, session);
}

#[tokio::test]
async fn completed_session_rejects_changes() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;
    engine.advance().await.unwrap();
    engine
        .submit_answers(&sheet(InstrumentId::Depression, "0"))
        .await
        .unwrap();
    engine.advance().await.unwrap();
    for _ in 0..3 {
        engine.skip().await.unwrap();
    }
    engine.advance().await.unwrap();
    assert_eq!(engine.session().status, SessionStatus::Completed);

    assert!(matches!(
        engine.advance().await,
        Err(SessionError::SessionClosed {
            status: SessionStatus::Completed,
            ..
        })
    ));
    assert!(matches!(
        engine.abandon().await,
        Err(SessionError::SessionClosed { .. })
    ));
}

#[tokio::test]
async fn introduction_needs_no_result_but_instruments_do() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;

    engine.advance().await.unwrap();
    assert_eq!(engine.current_step(), Step::Depression);
    assert!(matches!(
        engine.advance().await,
        Err(SessionError::StepIncomplete(Step::Depression))
    ));
}

#[tokio::test]
async fn answers_for_another_step_are_rejected() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;
    engine.advance().await.unwrap();

    let err = engine
        .submit_answers(&sheet(InstrumentId::Anxiety, "1"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotCurrentStep {
            step: Step::Anxiety,
            current: Step::Depression
        }
    ));

    let err = engine
        .submit_answers(&sheet(InstrumentId::Stress, "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::UnexpectedResult { .. }));
}

#[tokio::test]
async fn re_recording_equal_result_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;
    engine.advance().await.unwrap();

    engine
        .submit_answers(&sheet(InstrumentId::Depression, "1"))
        .await
        .unwrap();
    let before = engine.session().clone();

    engine
        .submit_answers(&sheet(InstrumentId::Depression, "1"))
        .await
        .unwrap();
    assert_eq!(engine.session(), &before);

    let err = engine
        .submit_answers(&sheet(InstrumentId::Depression, "2"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::StepAlreadyRecorded(Step::Depression)));
    assert_eq!(engine.session(), &before);
}

#[tokio::test]
async fn invalid_answers_record_nothing() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;
    engine.advance().await.unwrap();

    let mut incomplete = sheet(InstrumentId::Depression, "1");
    incomplete.answers.pop();
    let err = engine.submit_answers(&incomplete).await.unwrap_err();

    assert!(matches!(err, SessionError::Scoring(ScoringError::Validation(_))));
    assert!(engine.session().step_results.is_empty());
    assert_eq!(primary.len(), 1, "only the envelope was written");
}

#[tokio::test]
async fn insufficient_samples_can_be_skipped() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;
    engine.advance().await.unwrap();
    engine.skip().await.unwrap();
    engine.skip().await.unwrap();
    assert_eq!(engine.current_step(), Step::MoodSampling);

    engine
        .push_sample(sample(0, EmotionLabel::Neutral, 0.2))
        .unwrap();
    let err = engine.finish_sampling().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Scoring(ScoringError::InsufficientData { samples: 1, .. })
    ));
    assert_eq!(engine.buffered_samples(), 0);

    engine.skip().await.unwrap();
    assert_eq!(engine.current_step(), Step::WellnessSurvey);
    assert_eq!(
        engine.session().skipped_steps,
        vec![Step::Depression, Step::Anxiety, Step::MoodSampling]
    );
}

#[tokio::test]
async fn samples_are_only_accepted_during_mood_sampling() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;

    assert!(matches!(
        engine.push_sample(sample(0, EmotionLabel::Happy, 0.9)),
        Err(SessionError::NotCurrentStep {
            step: Step::MoodSampling,
            current: Step::Introduction
        })
    ));
}

#[tokio::test]
async fn introduction_and_results_cannot_be_skipped() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;

    assert!(matches!(
        engine.skip().await,
        Err(SessionError::NotSkippable(Step::Introduction))
    ));
    engine.advance().await.unwrap();
    for _ in 0..4 {
        engine.skip().await.unwrap();
    }
    assert!(matches!(
        engine.skip().await,
        Err(SessionError::NotSkippable(Step::Results))
    ));
}

#[tokio::test]
async fn completion_needs_a_severity_input() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;
    engine.advance().await.unwrap();
    engine.skip().await.unwrap();
    engine.skip().await.unwrap();
    engine.skip().await.unwrap();
    engine.submit_wellness(&wellness("4")).await.unwrap();
    engine.advance().await.unwrap();

    let err = engine.advance().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Analysis(AnalysisError::InsufficientInputs)
    ));
    assert_eq!(engine.session().status, SessionStatus::InProgress);
    assert!(engine.session().analysis.is_none());
}

#[tokio::test]
async fn abandoned_session_is_closed() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;
    engine.advance().await.unwrap();

    engine.abandon().await.unwrap();
    assert_eq!(engine.session().status, SessionStatus::Abandoned);
    assert!(engine.session().completed_at.is_none());
    assert!(matches!(
        engine
            .submit_answers(&sheet(InstrumentId::Depression, "0"))
            .await,
        Err(SessionError::SessionClosed { .. })
    ));
}

#[tokio::test]
async fn revision_counts_mutations() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;
    assert_eq!(engine.session().revision, 0);

    engine.advance().await.unwrap();
    engine
        .submit_answers(&sheet(InstrumentId::Depression, "0"))
        .await
        .unwrap();
    assert_eq!(engine.session().revision, 2);
}

#[tokio::test]
async fn start_rejects_existing_and_invalid_ids() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let _first = started(&dir, &primary).await;

    let again =
        AssessmentEngine::start(tiered(&dir, &primary), Some("asm-test".into()), "user-2").await;
    assert!(matches!(again, Err(SessionError::SessionExists(id)) if id == "asm-test"));

    let invalid =
        AssessmentEngine::start(tiered(&dir, &primary), Some("../escape".into()), "user-2").await;
    assert!(matches!(invalid, Err(SessionError::Core(_))));
}

#[tokio::test]
async fn generated_ids_use_session_prefix() {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let (engine, _) = AssessmentEngine::start(tiered(&dir, &primary), None, "anonymous")
        .await
        .unwrap();
    assert!(engine.session().session_id.starts_with("asm-"));
    assert_eq!(engine.session().user_id, "anonymous");
}

#[rstest]
#[case::resilience(InstrumentId::Resilience)]
#[case::stress(InstrumentId::Stress)]
#[case::sleep(InstrumentId::SleepQuality)]
#[case::support(InstrumentId::SocialSupport)]
#[tokio::test]
async fn wellness_subscales_are_not_submitted_alone(#[case] id: InstrumentId) {
    let dir = TempDir::new().unwrap();
    let primary = MemoryStore::new();
    let mut engine = started(&dir, &primary).await;

    let err = engine.submit_answers(&sheet(id, "3")).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::UnexpectedResult {
            step: Step::WellnessSurvey,
            ..
        }
    ));
    assert!(engine.session().step_results.is_empty());
}
