//! Table-driven scoring scenarios across the built-in catalogue.

use calm_core::enums::{EmotionLabel, InstrumentId};
use calm_scoring::catalogue::{ANXIETY, CATALOGUE, DEPRESSION};
use calm_scoring::emotion::validate_summary;
use calm_scoring::{
    Answer, AnswerSheet, EmotionSample, InstrumentDefinition, ScoringError, ValidationError,
    aggregate, definition, score, score_wellness,
};
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Answers whose non-reversed weights add up to `target`, filling questions
/// with the heaviest option first.
fn answers_totalling(def: &InstrumentDefinition, target: u32) -> Vec<Answer> {
    let mut remaining = target;
    def.questions
        .iter()
        .map(|q| {
            let option = def
                .options
                .iter()
                .rev()
                .find(|o| o.weight <= remaining)
                .expect("target reachable");
            remaining -= option.weight;
            Answer::new(q.id, option.value)
        })
        .collect()
}

#[rstest]
#[case(0, "Minimal")]
#[case(4, "Minimal")]
#[case(5, "Mild")]
#[case(12, "Moderate")]
#[case(15, "Moderately Severe")]
#[case(19, "Moderately Severe")]
#[case(22, "Severe")]
#[case(27, "Severe")]
fn depression_buckets(#[case] total: u32, #[case] label: &str) {
    let scored = score(&answers_totalling(&DEPRESSION, total), &DEPRESSION).unwrap();
    assert_eq!(scored.total_score, total);
    assert_eq!(scored.severity_label, label);
}

#[rstest]
#[case(3, "Minimal")]
#[case(9, "Mild")]
#[case(10, "Moderate")]
#[case(14, "Moderate")]
#[case(16, "Severe")]
#[case(21, "Severe")]
fn anxiety_buckets(#[case] total: u32, #[case] label: &str) {
    let scored = score(&answers_totalling(&ANXIETY, total), &ANXIETY).unwrap();
    assert_eq!(scored.total_score, total);
    assert_eq!(scored.severity_label, label);
}

#[test]
fn total_is_sum_of_item_weights_for_every_instrument() {
    for def in CATALOGUE {
        for option in def.options {
            let answers: Vec<Answer> = def
                .questions
                .iter()
                .map(|q| Answer::new(q.id, option.value))
                .collect();
            let scored = score(&answers, def).unwrap();
            let sum: u32 = scored.items.iter().map(|i| i.weight).sum();
            assert_eq!(scored.total_score, sum, "{}", def.id);
            assert!(
                def.buckets.iter().any(|b| b.label == scored.severity_label),
                "{} produced unknown label {}",
                def.id,
                scored.severity_label
            );
        }
    }
}

#[test]
fn scoring_is_deterministic() {
    let answers = answers_totalling(&DEPRESSION, 13);
    assert_eq!(score(&answers, &DEPRESSION).unwrap(), score(&answers, &DEPRESSION).unwrap());
}

#[rstest]
#[case(InstrumentId::Resilience, "1", 6 + 3 * 4)] // 3 forward at 1, 3 reversed at 5
#[case(InstrumentId::Stress, "1", 2 + 2 * 5)] // 2 forward at 1, 2 reversed at 5
#[case(InstrumentId::SleepQuality, "5", 15)]
#[case(InstrumentId::SocialSupport, "2", 6)]
fn wellness_reverse_scoring(#[case] id: InstrumentId, #[case] value: &str, #[case] expected: u32) {
    let def = definition(id);
    let answers: Vec<Answer> = def.questions.iter().map(|q| Answer::new(q.id, value)).collect();
    assert_eq!(score(&answers, def).unwrap().total_score, expected);
}

fn wellness_sheet(id: InstrumentId, value: &str) -> AnswerSheet {
    AnswerSheet {
        instrument: id,
        answers: definition(id)
            .questions
            .iter()
            .map(|q| Answer::new(q.id, value))
            .collect(),
    }
}

#[test]
fn wellness_survey_scores_all_subscales_in_order() {
    let sheets: Vec<AnswerSheet> = InstrumentId::WELLNESS
        .into_iter()
        .rev()
        .map(|id| wellness_sheet(id, "3"))
        .collect();
    let summary = score_wellness(&sheets).unwrap();
    let ids: Vec<_> = summary.subscales.iter().map(|s| s.instrument).collect();
    assert_eq!(ids, InstrumentId::WELLNESS.to_vec());
}

#[test]
fn wellness_survey_requires_every_subscale() {
    let sheets = vec![
        wellness_sheet(InstrumentId::Resilience, "3"),
        wellness_sheet(InstrumentId::Stress, "3"),
    ];
    let err = score_wellness(&sheets).unwrap_err();
    match err {
        ScoringError::Validation(ValidationError::MissingSubscales { missing }) => {
            assert_eq!(missing, vec![InstrumentId::SleepQuality, InstrumentId::SocialSupport]);
        }
        other => panic!("expected MissingSubscales, got {other:?}"),
    }
}

#[test]
fn wellness_survey_rejects_duplicates_and_questionnaires() {
    let mut sheets: Vec<AnswerSheet> = InstrumentId::WELLNESS
        .into_iter()
        .map(|id| wellness_sheet(id, "3"))
        .collect();
    sheets.push(wellness_sheet(InstrumentId::Stress, "2"));
    assert!(matches!(
        score_wellness(&sheets),
        Err(ScoringError::Validation(ValidationError::DuplicateSubscale(InstrumentId::Stress)))
    ));

    let sheets = vec![AnswerSheet {
        instrument: InstrumentId::Depression,
        answers: answers_totalling(&DEPRESSION, 0),
    }];
    assert!(matches!(
        score_wellness(&sheets),
        Err(ScoringError::Validation(ValidationError::NotWellness(_)))
    ));
}

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap()
}

fn sample(secs: i64, label: EmotionLabel, p: f64) -> EmotionSample {
    EmotionSample {
        timestamp: ts(secs),
        probabilities: [(label, p)].into_iter().collect(),
    }
}

#[test]
fn sad_dominates_three_sample_window() {
    let samples = [
        sample(0, EmotionLabel::Sad, 0.6),
        sample(2, EmotionLabel::Sad, 0.5),
        sample(4, EmotionLabel::Neutral, 0.4),
    ];
    let summary = aggregate(&samples).unwrap();
    assert_eq!(summary.dominant_label, EmotionLabel::Sad);
    assert_eq!(summary.sample_count, 3);
    validate_summary(&summary).unwrap();
}

#[test]
fn dominance_ignores_push_order() {
    let samples = vec![
        sample(0, EmotionLabel::Happy, 0.8),
        sample(2, EmotionLabel::Angry, 0.7),
        sample(4, EmotionLabel::Happy, 0.35),
        sample(6, EmotionLabel::Angry, 0.9),
        sample(8, EmotionLabel::Fearful, 0.25),
    ];
    let expected = aggregate(&samples).unwrap();

    let mut rotated = samples.clone();
    for _ in 0..samples.len() {
        rotated.rotate_left(1);
        let summary = aggregate(&rotated).unwrap();
        assert_eq!(summary.dominant_label, expected.dominant_label);
        assert_eq!(summary.distribution, expected.distribution);
    }
    assert_eq!(expected.dominant_label, EmotionLabel::Happy);
}

#[test]
fn samples_deserialize_from_classifier_json() {
    let line = r#"{"timestamp":"2026-10-19T10:00:00Z","probabilities":{"sad":0.7,"neutral":0.2}}"#;
    let parsed: EmotionSample = serde_json::from_str(line).unwrap();
    assert_eq!(parsed.top(), Some((EmotionLabel::Sad, 0.7)));

    let unknown = r#"{"timestamp":"2026-10-19T10:00:00Z","probabilities":{"contempt":0.7}}"#;
    assert!(serde_json::from_str::<EmotionSample>(unknown).is_err());
}

#[test]
fn summary_floats_survive_json_text() {
    let samples: Vec<_> = [0.421_533_557_661_66, 0.639_787_362_193_824_1, 0.765_997_994_675_234_1]
        .into_iter()
        .enumerate()
        .map(|(i, p)| sample(i64::try_from(i).unwrap() * 2, EmotionLabel::Sad, p))
        .collect();
    let summary = aggregate(&samples).unwrap();

    let text = serde_json::to_string(&summary).unwrap();
    let back: calm_core::results::EmotionSummary = serde_json::from_str(&text).unwrap();
    assert_eq!(back, summary);
}
