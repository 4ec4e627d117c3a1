//! Questionnaire scoring.
//!
//! Answers arrive as a closed [`AnswerSheet`] keyed by instrument id. Unknown
//! fields are rejected at deserialization; unknown questions, duplicates,
//! missing questions, and out-of-set option values are rejected by [`score`].

use std::collections::{BTreeMap, BTreeSet};

use calm_core::enums::InstrumentId;
use calm_core::results::{ScoredAnswers, ScoredItem, WellnessSummary};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalogue::definition;
use crate::error::{ScoringError, ValidationError};
use crate::instrument::InstrumentDefinition;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Answer {
    pub question_id: String,
    pub option_value: String,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, option_value: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            option_value: option_value.into(),
        }
    }
}

/// Answers to one instrument.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AnswerSheet {
    pub instrument: InstrumentId,
    pub answers: Vec<Answer>,
}

/// Score a complete answer set against `def`.
///
/// Items come back in the instrument's question order regardless of input
/// order. Pure and deterministic.
///
/// # Errors
///
/// Returns [`ScoringError::Validation`] for an unknown question, a duplicate
/// answer, an option outside the instrument's set, or missing questions.
pub fn score(answers: &[Answer], def: &InstrumentDefinition) -> Result<ScoredAnswers, ScoringError> {
    let mut weights: BTreeMap<&str, (&str, u32)> = BTreeMap::new();

    for answer in answers {
        let question = def.question(&answer.question_id).ok_or_else(|| {
            ValidationError::UnknownQuestion {
                instrument: def.id,
                question_id: answer.question_id.clone(),
            }
        })?;
        if weights.contains_key(question.id) {
            return Err(ValidationError::DuplicateAnswer {
                instrument: def.id,
                question_id: answer.question_id.clone(),
            }
            .into());
        }
        let weight = def
            .weight_for(question, &answer.option_value)
            .ok_or_else(|| ValidationError::InvalidOption {
                instrument: def.id,
                question_id: answer.question_id.clone(),
                option_value: answer.option_value.clone(),
            })?;
        weights.insert(question.id, (answer.option_value.as_str(), weight));
    }

    let missing: Vec<String> = def
        .questions
        .iter()
        .filter(|q| !weights.contains_key(q.id))
        .map(|q| q.id.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingAnswers {
            instrument: def.id,
            missing,
        }
        .into());
    }

    let items: Vec<ScoredItem> = def
        .questions
        .iter()
        .filter_map(|q| {
            weights.get(q.id).map(|(value, weight)| ScoredItem {
                question_id: q.id.to_string(),
                option_value: (*value).to_string(),
                weight: *weight,
            })
        })
        .collect();
    let total_score = items.iter().map(|i| i.weight).sum();
    let bucket = def
        .bucket_for(total_score)
        .ok_or_else(|| ScoringError::Definition {
            instrument: def.id,
            reason: format!("score {total_score} falls outside every bucket"),
        })?;

    Ok(ScoredAnswers {
        instrument: def.id,
        items,
        total_score,
        severity_label: bucket.label.to_string(),
    })
}

/// Score a sheet against the built-in definition for its instrument.
///
/// # Errors
///
/// Same as [`score`].
pub fn score_sheet(sheet: &AnswerSheet) -> Result<ScoredAnswers, ScoringError> {
    score(&sheet.answers, definition(sheet.instrument))
}

/// Score a sheet that must belong to `expected`.
///
/// # Errors
///
/// Returns [`ValidationError::WrongInstrument`] when the sheet is for another
/// instrument, otherwise the same as [`score`].
pub fn score_sheet_for(
    sheet: &AnswerSheet,
    expected: InstrumentId,
) -> Result<ScoredAnswers, ScoringError> {
    if sheet.instrument != expected {
        return Err(ValidationError::WrongInstrument {
            expected,
            found: sheet.instrument,
        }
        .into());
    }
    score_sheet(sheet)
}

/// Score the wellness survey: exactly one sheet per wellness sub-scale.
///
/// Sub-scales come back in [`InstrumentId::WELLNESS`] order.
///
/// # Errors
///
/// Returns [`ValidationError::NotWellness`], [`ValidationError::DuplicateSubscale`],
/// or [`ValidationError::MissingSubscales`] for a malformed survey, and any
/// per-sheet error from [`score`].
pub fn score_wellness(sheets: &[AnswerSheet]) -> Result<WellnessSummary, ScoringError> {
    let mut seen = BTreeSet::new();
    for sheet in sheets {
        if !sheet.instrument.is_wellness() {
            return Err(ValidationError::NotWellness(sheet.instrument).into());
        }
        if !seen.insert(sheet.instrument) {
            return Err(ValidationError::DuplicateSubscale(sheet.instrument).into());
        }
    }
    let missing: Vec<InstrumentId> = InstrumentId::WELLNESS
        .into_iter()
        .filter(|id| !seen.contains(id))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingSubscales { missing }.into());
    }

    let mut subscales = Vec::with_capacity(InstrumentId::WELLNESS.len());
    for id in InstrumentId::WELLNESS {
        if let Some(sheet) = sheets.iter().find(|s| s.instrument == id) {
            subscales.push(score_sheet(sheet)?);
        }
    }
    Ok(WellnessSummary { subscales })
}

/// Re-check a [`ScoredAnswers`] produced elsewhere against the built-in
/// definition: every item re-scored, total and label recomputed.
///
/// # Errors
///
/// Returns [`ValidationError::InconsistentScore`] when any recorded weight,
/// the total, or the label disagrees, and any error [`score`] raises for the
/// recorded answers themselves.
pub fn validate_scored(scored: &ScoredAnswers) -> Result<(), ScoringError> {
    let def = definition(scored.instrument);
    let answers: Vec<Answer> = scored
        .items
        .iter()
        .map(|i| Answer::new(i.question_id.clone(), i.option_value.clone()))
        .collect();
    let expected = score(&answers, def)?;

    let inconsistent = |reason: String| -> ScoringError {
        ValidationError::InconsistentScore {
            instrument: scored.instrument,
            reason,
        }
        .into()
    };

    for item in &scored.items {
        if expected.weight_of(&item.question_id) != Some(item.weight) {
            return Err(inconsistent(format!(
                "item '{}' recorded weight {}",
                item.question_id, item.weight
            )));
        }
    }
    if expected.total_score != scored.total_score {
        return Err(inconsistent(format!(
            "total {} but items sum to {}",
            scored.total_score, expected.total_score
        )));
    }
    if expected.severity_label != scored.severity_label {
        return Err(inconsistent(format!(
            "label '{}' but score {} is '{}'",
            scored.severity_label, expected.total_score, expected.severity_label
        )));
    }
    Ok(())
}

/// Re-check every sub-scale of a wellness summary.
///
/// # Errors
///
/// Same as [`score_wellness`] and [`validate_scored`].
pub fn validate_wellness(summary: &WellnessSummary) -> Result<(), ScoringError> {
    let mut seen = BTreeSet::new();
    for sub in &summary.subscales {
        if !sub.instrument.is_wellness() {
            return Err(ValidationError::NotWellness(sub.instrument).into());
        }
        if !seen.insert(sub.instrument) {
            return Err(ValidationError::DuplicateSubscale(sub.instrument).into());
        }
        validate_scored(sub)?;
    }
    let missing: Vec<InstrumentId> = InstrumentId::WELLNESS
        .into_iter()
        .filter(|id| !seen.contains(id))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingSubscales { missing }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{ANXIETY, DEPRESSION};

    fn uniform(def: &InstrumentDefinition, value: &str) -> Vec<Answer> {
        def.questions.iter().map(|q| Answer::new(q.id, value)).collect()
    }

    #[test]
    fn items_follow_question_order() {
        let mut answers = uniform(&ANXIETY, "1");
        answers.reverse();
        let scored = score(&answers, &ANXIETY).unwrap();
        let ids: Vec<_> = scored.items.iter().map(|i| i.question_id.as_str()).collect();
        let expected: Vec<_> = ANXIETY.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(scored.total_score, 7);
        assert_eq!(scored.severity_label, "Mild");
    }

    #[test]
    fn unknown_question_rejected() {
        let mut answers = uniform(&DEPRESSION, "0");
        answers.push(Answer::new("phq9-10", "0"));
        let err = score(&answers, &DEPRESSION).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Validation(ValidationError::UnknownQuestion { .. })
        ));
    }

    #[test]
    fn duplicate_rejected() {
        let mut answers = uniform(&DEPRESSION, "0");
        answers.push(Answer::new("phq9-1", "0"));
        let err = score(&answers, &DEPRESSION).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Validation(ValidationError::DuplicateAnswer { .. })
        ));
    }

    #[test]
    fn missing_lists_every_absent_question() {
        let answers = vec![Answer::new("gad7-1", "0"), Answer::new("gad7-7", "0")];
        let err = score(&answers, &ANXIETY).unwrap_err();
        let missing = match err {
            ScoringError::Validation(ValidationError::MissingAnswers { missing, .. }) => missing,
            other => panic!("expected MissingAnswers, got {other:?}"),
        };
        assert_eq!(missing, ["gad7-2", "gad7-3", "gad7-4", "gad7-5", "gad7-6"]);
    }

    #[test]
    fn out_of_set_option_rejected() {
        let mut answers = uniform(&DEPRESSION, "0");
        answers[3].option_value = "4".into();
        let err = score(&answers, &DEPRESSION).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Validation(ValidationError::InvalidOption { .. })
        ));
    }

    #[test]
    fn wrong_instrument_rejected() {
        let sheet = AnswerSheet {
            instrument: InstrumentId::Anxiety,
            answers: uniform(&ANXIETY, "0"),
        };
        let err = score_sheet_for(&sheet, InstrumentId::Depression).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Validation(ValidationError::WrongInstrument { .. })
        ));
    }

    #[test]
    fn sheet_rejects_unknown_fields() {
        let json = serde_json::json!({
            "instrument": "depression",
            "answers": [],
            "notes": "free text"
        });
        assert!(serde_json::from_value::<AnswerSheet>(json).is_err());

        let json = serde_json::json!({
            "instrument": "depression",
            "answers": [{ "question_id": "phq9-1", "option_value": "0", "score": 3 }]
        });
        assert!(serde_json::from_value::<AnswerSheet>(json).is_err());
    }

    #[test]
    fn validate_scored_accepts_own_output() {
        let scored = score(&uniform(&DEPRESSION, "2"), &DEPRESSION).unwrap();
        validate_scored(&scored).unwrap();
    }

    #[test]
    fn validate_scored_catches_tampered_total() {
        let mut scored = score(&uniform(&DEPRESSION, "1"), &DEPRESSION).unwrap();
        scored.total_score += 1;
        assert!(matches!(
            validate_scored(&scored),
            Err(ScoringError::Validation(ValidationError::InconsistentScore { .. }))
        ));
    }

    #[test]
    fn validate_scored_catches_tampered_label() {
        let mut scored = score(&uniform(&DEPRESSION, "1"), &DEPRESSION).unwrap();
        scored.severity_label = "Minimal".into();
        assert!(validate_scored(&scored).is_err());
    }

    #[test]
    fn validate_scored_catches_tampered_weight() {
        let mut scored = score(&uniform(&DEPRESSION, "1"), &DEPRESSION).unwrap();
        scored.items[0].weight = 3;
        scored.total_score += 2;
        assert!(validate_scored(&scored).is_err());
    }
}
