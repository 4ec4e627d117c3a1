//! Templated narrative report.
//!
//! The text is a pure function of the inputs and the derived severity, risk,
//! and correlations. It carries no date, so regenerating it from the same
//! results yields identical bytes.

use calm_core::analysis::Correlation;
use calm_core::enums::{CorrelationTier, EmotionLabel, InstrumentId, OverallSeverity, RiskLevel};
use calm_core::results::{DistressIndices, EmotionSummary, ScoredAnswers};
use calm_scoring::definition;

use crate::inputs::Inputs;

/// Items at or above this weight are candidates for "areas of concern".
pub const CONCERN_WEIGHT: u32 = 2;

/// At most this many areas of concern are listed per questionnaire.
pub const MAX_CONCERNS: usize = 3;

const NOT_COMPLETED: &str = "Not completed.";

const DEPRESSION_INTERPRETATIONS: [&str; 5] = [
    "Minimal depression symptoms. Your mood appears to be within the normal range.",
    "Mild depression symptoms detected. Some low mood or loss of interest present but manageable.",
    "Moderate depression symptoms. These symptoms may be affecting your daily life and relationships.",
    "Moderately severe depression symptoms. Significant impact on daily functioning likely.",
    "Severe depression symptoms detected. Immediate professional support is strongly recommended.",
];

const ANXIETY_INTERPRETATIONS: [&str; 4] = [
    "Minimal anxiety symptoms. You appear to be managing stress well.",
    "Mild anxiety symptoms present. Some worry or tension but generally manageable.",
    "Moderate anxiety symptoms. Worry and tension may be interfering with daily activities.",
    "Severe anxiety symptoms detected. Significant distress and functional impairment likely.",
];

/// Tier for a distress index against a questionnaire score.
///
/// Strong when the index is above 40 and the score above 10, moderate when
/// either the index is above 30 or the score above 5, otherwise minimal.
#[must_use]
pub fn correlation_tier(distress_index: f64, score: u32) -> CorrelationTier {
    if distress_index > 40.0 && score > 10 {
        CorrelationTier::Strong
    } else if distress_index > 30.0 || score > 5 {
        CorrelationTier::Moderate
    } else {
        CorrelationTier::Minimal
    }
}

fn correlation_statement(questionnaire: InstrumentId, tier: CorrelationTier) -> String {
    let (short, screening) = match questionnaire {
        InstrumentId::Anxiety => ("GAD-7", "anxiety"),
        _ => ("PHQ-9", "depression"),
    };
    match tier {
        CorrelationTier::Strong => {
            format!("Strong correlation between facial analysis and {short} results.")
        }
        CorrelationTier::Moderate => {
            format!("Moderate correlation between mood analysis and {screening} screening.")
        }
        CorrelationTier::Minimal => {
            format!("Facial analysis and {short} results show minimal correlation.")
        }
    }
}

/// Correlations between the mood summary and each questionnaire present.
#[must_use]
pub fn correlations(inputs: &Inputs<'_>) -> Vec<Correlation> {
    let Some(mood) = inputs.mood else {
        return Vec::new();
    };
    let pairs = [
        (InstrumentId::Depression, inputs.depression, mood.distress.depression_like),
        (InstrumentId::Anxiety, inputs.anxiety, mood.distress.anxiety_like),
    ];
    pairs
        .into_iter()
        .filter_map(|(id, scored, index)| {
            let scored = scored?;
            let tier = correlation_tier(index, scored.total_score);
            Some(Correlation {
                questionnaire: id,
                tier,
                statement: correlation_statement(id, tier),
            })
        })
        .collect()
}

/// Question texts of the heaviest answered items, lowercased for inline use.
#[must_use]
pub fn areas_of_concern(scored: &ScoredAnswers) -> Vec<String> {
    let def = definition(scored.instrument);
    let mut heavy: Vec<(usize, u32, &str)> = scored
        .items
        .iter()
        .filter(|i| i.weight >= CONCERN_WEIGHT)
        .filter_map(|i| {
            let position = def.questions.iter().position(|q| q.id == i.question_id)?;
            Some((position, i.weight, def.questions[position].text))
        })
        .collect();
    heavy.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    heavy
        .into_iter()
        .take(MAX_CONCERNS)
        .map(|(_, _, text)| text.to_lowercase())
        .collect()
}

fn interpretation(table: &[&'static str], ordinal: Option<u8>) -> &'static str {
    ordinal
        .and_then(|o| table.get(usize::from(o).saturating_sub(1)))
        .copied()
        .unwrap_or("")
}

fn questionnaire_section(
    lines: &mut Vec<String>,
    heading: &str,
    concerns_heading: &str,
    scored: Option<&ScoredAnswers>,
    table: &[&'static str],
) {
    lines.push(String::new());
    lines.push(heading.to_string());
    let Some(scored) = scored else {
        lines.push(NOT_COMPLETED.to_string());
        return;
    };
    let def = definition(scored.instrument);
    lines.push(format!("Score: {}/{}", scored.total_score, def.max_score()));
    lines.push(format!("Severity Level: {}", scored.severity_label));
    lines.push(format!(
        "Interpretation: {}",
        interpretation(table, def.severity_ordinal(scored.total_score))
    ));
    let concerns = areas_of_concern(scored);
    if !concerns.is_empty() {
        lines.push(format!("{concerns_heading}: {}", concerns.join(", ")));
    }
}

fn capitalized(label: EmotionLabel) -> String {
    let s = label.as_str();
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn emotion_sentence(label: EmotionLabel) -> &'static str {
    match label {
        EmotionLabel::Happy => {
            "Positive emotional state detected. Facial expressions suggest good mood and emotional well-being."
        }
        EmotionLabel::Sad => {
            "Sadness detected in facial expressions. This aligns with potential depressive symptoms."
        }
        EmotionLabel::Fearful => {
            "Anxiety-related expressions detected. Facial analysis suggests heightened stress or worry."
        }
        EmotionLabel::Angry => {
            "Irritability or frustration detected. May indicate stress, depression, or anxiety manifestation."
        }
        EmotionLabel::Disgusted | EmotionLabel::Surprised | EmotionLabel::Neutral => {
            "Neutral emotional expression. Facial analysis suggests stable but possibly subdued emotional state."
        }
    }
}

fn mood_section(lines: &mut Vec<String>, mood: Option<&EmotionSummary>, correlations: &[Correlation]) {
    lines.push(String::new());
    lines.push("=== MOOD ANALYSIS (Facial Expression Sampling) ===".to_string());
    let Some(mood) = mood else {
        lines.push(NOT_COMPLETED.to_string());
        return;
    };
    let DistressIndices {
        depression_like,
        anxiety_like,
    } = mood.distress;
    lines.push(
        "Note: depression and anxiety indicators below are proxy values derived from facial \
         expressions. They are not clinical scores."
            .to_string(),
    );
    lines.push(format!("Dominant Emotion Detected: {}", capitalized(mood.dominant_label)));
    lines.push(format!(
        "Analysis Confidence: {:.1}%",
        mood.mean_confidence * 100.0
    ));
    lines.push(format!(
        "Samples Used: {} of {}",
        mood.counted_samples, mood.sample_count
    ));
    lines.push(format!("Depression Indicators: {depression_like:.1}%"));
    lines.push(format!("Anxiety Indicators: {anxiety_like:.1}%"));
    lines.push(format!(
        "Facial Expression Analysis: {}",
        emotion_sentence(mood.dominant_label)
    ));
    for c in correlations {
        lines.push(c.statement.clone());
    }
}

fn wellness_section(lines: &mut Vec<String>, inputs: &Inputs<'_>) {
    lines.push(String::new());
    lines.push("=== ADDITIONAL WELLNESS FACTORS ===".to_string());
    let Some(wellness) = inputs.wellness else {
        lines.push(NOT_COMPLETED.to_string());
        return;
    };
    for sub in &wellness.subscales {
        let heading = match sub.instrument {
            InstrumentId::Resilience => "Resilience Level",
            InstrumentId::Stress => "Perceived Stress",
            InstrumentId::SleepQuality => "Sleep Quality",
            InstrumentId::SocialSupport => "Social Support",
            InstrumentId::Depression | InstrumentId::Anxiety => continue,
        };
        lines.push(format!(
            "{heading}: {} (Score: {}/{})",
            sub.severity_label,
            sub.total_score,
            definition(sub.instrument).max_score()
        ));
    }
}

fn summary_paragraph(severity: OverallSeverity) -> &'static str {
    match severity {
        OverallSeverity::Minimal => {
            "Your assessment results indicate good overall mental health with minimal symptoms of \
             depression or anxiety. The various assessment tools show consistent results suggesting \
             emotional stability and effective coping mechanisms."
        }
        OverallSeverity::Mild => {
            "Your results suggest mild mental health symptoms that are manageable but worth \
             monitoring. You may be experiencing some stress or mood changes that could benefit from \
             self-care strategies and lifestyle adjustments."
        }
        OverallSeverity::Moderate => {
            "Your assessment indicates moderate mental health symptoms that may be impacting your \
             daily life. The combination of screening results suggests you could benefit from \
             professional support and structured coping strategies."
        }
        OverallSeverity::ModeratelySevere | OverallSeverity::Severe => {
            "Your results indicate significant mental health symptoms that require attention. \
             Multiple assessment tools show elevated scores suggesting that professional mental \
             health support would be beneficial for your wellbeing and recovery."
        }
    }
}

/// Render the full narrative.
#[must_use]
pub fn render(
    inputs: &Inputs<'_>,
    severity: OverallSeverity,
    risk: RiskLevel,
    correlations: &[Correlation],
) -> String {
    let mut lines = vec![
        "COMPREHENSIVE MENTAL HEALTH ASSESSMENT RESULTS".to_string(),
        String::new(),
        format!("Overall Severity: {}", severity.label()),
        format!("Risk Level: {}", risk.label()),
    ];

    questionnaire_section(
        &mut lines,
        "=== DEPRESSION ASSESSMENT (PHQ-9) ===",
        "Key Areas of Concern",
        inputs.depression,
        &DEPRESSION_INTERPRETATIONS,
    );
    questionnaire_section(
        &mut lines,
        "=== ANXIETY ASSESSMENT (GAD-7) ===",
        "Primary Anxiety Concerns",
        inputs.anxiety,
        &ANXIETY_INTERPRETATIONS,
    );
    mood_section(&mut lines, inputs.mood, correlations);
    wellness_section(&mut lines, inputs);

    lines.push(String::new());
    lines.push("=== COMPREHENSIVE ANALYSIS SUMMARY ===".to_string());
    lines.push(format!("Overall Mental Health Status: {}", severity.label()));
    lines.push(format!("Risk Assessment: {} Risk", risk.label()));
    lines.push(String::new());
    lines.push(summary_paragraph(severity).to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use calm_core::results::ScoredItem;
    use rstest::rstest;

    #[rstest]
    #[case(45.0, 11, CorrelationTier::Strong)]
    #[case(45.0, 10, CorrelationTier::Moderate)]
    #[case(31.0, 0, CorrelationTier::Moderate)]
    #[case(10.0, 6, CorrelationTier::Moderate)]
    #[case(30.0, 5, CorrelationTier::Minimal)]
    fn tiers(#[case] index: f64, #[case] score: u32, #[case] expected: CorrelationTier) {
        assert_eq!(correlation_tier(index, score), expected);
    }

    fn phq(weights: [u32; 9]) -> ScoredAnswers {
        ScoredAnswers {
            instrument: InstrumentId::Depression,
            items: weights
                .iter()
                .enumerate()
                .map(|(i, &w)| ScoredItem {
                    question_id: format!("phq9-{}", i + 1),
                    option_value: w.to_string(),
                    weight: w,
                })
                .collect(),
            total_score: weights.iter().sum(),
            severity_label: String::new(),
        }
    }

    #[test]
    fn concerns_heaviest_first_then_question_order() {
        let concerns = areas_of_concern(&phq([2, 0, 3, 2, 0, 0, 3, 1, 0]));
        assert_eq!(
            concerns,
            vec![
                "trouble falling or staying asleep, or sleeping too much".to_string(),
                "trouble concentrating on things, such as reading the newspaper or watching television"
                    .to_string(),
                "little interest or pleasure in doing things".to_string(),
            ]
        );
    }

    #[test]
    fn concerns_skip_light_items() {
        assert!(areas_of_concern(&phq([1; 9])).is_empty());
    }

    #[test]
    fn capitalizes_label() {
        assert_eq!(capitalized(EmotionLabel::Fearful), "Fearful");
    }

    #[test]
    fn missing_sections_say_not_completed() {
        let text = render(&Inputs::default(), OverallSeverity::Minimal, RiskLevel::Low, &[]);
        assert_eq!(text.matches(NOT_COMPLETED).count(), 4);
    }
}
