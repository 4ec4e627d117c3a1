//! Recommendation templates, selected by severity and risk buckets.

use calm_core::enums::{EmotionLabel, InstrumentId, OverallSeverity, RiskLevel};

use crate::inputs::Inputs;
use crate::severity::ordinal_of;

/// Questionnaire bucket ordinal (Moderate) from which instrument add-ons apply.
const ADD_ON_ORDINAL: u8 = 3;

pub const CRISIS_LINE: &str = "If you are having thoughts of harming yourself, contact a crisis line or local emergency services now";

fn base(severity: OverallSeverity) -> [&'static str; 3] {
    match severity {
        OverallSeverity::Minimal => [
            "Continue current wellness practices",
            "Maintain regular exercise and sleep schedule",
            "Practice preventive mental health strategies",
        ],
        OverallSeverity::Mild => [
            "Implement daily stress management techniques",
            "Consider mindfulness or meditation practice",
            "Monitor symptoms weekly",
        ],
        OverallSeverity::Moderate => [
            "Consider professional counseling or therapy",
            "Implement structured self-care routine",
            "Reach out to trusted friends or family for support",
        ],
        OverallSeverity::ModeratelySevere | OverallSeverity::Severe => [
            "Seek professional mental health support promptly",
            "Consider medication evaluation with healthcare provider",
            "Establish crisis support plan",
        ],
    }
}

/// Ordered, de-duplicated recommendations.
#[must_use]
pub fn recommend(inputs: &Inputs<'_>, severity: OverallSeverity, risk: RiskLevel) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |items: &[&str]| {
        for item in items {
            if !out.iter().any(|existing| existing == item) {
                out.push((*item).to_string());
            }
        }
    };

    push(&base(severity));

    if ordinal_of(inputs, InstrumentId::Depression).is_some_and(|o| o >= ADD_ON_ORDINAL) {
        push(&[
            "Focus on depression-specific coping strategies",
            "Engage in behavioral activation techniques",
        ]);
    }
    if ordinal_of(inputs, InstrumentId::Anxiety).is_some_and(|o| o >= ADD_ON_ORDINAL) {
        push(&[
            "Practice anxiety management techniques",
            "Learn grounding and breathing exercises",
        ]);
    }
    if inputs
        .mood
        .is_some_and(|m| m.dominant_label == EmotionLabel::Sad)
    {
        push(&[
            "Engage in mood-lifting activities",
            "Increase social connections and support",
        ]);
    }
    if inputs.wellness_label(InstrumentId::SleepQuality) == Some("Poor") {
        push(&[
            "Improve sleep hygiene practices",
            "Consider sleep disorder evaluation",
        ]);
    }
    if inputs.wellness_label(InstrumentId::Stress) == Some("High") {
        push(&[
            "Implement stress reduction techniques",
            "Identify and address stress triggers",
        ]);
    }
    if inputs.wellness_label(InstrumentId::SocialSupport) == Some("Limited") {
        push(&[
            "Build stronger social connections",
            "Consider joining support groups or communities",
            "Reach out to trusted friends or family for support",
        ]);
    }
    if risk == RiskLevel::High {
        push(&[CRISIS_LINE]);
    }

    out
}
