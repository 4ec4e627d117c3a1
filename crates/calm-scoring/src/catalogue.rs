//! The built-in instrument catalogue.

use calm_core::enums::InstrumentId;

use crate::instrument::{AnswerOption, InstrumentDefinition, Question, SeverityBucket};

const FREQUENCY_OPTIONS: &[AnswerOption] = &[
    AnswerOption { value: "0", label: "Not at all", weight: 0 },
    AnswerOption { value: "1", label: "Several days", weight: 1 },
    AnswerOption { value: "2", label: "More than half the days", weight: 2 },
    AnswerOption { value: "3", label: "Nearly every day", weight: 3 },
];

const AGREEMENT_OPTIONS: &[AnswerOption] = &[
    AnswerOption { value: "1", label: "Strongly Disagree", weight: 1 },
    AnswerOption { value: "2", label: "Disagree", weight: 2 },
    AnswerOption { value: "3", label: "Neutral", weight: 3 },
    AnswerOption { value: "4", label: "Agree", weight: 4 },
    AnswerOption { value: "5", label: "Strongly Agree", weight: 5 },
];

const OFTEN_OPTIONS: &[AnswerOption] = &[
    AnswerOption { value: "1", label: "Never", weight: 1 },
    AnswerOption { value: "2", label: "Almost Never", weight: 2 },
    AnswerOption { value: "3", label: "Sometimes", weight: 3 },
    AnswerOption { value: "4", label: "Fairly Often", weight: 4 },
    AnswerOption { value: "5", label: "Very Often", weight: 5 },
];

const SLEEP_OPTIONS: &[AnswerOption] = &[
    AnswerOption { value: "1", label: "Very Good", weight: 1 },
    AnswerOption { value: "2", label: "Fairly Good", weight: 2 },
    AnswerOption { value: "3", label: "Average", weight: 3 },
    AnswerOption { value: "4", label: "Fairly Bad", weight: 4 },
    AnswerOption { value: "5", label: "Very Bad", weight: 5 },
];

pub static DEPRESSION: InstrumentDefinition = InstrumentDefinition {
    id: InstrumentId::Depression,
    title: "Depression Assessment (PHQ-9)",
    questions: &[
        Question { id: "phq9-1", text: "Little interest or pleasure in doing things", reverse: false },
        Question { id: "phq9-2", text: "Feeling down, depressed, or hopeless", reverse: false },
        Question { id: "phq9-3", text: "Trouble falling or staying asleep, or sleeping too much", reverse: false },
        Question { id: "phq9-4", text: "Feeling tired or having little energy", reverse: false },
        Question { id: "phq9-5", text: "Poor appetite or overeating", reverse: false },
        Question {
            id: "phq9-6",
            text: "Feeling bad about yourself or that you are a failure or have let yourself or your family down",
            reverse: false,
        },
        Question {
            id: "phq9-7",
            text: "Trouble concentrating on things, such as reading the newspaper or watching television",
            reverse: false,
        },
        Question {
            id: "phq9-8",
            text: "Moving or speaking so slowly that other people could have noticed, or the opposite being so fidgety or restless that you have been moving around a lot more than usual",
            reverse: false,
        },
        Question {
            id: "phq9-9",
            text: "Thoughts that you would be better off dead, or of hurting yourself",
            reverse: false,
        },
    ],
    options: FREQUENCY_OPTIONS,
    buckets: &[
        SeverityBucket { min: 0, max: 4, label: "Minimal" },
        SeverityBucket { min: 5, max: 9, label: "Mild" },
        SeverityBucket { min: 10, max: 14, label: "Moderate" },
        SeverityBucket { min: 15, max: 19, label: "Moderately Severe" },
        SeverityBucket { min: 20, max: 27, label: "Severe" },
    ],
};

pub static ANXIETY: InstrumentDefinition = InstrumentDefinition {
    id: InstrumentId::Anxiety,
    title: "Anxiety Assessment (GAD-7)",
    questions: &[
        Question { id: "gad7-1", text: "Feeling nervous, anxious, or on edge", reverse: false },
        Question { id: "gad7-2", text: "Not being able to stop or control worrying", reverse: false },
        Question { id: "gad7-3", text: "Worrying too much about different things", reverse: false },
        Question { id: "gad7-4", text: "Trouble relaxing", reverse: false },
        Question { id: "gad7-5", text: "Being so restless that it is hard to sit still", reverse: false },
        Question { id: "gad7-6", text: "Becoming easily annoyed or irritable", reverse: false },
        Question { id: "gad7-7", text: "Feeling afraid, as if something awful might happen", reverse: false },
    ],
    options: FREQUENCY_OPTIONS,
    // No "Moderately Severe" rung.
    buckets: &[
        SeverityBucket { min: 0, max: 4, label: "Minimal" },
        SeverityBucket { min: 5, max: 9, label: "Mild" },
        SeverityBucket { min: 10, max: 14, label: "Moderate" },
        SeverityBucket { min: 15, max: 21, label: "Severe" },
    ],
};

pub static RESILIENCE: InstrumentDefinition = InstrumentDefinition {
    id: InstrumentId::Resilience,
    title: "Resilience",
    questions: &[
        Question { id: "brs-1", text: "I tend to bounce back quickly after hard times", reverse: false },
        Question { id: "brs-2", text: "I have a hard time making it through stressful events", reverse: true },
        Question { id: "brs-3", text: "It does not take me long to recover from a stressful event", reverse: false },
        Question { id: "brs-4", text: "It is hard for me to snap back when something bad happens", reverse: true },
        Question { id: "brs-5", text: "I usually come through difficult times with little trouble", reverse: false },
        Question { id: "brs-6", text: "I tend to take a long time to get over set-backs in my life", reverse: true },
    ],
    options: AGREEMENT_OPTIONS,
    buckets: &[
        SeverityBucket { min: 6, max: 19, label: "Low" },
        SeverityBucket { min: 20, max: 24, label: "Moderate" },
        SeverityBucket { min: 25, max: 30, label: "High" },
    ],
};

pub static STRESS: InstrumentDefinition = InstrumentDefinition {
    id: InstrumentId::Stress,
    title: "Perceived Stress",
    questions: &[
        Question {
            id: "pss-1",
            text: "In the last month, how often have you felt that you were unable to control the important things in your life?",
            reverse: false,
        },
        Question {
            id: "pss-2",
            text: "In the last month, how often have you felt confident about your ability to handle your personal problems?",
            reverse: true,
        },
        Question {
            id: "pss-3",
            text: "In the last month, how often have you felt that things were going your way?",
            reverse: true,
        },
        Question {
            id: "pss-4",
            text: "In the last month, how often have you felt difficulties were piling up so high that you could not overcome them?",
            reverse: false,
        },
    ],
    options: OFTEN_OPTIONS,
    buckets: &[
        SeverityBucket { min: 4, max: 10, label: "Low" },
        SeverityBucket { min: 11, max: 16, label: "Moderate" },
        SeverityBucket { min: 17, max: 20, label: "High" },
    ],
};

pub static SLEEP_QUALITY: InstrumentDefinition = InstrumentDefinition {
    id: InstrumentId::SleepQuality,
    title: "Sleep Quality",
    questions: &[
        Question {
            id: "sleep-1",
            text: "During the past month, how would you rate your sleep quality overall?",
            reverse: false,
        },
        Question {
            id: "sleep-2",
            text: "During the past month, how often have you had trouble sleeping because you cannot get to sleep within 30 minutes?",
            reverse: false,
        },
        Question {
            id: "sleep-3",
            text: "During the past month, how often have you had trouble sleeping because you wake up in the middle of the night or early morning?",
            reverse: false,
        },
    ],
    options: SLEEP_OPTIONS,
    buckets: &[
        SeverityBucket { min: 3, max: 6, label: "Good" },
        SeverityBucket { min: 7, max: 10, label: "Fair" },
        SeverityBucket { min: 11, max: 15, label: "Poor" },
    ],
};

pub static SOCIAL_SUPPORT: InstrumentDefinition = InstrumentDefinition {
    id: InstrumentId::SocialSupport,
    title: "Social Support",
    questions: &[
        Question { id: "social-1", text: "There is a special person who is around when I am in need", reverse: false },
        Question { id: "social-2", text: "I have a special person who is a real source of comfort to me", reverse: false },
        Question { id: "social-3", text: "My friends really try to help me", reverse: false },
    ],
    options: AGREEMENT_OPTIONS,
    buckets: &[
        SeverityBucket { min: 3, max: 7, label: "Limited" },
        SeverityBucket { min: 8, max: 11, label: "Moderate" },
        SeverityBucket { min: 12, max: 15, label: "Strong" },
    ],
};

/// Every built-in instrument.
pub static CATALOGUE: [&InstrumentDefinition; 6] = [
    &DEPRESSION,
    &ANXIETY,
    &RESILIENCE,
    &STRESS,
    &SLEEP_QUALITY,
    &SOCIAL_SUPPORT,
];

/// Look up the definition for an instrument.
#[must_use]
pub fn definition(id: InstrumentId) -> &'static InstrumentDefinition {
    match id {
        InstrumentId::Depression => &DEPRESSION,
        InstrumentId::Anxiety => &ANXIETY,
        InstrumentId::Resilience => &RESILIENCE,
        InstrumentId::Stress => &STRESS,
        InstrumentId::SleepQuality => &SLEEP_QUALITY,
        InstrumentId::SocialSupport => &SOCIAL_SUPPORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_instrument_has_exhaustive_buckets() {
        for def in CATALOGUE {
            def.validate_buckets()
                .unwrap_or_else(|e| panic!("{}: {e}", def.id));
        }
    }

    #[test]
    fn every_score_falls_in_exactly_one_bucket() {
        for def in CATALOGUE {
            for score in def.min_score()..=def.max_score() {
                let hits = def.buckets.iter().filter(|b| b.contains(score)).count();
                assert_eq!(hits, 1, "{} score {score} matched {hits} buckets", def.id);
            }
        }
    }

    #[test]
    fn lookup_matches_id() {
        for def in CATALOGUE {
            assert_eq!(definition(def.id).id, def.id);
        }
    }

    #[test]
    fn score_spans() {
        assert_eq!((DEPRESSION.min_score(), DEPRESSION.max_score()), (0, 27));
        assert_eq!((ANXIETY.min_score(), ANXIETY.max_score()), (0, 21));
        assert_eq!((RESILIENCE.min_score(), RESILIENCE.max_score()), (6, 30));
        assert_eq!((STRESS.min_score(), STRESS.max_score()), (4, 20));
        assert_eq!((SLEEP_QUALITY.min_score(), SLEEP_QUALITY.max_score()), (3, 15));
        assert_eq!((SOCIAL_SUPPORT.min_score(), SOCIAL_SUPPORT.max_score()), (3, 15));
    }

    #[test]
    fn question_ids_are_unique_per_instrument() {
        for def in CATALOGUE {
            let mut ids: Vec<_> = def.questions.iter().map(|q| q.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), def.questions.len(), "{}", def.id);
        }
    }
}
