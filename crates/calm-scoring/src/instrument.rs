//! Static instrument definitions.
//!
//! An instrument is a fixed list of questions, a shared option set with
//! integer weights, and contiguous severity buckets covering every possible
//! total score.

use calm_core::enums::InstrumentId;

use crate::error::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    /// Reverse-scored items weigh `min + max - weight`.
    pub reverse: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOption {
    pub value: &'static str,
    pub label: &'static str,
    pub weight: u32,
}

/// Inclusive score range mapped to a severity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityBucket {
    pub min: u32,
    pub max: u32,
    pub label: &'static str,
}

impl SeverityBucket {
    #[must_use]
    pub const fn contains(&self, score: u32) -> bool {
        score >= self.min && score <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentDefinition {
    pub id: InstrumentId,
    pub title: &'static str,
    pub questions: &'static [Question],
    pub options: &'static [AnswerOption],
    /// Ordered from least to most of the measured quality.
    pub buckets: &'static [SeverityBucket],
}

impl InstrumentDefinition {
    fn min_weight(&self) -> u32 {
        self.options.iter().map(|o| o.weight).min().unwrap_or(0)
    }

    fn max_weight(&self) -> u32 {
        self.options.iter().map(|o| o.weight).max().unwrap_or(0)
    }

    fn question_count(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    /// Lowest achievable total.
    #[must_use]
    pub fn min_score(&self) -> u32 {
        self.question_count() * self.min_weight()
    }

    /// Highest achievable total.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.question_count() * self.max_weight()
    }

    #[must_use]
    pub fn question(&self, question_id: &str) -> Option<&'static Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    #[must_use]
    pub fn question_text(&self, question_id: &str) -> Option<&'static str> {
        self.question(question_id).map(|q| q.text)
    }

    /// Weight of `option_value` for `question`, honouring reverse scoring.
    /// `None` when the value is not one of the instrument's options.
    #[must_use]
    pub fn weight_for(&self, question: &Question, option_value: &str) -> Option<u32> {
        let option = self.options.iter().find(|o| o.value == option_value)?;
        if question.reverse {
            Some(self.min_weight() + self.max_weight() - option.weight)
        } else {
            Some(option.weight)
        }
    }

    #[must_use]
    pub fn bucket_for(&self, score: u32) -> Option<&'static SeverityBucket> {
        self.buckets.iter().find(|b| b.contains(score))
    }

    /// 1-based position of the bucket containing `score`.
    #[must_use]
    pub fn severity_ordinal(&self, score: u32) -> Option<u8> {
        self.buckets
            .iter()
            .position(|b| b.contains(score))
            .and_then(|i| u8::try_from(i + 1).ok())
    }

    /// Check that the buckets tile `[min_score, max_score]` with no gap or
    /// overlap.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Definition`] naming the first defect found.
    pub fn validate_buckets(&self) -> Result<(), ScoringError> {
        let fail = |reason: String| ScoringError::Definition {
            instrument: self.id,
            reason,
        };

        let (Some(first), Some(last)) = (self.buckets.first(), self.buckets.last()) else {
            return Err(fail("no severity buckets".into()));
        };
        if first.min != self.min_score() {
            return Err(fail(format!(
                "first bucket starts at {}, lowest score is {}",
                first.min,
                self.min_score()
            )));
        }
        if last.max != self.max_score() {
            return Err(fail(format!(
                "last bucket ends at {}, highest score is {}",
                last.max,
                self.max_score()
            )));
        }
        for bucket in self.buckets {
            if bucket.min > bucket.max {
                return Err(fail(format!("bucket '{}' is empty", bucket.label)));
            }
        }
        for pair in self.buckets.windows(2) {
            if pair[1].min != pair[0].max + 1 {
                return Err(fail(format!(
                    "buckets '{}' and '{}' are not contiguous",
                    pair[0].label, pair[1].label
                )));
            }
        }
        Ok(())
    }
}
