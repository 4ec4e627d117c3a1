//! Emotion sample aggregation.
//!
//! The external classifier produces one label→probability map per frame.
//! The UI pushes those into a [`SampleBuffer`] while the mood-sampling step
//! runs and calls [`SampleBuffer::finish`] once when it ends.
//!
//! Distress indices are proxies derived from facial expression, not
//! diagnostic scores.

use std::collections::BTreeMap;

use calm_core::enums::EmotionLabel;
use calm_core::results::{DistressIndices, EmotionSummary};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ScoringError, ValidationError};

/// A sample votes only if its top probability is strictly above this.
pub const CONFIDENCE_FLOOR: f64 = 0.3;

/// One classifier frame.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmotionSample {
    pub timestamp: DateTime<Utc>,
    pub probabilities: BTreeMap<EmotionLabel, f64>,
}

impl EmotionSample {
    /// Highest-probability label and its probability. Ties go to the label
    /// that comes first in [`EmotionLabel`] order.
    #[must_use]
    pub fn top(&self) -> Option<(EmotionLabel, f64)> {
        let mut best: Option<(EmotionLabel, f64)> = None;
        for (&label, &p) in &self.probabilities {
            if best.is_none_or(|(_, b)| p > b) {
                best = Some((label, p));
            }
        }
        best
    }

    #[must_use]
    pub fn probability(&self, label: EmotionLabel) -> f64 {
        self.probabilities.get(&label).copied().unwrap_or(0.0)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (&label, &p) in &self.probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ValidationError::InvalidProbability {
                    label,
                    value: p.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct Tally {
    votes: BTreeMap<EmotionLabel, u32>,
    first_seen: BTreeMap<EmotionLabel, usize>,
    counted: u32,
    confidence_sum: f64,
    sad_sum: f64,
    fearful_sum: f64,
}

/// Reduce samples to an [`EmotionSummary`].
///
/// Samples are visited in timestamp order (arrival order breaks equal
/// timestamps), so the result does not depend on the order they were pushed.
/// The dominant label has the most votes; equal counts go to the label whose
/// first vote came earliest. Confidence and distress indices average over
/// counted samples only.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidProbability`] for a probability outside
/// `[0, 1]` and [`ScoringError::InsufficientData`] when no sample clears
/// [`CONFIDENCE_FLOOR`].
pub fn aggregate(samples: &[EmotionSample]) -> Result<EmotionSummary, ScoringError> {
    for sample in samples {
        sample.validate()?;
    }

    let mut order: Vec<usize> = (0..samples.len()).collect();
    order.sort_by_key(|&i| (samples[i].timestamp, i));

    let mut tally = Tally::default();
    for (position, &i) in order.iter().enumerate() {
        let sample = &samples[i];
        let Some((label, confidence)) = sample.top() else {
            continue;
        };
        if confidence <= CONFIDENCE_FLOOR {
            continue;
        }
        *tally.votes.entry(label).or_insert(0) += 1;
        tally.first_seen.entry(label).or_insert(position);
        tally.counted += 1;
        tally.confidence_sum += confidence;
        tally.sad_sum += sample.probability(EmotionLabel::Sad);
        tally.fearful_sum += sample.probability(EmotionLabel::Fearful);
    }

    let dominant = tally
        .votes
        .iter()
        .max_by(|(a_label, a_votes), (b_label, b_votes)| {
            a_votes
                .cmp(b_votes)
                .then_with(|| tally.first_seen[*b_label].cmp(&tally.first_seen[*a_label]))
        })
        .map(|(&label, _)| label);

    let Some(dominant_label) = dominant else {
        debug!(samples = samples.len(), "no emotion sample above confidence floor");
        return Err(ScoringError::InsufficientData {
            samples: samples.len(),
            floor: CONFIDENCE_FLOOR,
        });
    };

    let counted = f64::from(tally.counted);
    let summary = EmotionSummary {
        sample_count: u32::try_from(samples.len()).unwrap_or(u32::MAX),
        counted_samples: tally.counted,
        dominant_label,
        mean_confidence: tally.confidence_sum / counted,
        distress: DistressIndices {
            depression_like: 100.0 * tally.sad_sum / counted,
            anxiety_like: 100.0 * tally.fearful_sum / counted,
        },
        distribution: tally.votes,
    };
    debug!(
        samples = summary.sample_count,
        counted = summary.counted_samples,
        dominant = %summary.dominant_label,
        "aggregated emotion samples"
    );
    Ok(summary)
}

/// Check the internal consistency of a summary produced elsewhere.
///
/// # Errors
///
/// Returns [`ValidationError::InconsistentSummary`] describing the first
/// violated constraint.
pub fn validate_summary(summary: &EmotionSummary) -> Result<(), ScoringError> {
    let fail = |reason: &str| -> ScoringError {
        ValidationError::InconsistentSummary(reason.to_string()).into()
    };

    if summary.sample_count == 0 {
        return Err(fail("sample_count must be at least 1"));
    }
    if summary.counted_samples == 0 || summary.counted_samples > summary.sample_count {
        return Err(fail("counted_samples must be between 1 and sample_count"));
    }
    if !(0.0..=1.0).contains(&summary.mean_confidence) {
        return Err(fail("mean_confidence must be within [0, 1]"));
    }
    for index in [summary.distress.depression_like, summary.distress.anxiety_like] {
        if !(0.0..=100.0).contains(&index) {
            return Err(fail("distress indices must be within [0, 100]"));
        }
    }
    let total: u32 = summary.distribution.values().sum();
    if total != summary.counted_samples {
        return Err(fail("distribution does not add up to counted_samples"));
    }
    let top = summary.distribution.values().copied().max().unwrap_or(0);
    if summary.distribution.get(&summary.dominant_label).copied() != Some(top) {
        return Err(fail("dominant_label does not have the most votes"));
    }
    Ok(())
}

/// Input buffer for a mood-sampling window.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<EmotionSample>,
}

impl SampleBuffer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: EmotionSample) {
        self.samples.push(sample);
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[EmotionSample] {
        &self.samples
    }

    /// Drain the buffer and aggregate it. The buffer is empty afterwards
    /// whether or not aggregation succeeds.
    ///
    /// # Errors
    ///
    /// Same as [`aggregate`].
    pub fn finish(&mut self) -> Result<EmotionSummary, ScoringError> {
        let samples = std::mem::take(&mut self.samples);
        aggregate(&samples)
    }
}
