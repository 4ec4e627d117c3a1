//! Shared fixtures for the session integration tests.

#![allow(dead_code)]

use calm_core::enums::{EmotionLabel, InstrumentId};
use calm_scoring::{Answer, AnswerSheet, EmotionSample, definition};
use calm_store::{LocalCache, MemoryStore, TieredStore};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

/// Every question of `id` answered with `value`.
pub fn sheet(id: InstrumentId, value: &str) -> AnswerSheet {
    AnswerSheet {
        instrument: id,
        answers: definition(id)
            .questions
            .iter()
            .map(|q| Answer::new(q.id, value))
            .collect(),
    }
}

/// All four wellness sub-scales answered with `value`.
pub fn wellness(value: &str) -> Vec<AnswerSheet> {
    InstrumentId::WELLNESS
        .iter()
        .map(|&id| sheet(id, value))
        .collect()
}

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn sample(secs: i64, label: EmotionLabel, p: f64) -> EmotionSample {
    EmotionSample {
        timestamp: ts(secs),
        probabilities: [(label, p)].into_iter().collect(),
    }
}

pub fn tiered(dir: &TempDir, primary: &MemoryStore) -> TieredStore<MemoryStore> {
    TieredStore::new(Some(primary.clone()), LocalCache::new(dir.path()))
}
