//! Record envelope shared by every store tier.

use std::fmt;

use calm_core::enums::Step;
use calm_core::ids::validate_session_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::StoreError;

/// Current record format version.
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "step", rename_all = "snake_case")]
pub enum RecordKind {
    /// The whole session envelope.
    Envelope,
    /// A single step's result.
    StepResult(Step),
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope => f.write_str("envelope"),
            Self::StepResult(step) => write!(f, "step_result/{step}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub session_id: String,
    pub kind: RecordKind,
}

impl RecordKey {
    pub fn envelope(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            kind: RecordKind::Envelope,
        }
    }

    pub fn step(session_id: impl Into<String>, step: Step) -> Self {
        Self {
            session_id: session_id.into(),
            kind: RecordKind::StepResult(step),
        }
    }

    /// Reject ids that are unsafe as file names or URL segments.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`].
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_session_id(&self.session_id).map_err(|e| StoreError::InvalidKey(e.to_string()))
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.session_id, self.kind)
    }
}

/// One persisted value. The store never interprets `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub v: u32,
    pub key: RecordKey,
    pub written_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl StoredRecord {
    #[must_use]
    pub const fn new(key: RecordKey, written_at: DateTime<Utc>, payload: serde_json::Value) -> Self {
        Self {
            v: RECORD_VERSION,
            key,
            written_at,
            payload,
        }
    }

    /// Serialize `value` into a record stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if `value` cannot be serialized.
    pub fn from_value<T: Serialize>(key: RecordKey, value: &T) -> Result<Self, StoreError> {
        Ok(Self::new(key, Utc::now(), serde_json::to_value(value)?))
    }

    /// Deserialize the payload.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(T::deserialize(&self.payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_adjacently_tagged() {
        let key = RecordKey::step("asm-1", Step::MoodSampling);
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["kind"]["type"], "step_result");
        assert_eq!(json["kind"]["step"], "mood_sampling");

        let json = serde_json::to_value(RecordKey::envelope("asm-1")).unwrap();
        assert_eq!(json["kind"]["type"], "envelope");
    }

    #[test]
    fn display_names_key() {
        assert_eq!(RecordKey::step("asm-1", Step::Anxiety).to_string(), "asm-1/step_result/anxiety");
        assert_eq!(RecordKey::envelope("asm-1").to_string(), "asm-1/envelope");
    }

    #[test]
    fn path_like_ids_are_invalid() {
        assert!(RecordKey::envelope("../x").validate().is_err());
        assert!(RecordKey::envelope("asm-1").validate().is_ok());
    }

    #[test]
    fn payload_decodes() {
        let record = StoredRecord::from_value(RecordKey::envelope("asm-1"), &vec![1, 2, 3]).unwrap();
        assert_eq!(record.v, RECORD_VERSION);
        let back: Vec<u32> = record.decode().unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
