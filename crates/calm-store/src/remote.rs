//! HTTP client for the remote assessment backend.
//!
//! ```text
//! PUT /assessment/{session_id}          envelope record
//! PUT /assessment/{session_id}/{step}   step result record
//! GET /assessment/{session_id}          latest envelope record, 404 if none
//! GET /assessment/{session_id}/{step}   latest step result record, 404 if none
//! ```

use calm_config::RemoteConfig;
use reqwest::StatusCode;
use tracing::debug;

use crate::RecordStore;
use crate::error::StoreError;
use crate::http::check_response;
use crate::record::{RecordKey, RecordKind, StoredRecord};

#[derive(Debug, Clone)]
pub struct RemoteStore {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteStore {
    /// Create a client for `base_url`.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .expect("reqwest client should build"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the `[remote]` config section.
    ///
    /// # Panics
    ///
    /// Same as [`Self::new`].
    #[must_use]
    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(
            config.trimmed_base_url(),
            config.timeout_secs,
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, key: &RecordKey) -> Result<String, StoreError> {
        key.validate()?;
        let session = urlencoding::encode(&key.session_id);
        Ok(match key.kind {
            RecordKind::Envelope => format!("{}/assessment/{session}", self.base_url),
            RecordKind::StepResult(step) => {
                format!("{}/assessment/{session}/{}", self.base_url, step.as_str())
            }
        })
    }
}

impl RecordStore for RemoteStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn put(&self, record: &StoredRecord) -> Result<(), StoreError> {
        let url = self.url(&record.key)?;
        let resp = self.http.put(&url).json(record).send().await?;
        check_response(resp).await?;
        debug!(key = %record.key, "stored record remotely");
        Ok(())
    }

    async fn get(&self, key: &RecordKey) -> Result<Option<StoredRecord>, StoreError> {
        let url = self.url(key)?;
        let resp = self.http.get(&url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record: StoredRecord = check_response(resp).await?.json().await?;
        if record.key != *key {
            return Err(StoreError::Api {
                status: 200,
                message: format!("backend returned {} for {key}", record.key),
            });
        }
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use calm_core::enums::Step;

    use super::*;

    #[test]
    fn urls_follow_backend_layout() {
        let store = RemoteStore::new("http://localhost:9000/", 5, "calm-test");
        assert_eq!(store.base_url(), "http://localhost:9000");
        assert_eq!(
            store.url(&RecordKey::envelope("asm-1")).unwrap(),
            "http://localhost:9000/assessment/asm-1"
        );
        assert_eq!(
            store
                .url(&RecordKey::step("asm-1", Step::WellnessSurvey))
                .unwrap(),
            "http://localhost:9000/assessment/asm-1/wellness_survey"
        );
    }

    #[test]
    fn invalid_id_never_reaches_the_network() {
        let store = RemoteStore::new("http://localhost:9000", 5, "calm-test");
        assert!(matches!(
            store.url(&RecordKey::envelope("a/b")),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
