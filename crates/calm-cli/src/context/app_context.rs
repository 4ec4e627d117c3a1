use calm_config::CalmConfig;
use calm_session::{AssessmentEngine, ResumeSource};
use calm_store::{RemoteStore, TieredStore};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: CalmConfig,
}

impl AppContext {
    pub fn init(config: CalmConfig) -> Self {
        if config.remote.is_configured() {
            tracing::debug!(base_url = config.remote.trimmed_base_url(), "remote store enabled");
        } else {
            tracing::debug!(
                cache = %config.cache.resolved_dir().display(),
                "no remote store configured; using the local cache only"
            );
        }
        Self { config }
    }

    /// A fresh two-tier store for one engine.
    pub fn store(&self) -> TieredStore<RemoteStore> {
        TieredStore::from_config(&self.config)
    }

    pub fn default_user(&self) -> &str {
        &self.config.general.default_user_id
    }

    /// Resume `session_id` from the store.
    pub async fn open(
        &self,
        session_id: &str,
    ) -> anyhow::Result<(AssessmentEngine<RemoteStore>, ResumeSource)> {
        Ok(AssessmentEngine::resume(self.store(), session_id, self.default_user()).await?)
    }
}
