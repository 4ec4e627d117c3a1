//! # calm-config
//!
//! Layered configuration loading for the assessment engine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CALMNEST_*` prefix, `__` as separator)
//! 2. Project-level `.calmnest/config.toml`
//! 3. User-level `~/.config/calmnest/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CALMNEST_REMOTE__BASE_URL` -> `remote.base_url`,
//! `CALMNEST_CACHE__DIR` -> `cache.dir`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use calm_config::CalmConfig;
//!
//! let config = CalmConfig::load_with_dotenv().expect("config");
//!
//! if config.remote.is_configured() {
//!     println!("Backend: {}", config.remote.base_url);
//! }
//! ```

mod cache;
mod error;
mod general;
mod remote;

pub use cache::CacheConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use remote::RemoteConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CALMNEST_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CalmConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl CalmConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`. Use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".calmnest/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a non-empty `remote.base_url`
    /// that is not `http(s)://`, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.remote.base_url.trim().is_empty() && !self.remote.is_configured() {
            return Err(ConfigError::InvalidValue {
                field: "remote.base_url".into(),
                reason: format!("expected an http(s):// URL, got '{}'", self.remote.base_url),
            });
        }
        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("calmnest").join("config.toml"))
    }
}
