//! Local fallback cache configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Directory holding one JSONL file per session. Empty uses the
    /// platform data directory.
    #[serde(default)]
    pub dir: String,
}

impl CacheConfig {
    /// The effective cache directory.
    ///
    /// An explicit `dir` wins, then `{data_local_dir}/calmnest/cache`, then
    /// `.calmnest/cache` relative to the working directory.
    #[must_use]
    pub fn resolved_dir(&self) -> PathBuf {
        if !self.dir.trim().is_empty() {
            return PathBuf::from(self.dir.trim());
        }
        dirs::data_local_dir().map_or_else(
            || PathBuf::from(".calmnest").join("cache"),
            |p| p.join("calmnest").join("cache"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let config = CacheConfig {
            dir: "/tmp/calm-cache".into(),
        };
        assert_eq!(config.resolved_dir(), PathBuf::from("/tmp/calm-cache"));
    }

    #[test]
    fn default_dir_ends_in_calmnest_cache() {
        let dir = CacheConfig::default().resolved_dir();
        assert!(dir.ends_with("calmnest/cache") || dir.ends_with(".calmnest/cache"));
    }
}
