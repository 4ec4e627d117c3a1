//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_user_id() -> String {
    "anonymous".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// User id recorded on sessions started without one.
    #[serde(default = "default_user_id")]
    pub default_user_id: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_user_id: default_user_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(GeneralConfig::default().default_user_id, "anonymous");
    }
}
