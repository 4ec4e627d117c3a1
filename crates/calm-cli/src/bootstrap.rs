use std::path::Path;

use anyhow::Context;
use calm_config::CalmConfig;

/// Load `.env` (if present) and the layered configuration.
pub fn load_config() -> anyhow::Result<CalmConfig> {
    load_dotenv(Path::new(".env"))?;
    CalmConfig::load().context("failed to load calmnest configuration")
}

fn load_dotenv(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        dotenvy::from_path(path)
            .with_context(|| format!("failed to load dotenv file at {}", path.display()))?;
    }
    Ok(())
}
