use std::path::Path;

use calm_config::CalmConfig;

/// Config sections that figment reads from `CALMNEST_<SECTION>__<KEY>`.
const SECTIONS: [&str; 3] = ["REMOTE", "CACHE", "GENERAL"];

/// Log settings that load fine but will not do what the user meant.
pub fn warn_misconfigured(config: &CalmConfig) {
    let keys = std::env::vars().map(|(key, _)| key).collect::<Vec<_>>();
    for warning in collect_warnings(config, &keys) {
        tracing::warn!("{warning}");
    }
}

fn collect_warnings(config: &CalmConfig, env_keys: &[String]) -> Vec<String> {
    let mut warnings = single_underscore_keys(env_keys)
        .into_iter()
        .map(|(key, section)| {
            format!(
                "{key} is ignored; section keys need a double underscore (example: CALMNEST_{section}__{})",
                key.trim_start_matches(&format!("CALMNEST_{section}_"))
            )
        })
        .collect::<Vec<_>>();

    let cache_dir = config.cache.resolved_dir();
    warnings.extend(cache_dir_warning(&cache_dir));
    warnings
}

/// Keys like `CALMNEST_REMOTE_BASE_URL` that figment maps to a top-level
/// `remote_base_url` instead of `remote.base_url`.
fn single_underscore_keys(env_keys: &[String]) -> Vec<(&str, &'static str)> {
    env_keys
        .iter()
        .filter_map(|key| {
            let rest = key.strip_prefix("CALMNEST_")?;
            SECTIONS.iter().find_map(|&section| {
                let after = rest.strip_prefix(section)?;
                (after.starts_with('_') && !after.starts_with("__") && after.len() > 1)
                    .then_some((key.as_str(), section))
            })
        })
        .collect()
}

fn cache_dir_warning(dir: &Path) -> Option<String> {
    if dir.exists() && !dir.is_dir() {
        return Some(format!(
            "Cache dir {} exists but is not a directory; sessions will not survive a remote outage",
            dir.display()
        ));
    }
    if dir.is_relative() {
        return Some(format!(
            "Cache dir {} is relative; sessions can only be resumed from this working directory",
            dir.display()
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use calm_config::{CacheConfig, CalmConfig};
    use pretty_assertions::assert_eq;
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    fn keys(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn with_cache(dir: &Path) -> CalmConfig {
        CalmConfig {
            cache: CacheConfig {
                dir: dir.display().to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn single_underscore_section_keys_are_reported() {
        let raw = keys(&[
            "CALMNEST_REMOTE_BASE_URL",
            "CALMNEST_CACHE_DIR",
            "CALMNEST_REMOTE__TIMEOUT_SECS",
            "CALMNEST_LOG",
        ]);
        let found = single_underscore_keys(&raw);
        assert_eq!(
            found,
            vec![
                ("CALMNEST_REMOTE_BASE_URL", "REMOTE"),
                ("CALMNEST_CACHE_DIR", "CACHE"),
            ]
        );
    }

    #[test]
    fn warning_suggests_the_double_underscore_key() {
        let dir = TempDir::new().unwrap();
        let warnings = collect_warnings(&with_cache(dir.path()), &keys(&["CALMNEST_GENERAL_DEFAULT_USER_ID"]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("CALMNEST_GENERAL__DEFAULT_USER_ID"));
    }

    #[test]
    fn cache_path_that_is_a_file_is_reported() {
        let file = NamedTempFile::new().unwrap();
        let warnings = collect_warnings(&with_cache(file.path()), &[]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not a directory"));
    }

    #[test]
    fn relative_cache_dir_is_reported() {
        assert!(cache_dir_warning(Path::new("calm-cache-that-does-not-exist")).is_some());
    }

    #[test]
    fn absolute_cache_dir_and_double_underscore_keys_are_quiet() {
        let dir = TempDir::new().unwrap();
        let warnings = collect_warnings(
            &with_cache(dir.path()),
            &keys(&["CALMNEST_REMOTE__BASE_URL", "CALMNEST_CACHE__DIR", "CALMNEST_LOG"]),
        );
        assert!(warnings.is_empty());
    }
}
