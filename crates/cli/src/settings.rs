use anyhow::{anyhow, Context, Result};
use code_insight_analyzer::AnalyzerConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the project root when `--config` is absent
pub const CONFIG_FILE: &str = "code-insight.toml";

pub const ROOT_ENV: &str = "CODE_INSIGHT_ROOT";
pub const CONTEXT_WINDOW_ENV: &str = "CODE_INSIGHT_CONTEXT_WINDOW";
pub const CACHE_CAPACITY_ENV: &str = "CODE_INSIGHT_CACHE_CAPACITY";

/// On-disk settings; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    project_root: Option<PathBuf>,
    context_window: Option<usize>,
    preview_lines: Option<usize>,
    max_file_size_bytes: Option<u64>,
    long_block_threshold: Option<usize>,
    short_name_threshold: Option<usize>,
    cache_capacity: Option<usize>,
}

impl RawSettings {
    fn merge(self, defaults: AnalyzerConfig) -> AnalyzerConfig {
        AnalyzerConfig {
            project_root: self.project_root.unwrap_or(defaults.project_root),
            context_window: self.context_window.unwrap_or(defaults.context_window),
            preview_lines: self.preview_lines.unwrap_or(defaults.preview_lines),
            max_file_size_bytes: self
                .max_file_size_bytes
                .unwrap_or(defaults.max_file_size_bytes),
            long_block_threshold: self
                .long_block_threshold
                .unwrap_or(defaults.long_block_threshold),
            short_name_threshold: self
                .short_name_threshold
                .unwrap_or(defaults.short_name_threshold),
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
        }
    }
}

/// Build the analyzer configuration: defaults, then the TOML file, then
/// environment variables, then command-line flags
pub fn load(root_flag: Option<&Path>, config_flag: Option<&Path>) -> Result<AnalyzerConfig> {
    resolve(root_flag, config_flag, |key| env::var(key).ok())
}

fn resolve(
    root_flag: Option<&Path>,
    config_flag: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AnalyzerConfig> {
    let search_root = root_flag
        .map(Path::to_path_buf)
        .or_else(|| lookup(ROOT_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let raw = match config_flag {
        Some(path) => read_settings(path)?,
        None => {
            let candidate = search_root.join(CONFIG_FILE);
            if candidate.is_file() {
                read_settings(&candidate)?
            } else {
                RawSettings::default()
            }
        }
    };

    let mut config = raw.merge(AnalyzerConfig::default());
    apply_env(&mut config, &lookup)?;
    if let Some(root) = root_flag {
        config.project_root = root.to_path_buf();
    }

    config.validate()?;
    log::debug!("Effective configuration: {config:?}");
    Ok(config)
}

fn read_settings(path: &Path) -> Result<RawSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    log::debug!("Loaded settings from {}", path.display());
    toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

fn apply_env(config: &mut AnalyzerConfig, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(root) = lookup(ROOT_ENV) {
        config.project_root = PathBuf::from(root);
    }
    if let Some(window) = lookup(CONTEXT_WINDOW_ENV) {
        config.context_window = parse_count(CONTEXT_WINDOW_ENV, &window)?;
    }
    if let Some(capacity) = lookup(CACHE_CAPACITY_ENV) {
        config.cache_capacity = parse_count(CACHE_CAPACITY_ENV, &capacity)?;
    }
    Ok(())
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|err| anyhow!("{key} must be a non-negative integer, got '{value}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let temp = tempdir().unwrap();
        let config = resolve(Some(temp.path()), None, env_of(&[])).unwrap();
        assert_eq!(config.project_root, temp.path());
        assert_eq!(config.context_window, 20);
        assert_eq!(config.cache_capacity, 32);
    }

    #[test]
    fn file_then_env_then_flag() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "context_window = 30\ncache_capacity = 8\nlong_block_threshold = 80\n",
        )
        .unwrap();

        let config = resolve(
            Some(temp.path()),
            None,
            env_of(&[(CONTEXT_WINDOW_ENV, "40"), (ROOT_ENV, "/elsewhere")]),
        )
        .unwrap();

        assert_eq!(config.context_window, 40);
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.long_block_threshold, 80);
        assert_eq!(config.project_root, temp.path());
    }

    #[test]
    fn env_root_locates_config_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "preview_lines = 4\n").unwrap();
        let root = temp.path().to_string_lossy().to_string();

        let config = resolve(None, None, env_of(&[(ROOT_ENV, root.as_str())])).unwrap();
        assert_eq!(config.preview_lines, 4);
        assert_eq!(config.project_root, temp.path());
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("custom.toml");
        fs::write(&file, "context_widow = 10\n").unwrap();
        assert!(resolve(Some(temp.path()), Some(&file), env_of(&[])).is_err());

        assert!(resolve(
            Some(temp.path()),
            None,
            env_of(&[(CACHE_CAPACITY_ENV, "many")])
        )
        .is_err());

        let err = resolve(
            Some(temp.path()),
            None,
            env_of(&[(CONTEXT_WINDOW_ENV, "500")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("context_window"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("absent.toml");
        let err = resolve(Some(temp.path()), Some(&missing), env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
