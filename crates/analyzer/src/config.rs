use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest accepted context window for line-range requests
pub const MIN_CONTEXT_WINDOW: usize = 5;
/// Largest accepted context window for line-range requests
pub const MAX_CONTEXT_WINDOW: usize = 100;
/// Default context window for line-range requests
pub const DEFAULT_CONTEXT_WINDOW: usize = 20;

/// Configuration for the analysis engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Root scanned when a request has no file path; relative paths resolve against it
    pub project_root: PathBuf,

    /// Lines of context around a line-range target
    pub context_window: usize,

    /// Lines of before/after context echoed in line-range reports
    pub preview_lines: usize,

    /// Files larger than this are skipped by the project scanner
    pub max_file_size_bytes: u64,

    /// Blocks longer than this are flagged as hard to maintain
    pub long_block_threshold: usize,

    /// Entity names at or below this length prompt a clarification question
    pub short_name_threshold: usize,

    /// Memoization cache capacity (0 disables the cache)
    pub cache_capacity: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            context_window: DEFAULT_CONTEXT_WINDOW,
            preview_lines: 10,
            max_file_size_bytes: 1_048_576,
            long_block_threshold: 50,
            short_name_threshold: 3,
            cache_capacity: 32,
        }
    }
}

impl AnalyzerConfig {
    /// Create config rooted at `root`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: root.into(),
            ..Default::default()
        }
    }

    /// Create config with memoization disabled
    pub fn without_cache() -> Self {
        Self {
            cache_capacity: 0,
            ..Default::default()
        }
    }

    /// Clamp a requested window into the accepted range
    pub fn clamp_window(window: usize) -> usize {
        window.clamp(MIN_CONTEXT_WINDOW, MAX_CONTEXT_WINDOW)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CONTEXT_WINDOW..=MAX_CONTEXT_WINDOW).contains(&self.context_window) {
            return Err(AnalysisError::invalid_config(format!(
                "context_window ({}) must be within {MIN_CONTEXT_WINDOW}..={MAX_CONTEXT_WINDOW}",
                self.context_window
            )));
        }

        if self.max_file_size_bytes == 0 {
            return Err(AnalysisError::invalid_config(
                "max_file_size_bytes must be > 0",
            ));
        }

        if self.long_block_threshold == 0 {
            return Err(AnalysisError::invalid_config(
                "long_block_threshold must be > 0",
            ));
        }

        if self.project_root.as_os_str().is_empty() {
            return Err(AnalysisError::invalid_config("project_root is empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
        assert!(AnalyzerConfig::without_cache().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AnalyzerConfig::default();

        config.context_window = 2;
        assert!(config.validate().is_err());

        config.context_window = 101;
        assert!(config.validate().is_err());

        config.context_window = 20;
        config.long_block_threshold = 0;
        assert!(config.validate().is_err());

        config.long_block_threshold = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clamp_window() {
        assert_eq!(AnalyzerConfig::clamp_window(0), MIN_CONTEXT_WINDOW);
        assert_eq!(AnalyzerConfig::clamp_window(20), 20);
        assert_eq!(AnalyzerConfig::clamp_window(1_000), MAX_CONTEXT_WINDOW);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"context_window": 30}"#).expect("valid config");
        assert_eq!(config.context_window, 30);
        assert_eq!(config.long_block_threshold, 50);
    }
}
