//! Engine configuration loaded from TOML
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Severities are fixed per rule and cannot be overridden here.

use crate::merge::MergePolicy;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rule family names to skip (e.g. `"legal"`, `"citations"`)
    pub disabled_rules: Vec<String>,
    /// How model issues are merged with heuristic ones
    pub merge: MergePolicy,
    pub ai: AiConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// ```
    /// use compliance_engine::config::EngineConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = EngineConfig::from_str(r#"
    ///     disabled_rules = ["legal"]
    ///     merge = "dedup_overlapping"
    /// "#)?;
    /// assert!(config.is_disabled("legal"));
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    pub fn is_disabled(&self, family: &str) -> bool {
        self.disabled_rules.iter().any(|name| name == family)
    }
}

/// Settings for model-sourced issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Fall back to case-insensitive search when a model quote is re-cased
    pub case_insensitive_anchors: bool,
    /// Search for a phrase to anchor issues the model did not quote
    pub synthesize_anchors: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            case_insensitive_anchors: true,
            synthesize_anchors: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.merge, MergePolicy::Concatenate);
        assert!(config.ai.case_insensitive_anchors);
        assert!(config.ai.synthesize_anchors);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            disabled_rules = ["legal", "social_media"]
            merge = "dedup_overlapping"

            [ai]
            synthesize_anchors = false
        "#;
        let config = EngineConfig::from_str(toml).unwrap();
        assert!(config.is_disabled("social_media"));
        assert!(!config.is_disabled("citations"));
        assert_eq!(config.merge, MergePolicy::DedupOverlapping);
        assert!(!config.ai.synthesize_anchors);
        assert!(config.ai.case_insensitive_anchors);
    }

    #[test]
    fn test_malformed_config_errors() {
        assert!(EngineConfig::from_str("merge = 3").is_err());
        assert!(EngineConfig::from_str("merge = \"sometimes\"").is_err());
    }

    #[test]
    fn test_missing_file_errors() {
        let err = EngineConfig::from_file("/nonexistent/apa.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
