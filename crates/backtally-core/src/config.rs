//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for a single measurement scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to measure.
    pub root: PathBuf,

    /// Raw exclude patterns, one path or directory-content pattern each.
    #[builder(default)]
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config with no excludes.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Create a config from a raw exclude-pattern blob, as handed over by a
    /// UI text field.
    pub fn with_pattern_blob(root: impl Into<PathBuf>, blob: &str) -> Self {
        Self {
            root: root.into(),
            exclude_patterns: split_pattern_blob(blob),
        }
    }
}

/// Split a raw exclude-pattern blob into individual patterns.
///
/// One pattern per line; lines are trimmed and blank lines dropped.
pub fn split_pattern_blob(blob: &str) -> Vec<String> {
    blob.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("/home/user")
            .exclude_patterns(vec!["/home/user/.cache/".to_string()])
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.exclude_patterns.len(), 1);
    }

    #[test]
    fn test_config_builder_rejects_empty_root() {
        assert!(ScanConfig::builder().root("").build().is_err());
        assert!(ScanConfig::builder().build().is_err());
    }

    #[test]
    fn test_config_simple() {
        let config = ScanConfig::new("/home/user");
        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert!(config.exclude_patterns.is_empty());
    }

    #[test]
    fn test_split_pattern_blob() {
        let blob = "/home/user/.cache/\n\n   \n  /home/user/Downloads  \n*.tmp\n";
        let patterns = split_pattern_blob(blob);
        assert_eq!(
            patterns,
            vec!["/home/user/.cache/", "/home/user/Downloads", "*.tmp"]
        );
    }

    #[test]
    fn test_split_pattern_blob_empty() {
        assert!(split_pattern_blob("").is_empty());
        assert!(split_pattern_blob("\n  \n\t\n").is_empty());
    }

    #[test]
    fn test_config_with_pattern_blob() {
        let config = ScanConfig::with_pattern_blob("/data", "a\nb\n");
        assert_eq!(config.exclude_patterns, vec!["a", "b"]);
    }
}
