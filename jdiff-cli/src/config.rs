//! jdiff configuration loading from `.jdiffrc.toml`.
//!
//! The file is optional. Every value in it is a default that the matching
//! command-line flag overrides.
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! from = "1.4"
//! to = "1.5"
//!
//! [scanner]
//! ignore = ["generated/", "*Test.java"]
//!
//! [output]
//! format = "text"
//! context_lines = 3
//! color = false
//!
//! [processor]
//! threads = 4
//! ```

use serde::Deserialize;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILENAME: &str = ".jdiffrc.toml";

/// Root configuration structure loaded from `.jdiffrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct JdiffConfig {
    /// Default Java source versions.
    #[serde(default)]
    pub source: SourceSection,

    /// Directory scanning.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub processor: ProcessorSection,
}

/// Source versions used when `--from-source`, `--to-source` and `--source`
/// are absent.
#[derive(Debug, Deserialize, Default)]
pub struct SourceSection {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Scanner configuration controlling which Java files a directory
/// comparison sees.
#[derive(Debug, Deserialize, Default)]
pub struct ScannerConfig {
    /// Gitignore-style patterns, added to `.gitignore` and `.jdiffignore`
    /// rules.
    ///
    /// # Example
    /// ```toml
    /// ignore = ["generated/", "*Test.java"]
    /// ```
    #[serde(default)]
    pub ignore: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `text` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Unchanged lines printed around each difference in context output.
    #[serde(default)]
    pub context_lines: Option<usize>,

    /// Force colour on or off. Unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProcessorSection {
    /// Worker threads for directory comparisons. Unset uses the global pool.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl JdiffConfig {
    /// Load configuration from `.jdiffrc.toml` in the given directory.
    ///
    /// A missing file yields defaults. Read and parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILENAME);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILENAME, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILENAME, e);
                }
            }
        }
        Self::default()
    }

    pub fn from_version(&self) -> Option<&str> {
        self.source.from.as_deref()
    }

    pub fn to_version(&self) -> Option<&str> {
        self.source.to.as_deref()
    }

    pub fn ignore_patterns(&self) -> &[String] {
        &self.scanner.ignore
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    pub fn context_lines(&self) -> Option<usize> {
        self.output.context_lines
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    pub fn threads(&self) -> Option<usize> {
        self.processor.threads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = JdiffConfig::default();
        assert!(config.from_version().is_none());
        assert!(config.ignore_patterns().is_empty());
        assert!(config.context_lines().is_none());
        assert!(config.use_color().is_none());
        assert!(config.threads().is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[source]
from = "1.4"
to = "5"

[scanner]
ignore = ["generated/"]

[output]
format = "json"
context_lines = 4
color = false

[processor]
threads = 2
"#;
        let config: JdiffConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.from_version(), Some("1.4"));
        assert_eq!(config.to_version(), Some("5"));
        assert_eq!(config.ignore_patterns(), ["generated/".to_string()]);
        assert_eq!(config.default_format(), Some("json"));
        assert_eq!(config.context_lines(), Some(4));
        assert_eq!(config.use_color(), Some(false));
        assert_eq!(config.threads(), Some(2));
    }

    #[test]
    fn test_partial_config() {
        let config: JdiffConfig = toml::from_str("[output]\ncolor = true\n").unwrap();
        assert_eq!(config.use_color(), Some(true));
        assert!(config.to_version().is_none());
    }

    #[test]
    fn test_load_missing_and_invalid() {
        let dir = TempDir::new().unwrap();
        assert!(JdiffConfig::load(dir.path()).from_version().is_none());

        std::fs::write(dir.path().join(CONFIG_FILENAME), "[source\nfrom = ").unwrap();
        assert!(JdiffConfig::load(dir.path()).from_version().is_none());

        std::fs::write(dir.path().join(CONFIG_FILENAME), "[source]\nfrom = \"1.4\"\n").unwrap();
        assert_eq!(JdiffConfig::load(dir.path()).from_version(), Some("1.4"));
    }
}
