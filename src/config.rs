// src/config.rs
// =============================================================================
// Pipeline configuration.
//
// Loaded from TOML. Every section falls back to its default, so an empty
// file (or no file at all) gives the standard UCI ICS crawl policy.
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the page pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Which URLs may be crawled
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Which pages are worth processing
    #[serde(default)]
    pub quality: QualityConfig,
    /// Corpus analytics settings
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    // Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: PipelineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    // Validate all fields, reporting every problem at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if !(0.0..=1.0).contains(&self.quality.min_text_ratio) {
            errors.push("quality.min_text_ratio must be between 0.0 and 1.0".to_string());
        }
        if self.policy.allowed_domains.is_empty() && self.policy.path_exception.is_none() {
            errors.push("policy needs at least one allowed domain or a path exception".to_string());
        }
        if self.policy.allowed_domains.iter().any(|d| d.trim_matches('.').is_empty()) {
            errors.push("policy.allowed_domains must not contain empty entries".to_string());
        }
        for pattern in &self.policy.trap_patterns {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(format!("policy.trap_patterns: '{}' is not a valid regex: {}", pattern, e));
            }
        }
        if self.analytics.parent_domain.trim_matches('.').is_empty() {
            errors.push("analytics.parent_domain must not be empty".to_string());
        }
        if self.analytics.top_words == 0 {
            errors.push("analytics.top_words must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "))
        }
    }
}

/// A single out-of-scope host that is let in by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathException {
    pub host: String,
    pub path_prefix: String,
}

/// URL validity policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Hosts must be one of these domains or a subdomain of one
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
    /// Path-based exception to the domain rule
    #[serde(default = "default_path_exception")]
    pub path_exception: Option<PathException>,
    /// File extensions (without the dot) that are never crawled
    #[serde(default = "default_disallowed_extensions")]
    pub disallowed_extensions: Vec<String>,
    /// Regexes matched against path + query
    #[serde(default = "default_trap_patterns")]
    pub trap_patterns: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_domains: default_allowed_domains(),
            path_exception: default_path_exception(),
            disallowed_extensions: default_disallowed_extensions(),
            trap_patterns: default_trap_patterns(),
        }
    }
}

impl PolicyConfig {
    // The first version of the policy: domain and extension rules only.
    //
    // Kept so older crawl behaviour can be reproduced from configuration.
    pub fn legacy() -> Self {
        Self {
            trap_patterns: Vec::new(),
            ..Self::default()
        }
    }
}

fn default_allowed_domains() -> Vec<String> {
    ["ics.uci.edu", "cs.uci.edu", "informatics.uci.edu", "stat.uci.edu"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn default_path_exception() -> Option<PathException> {
    Some(PathException {
        host: "today.uci.edu".to_string(),
        path_prefix: "/department/information_computer_sciences".to_string(),
    })
}

fn default_disallowed_extensions() -> Vec<String> {
    [
        "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "mid", "mp2",
        "mp3", "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv", "pdf", "ps",
        "eps", "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data", "dat", "exe",
        "bz2", "tar", "msi", "bin", "7z", "psd", "dmg", "iso", "epub", "dll", "cnf", "tgz", "sha1",
        "thmx", "mso", "arff", "rtf", "jar", "csv", "rm", "smil", "wmv", "swf", "wma", "zip",
        "rar", "gz",
    ]
    .iter()
    .map(|e| e.to_string())
    .collect()
}

fn default_trap_patterns() -> Vec<String> {
    [
        // Sort/order permutations of the same listing
        r"[?&](sort|order|orderby|sortby)=",
        // Share and reply widgets that mint a new URL per click
        r"[?&](share|replytocom)=",
        // Event calendars: every day, month and export format is a page
        r"[?&](tribe-bar-date|ical|outlook-ical|eventdisplay)=",
        r"/events?/(list|month|week|day|\d{4}-\d{2}(-\d{2})?)(/|\?|$)",
        // Search results
        r"(^|/)search(/|\?|$)",
        r"[?&](q|s|query|search)=",
        // Wiki revision and action views
        r"[?&](do|action|rev|version|idx)=",
        // Deep pagination
        r"/page/\d{2,}(/|\?|$)",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

/// Content quality filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Pages whose visible text is a smaller share of the body are skipped
    #[serde(default = "default_min_text_ratio")]
    pub min_text_ratio: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_text_ratio: default_min_text_ratio(),
        }
    }
}

fn default_min_text_ratio() -> f64 {
    0.05
}

/// Corpus analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Subdomain counts are kept only for hosts under this domain
    #[serde(default = "default_parent_domain")]
    pub parent_domain: String,
    /// How many words the report lists
    #[serde(default = "default_top_words")]
    pub top_words: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            parent_domain: default_parent_domain(),
            top_words: default_top_words(),
        }
    }
}

fn default_parent_domain() -> String {
    "ics.uci.edu".to_string()
}

fn default_top_words() -> usize {
    50
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration; `RUST_LOG` wins over `level` when set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.quality.min_text_ratio, 0.05);
        assert_eq!(config.analytics.top_words, 50);
        assert_eq!(config.policy.allowed_domains.len(), 4);
        assert!(config.policy.path_exception.is_some());
    }

    #[test]
    fn test_partial_sections_override_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[policy]
allowed_domains = ["example.org"]
trap_patterns = []

[quality]
min_text_ratio = 0.2

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.policy.allowed_domains, vec!["example.org"]);
        assert!(config.policy.trap_patterns.is_empty());
        // Untouched fields keep their defaults
        assert!(!config.policy.disallowed_extensions.is_empty());
        assert_eq!(config.quality.min_text_ratio, 0.2);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.analytics.parent_domain, "ics.uci.edu");
    }

    #[test]
    fn test_validation_reports_every_problem() {
        let mut config = PipelineConfig::default();
        config.quality.min_text_ratio = 1.5;
        config.policy.trap_patterns.push("(unclosed".to_string());
        config.analytics.top_words = 0;

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("min_text_ratio"));
        assert!(message.contains("(unclosed"));
        assert!(message.contains("top_words"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PipelineConfig::load(&dir.path().join("nope.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_legacy_policy_has_no_trap_patterns() {
        let legacy = PolicyConfig::legacy();
        assert!(legacy.trap_patterns.is_empty());
        assert_eq!(legacy.allowed_domains, PolicyConfig::default().allowed_domains);
    }
}
