//! Configuration types for eos-lint.

use crate::types::{resolve_severity, Severity};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Level used when a rule's configuration has no `level` key.
pub const DEFAULT_LEVEL: &str = "warning";

/// Top-level configuration for eos-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use ("recommended", "naming" or "comments").
    #[serde(default)]
    pub preset: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled, falling back to the rule's own default.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str, default: bool) -> bool {
        self.rules
            .get(rule_name)
            .and_then(|c| c.enabled)
            .unwrap_or(default)
    }

    /// Gets the configuration block for a rule, if present.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }
}

/// How `module` calls are followed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallModuleType {
    /// Load modules whose source is a local directory.
    #[default]
    Local,
    /// Only check the root module.
    None,
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns of module directories to skip.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Treat every directory containing `.tf` files as a root module.
    #[serde(default)]
    pub recursive: bool,

    /// Which module calls are loaded as child modules.
    #[serde(default)]
    pub call_module_type: CallModuleType,

    /// Whether to respect .gitignore files during recursive discovery.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Abort the run on the first failed rule check.
    #[serde(default)]
    pub fail_on_parse_error: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            recursive: false,
            call_module_type: CallModuleType::Local,
            respect_gitignore: true,
            fail_on_parse_error: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude() -> Vec<String> {
    vec!["**/.terraform/**".to_string()]
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
///
/// `enabled` and `level` are common to every rule; all other keys are
/// rule-specific options decoded with [`RuleConfig::decode`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity level name ("notice", "warning" or "error").
    #[serde(default)]
    pub level: Option<String>,

    /// Rule-specific options.
    #[serde(flatten)]
    pub options: toml::Table,
}

impl RuleConfig {
    /// Creates a rule configuration with only a level set.
    #[must_use]
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: Some(level.into()),
            ..Self::default()
        }
    }

    /// Adds a rule-specific option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Resolves the configured level, defaulting to `"warning"`.
    #[must_use]
    pub fn severity(&self) -> Severity {
        resolve_severity(self.level.as_deref().unwrap_or(DEFAULT_LEVEL))
    }

    /// Decodes the rule-specific options into `T`.
    ///
    /// Missing keys take `T`'s serde defaults; unknown keys are rejected
    /// when `T` denies them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] naming `rule` if the options do not
    /// match `T`.
    pub fn decode<T: DeserializeOwned>(&self, rule: &str) -> Result<T, ConfigError> {
        toml::Value::Table(self.options.clone())
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Decode {
                rule: rule.to_string(),
                message: e.message().to_string(),
            })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule's options could not be decoded.
    #[error("Invalid options for rule {rule}: {message}")]
    Decode {
        /// Rule whose options failed.
        rule: String,
        /// Decoder message.
        message: String,
    },

    /// The configured preset does not exist.
    #[error("Unknown preset: {name}")]
    UnknownPreset {
        /// Preset name as configured.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct LengthOptions {
        #[serde(default = "sixteen")]
        length: usize,
    }

    fn sixteen() -> usize {
        16
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(!config.analyzer.recursive);
        assert_eq!(config.analyzer.call_module_type, CallModuleType::Local);
        assert_eq!(config.analyzer.exclude, vec!["**/.terraform/**"]);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "naming"

[analyzer]
root = "./infra"
recursive = true
call_module_type = "none"

[rules.eos_length]
enabled = true
level = "notice"
length = 20
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("naming"));
        assert_eq!(config.analyzer.root, PathBuf::from("./infra"));
        assert_eq!(config.analyzer.call_module_type, CallModuleType::None);
        assert!(config.is_rule_enabled("eos_length", false));
        assert!(config.is_rule_enabled("eos_shout", true));
        assert!(!config.is_rule_enabled("eos_shout", false));

        let rule_config = config.rule_config("eos_length").expect("rule config");
        assert_eq!(rule_config.severity(), Severity::Notice);
        let options: LengthOptions = rule_config.decode("eos_length").expect("decode");
        assert_eq!(options.length, 20);
    }

    #[test]
    fn missing_options_take_defaults() {
        let options: LengthOptions = RuleConfig::default().decode("eos_length").expect("decode");
        assert_eq!(options.length, 16);
        assert_eq!(RuleConfig::default().severity(), Severity::Warning);
    }

    #[test]
    fn unknown_option_is_a_decode_error() {
        let config = RuleConfig::default().option("lenght", 3_i64);
        let err = config.decode::<LengthOptions>("eos_length").unwrap_err();
        assert!(matches!(err, ConfigError::Decode { ref rule, .. } if rule == "eos_length"));
    }

    #[test]
    fn wrong_type_is_a_decode_error() {
        let config = RuleConfig::default().option("length", "long");
        assert!(config.decode::<LengthOptions>("eos_length").is_err());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(
            Config::parse("preset = "),
            Err(ConfigError::Parse { .. })
        ));
    }
}
