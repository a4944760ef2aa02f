//! Rule to flag names that repeat their block's type.
//!
//! # Rationale
//!
//! `resource "aws_instance" "web_instance"` says "instance" twice. The type is
//! already part of every reference, so the name should add information
//! instead of echoing it.
//!
//! # Configuration
//!
//! - `synonyms`: map from a type part to extra words that count as an echo
//!   of it, e.g. `{ instance = ["vm", "server"] }` (default: empty)
//! - `level`: severity level (default: "warning")
//!
//! # Suppression
//!
//! - `# tflint-ignore: eos_type_echo` comment

use eos_lint_core::{
    lintable_blocks, walk, BlockDefinition, CheckError, ConfigError, IssueSink, Module,
    NamingCheck, NormalizedEntry, Rule, RuleConfig, Severity,
};
use serde::Deserialize;
use std::collections::HashMap;

/// Rule code for eos_type_echo.
pub const CODE: &str = "EOS001";

/// Rule name for eos_type_echo.
pub const NAME: &str = "eos_type_echo";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    #[serde(default)]
    synonyms: HashMap<String, Vec<String>>,
}

/// Flags block and local names that contain their type, or a synonym of
/// one of its parts.
#[derive(Debug, Clone)]
pub struct TypeEcho {
    synonyms: HashMap<String, Vec<String>>,
    definitions: Vec<BlockDefinition>,
    severity: Severity,
}

impl Default for TypeEcho {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEcho {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            synonyms: HashMap::new(),
            definitions: lintable_blocks(),
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration block.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] on unknown or mistyped options.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let options: Options = config.decode(NAME)?;
        let mut rule = Self::new().level(config.severity());
        for (part, synonyms) in options.synonyms {
            rule = rule.synonyms(&part, synonyms);
        }
        Ok(rule)
    }

    /// Registers synonyms for a type part. Matching is case-insensitive.
    #[must_use]
    pub fn synonyms<I, S>(mut self, part: &str, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms
            .entry(part.to_lowercase())
            .or_default()
            .extend(synonyms.into_iter().map(|s| s.into().to_lowercase()));
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn level(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns the synonym that matched, `Some("")` for a direct echo, or
    /// `None` when the name does not echo its type.
    fn find_echo(&self, entry: &NormalizedEntry) -> Option<String> {
        let kind = entry.kind.to_lowercase();
        let name = entry.name.to_lowercase();
        let name_parts: Vec<&str> = name.split(['_', '-']).collect();
        let own_synonym = entry.synonym.to_lowercase();

        for part in kind.split('_').filter(|p| !p.is_empty()) {
            if name.contains(part) {
                return Some(String::new());
            }

            let configured = self.synonyms.get(part).map(Vec::as_slice).unwrap_or_default();
            let candidates = configured
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(own_synonym.as_str()))
                .filter(|s| !s.is_empty());

            for synonym in candidates {
                if name_parts.iter().any(|p| p.contains(synonym)) {
                    return Some(synonym.to_string());
                }
            }
        }
        None
    }
}

impl NamingCheck for TypeEcho {
    fn evaluate(&self, entry: &NormalizedEntry) -> Vec<String> {
        let Some(synonym) = self.find_echo(entry) else {
            return Vec::new();
        };
        let via = if synonym.is_empty() {
            String::new()
        } else {
            format!(" (via synonym '{synonym}')")
        };
        vec![format!(
            "The type \"{}\" is echoed{via} in the label \"{}\".",
            entry.kind, entry.name
        )]
    }
}

impl Rule for TypeEcho {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids names that repeat their block type"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, module: &dyn Module, sink: &mut IssueSink<'_>) -> Result<(), CheckError> {
        walk(module, &self.definitions, self, sink).map(|_| ())
    }
}
