//! Rule to limit the length of names.
//!
//! # Configuration
//!
//! - `length`: longest allowed name, in characters (default: 16)
//! - `level`: severity level (default: "warning")

use eos_lint_core::{
    lintable_blocks, walk, BlockDefinition, CheckError, ConfigError, IssueSink, Module,
    NamingCheck, NormalizedEntry, Rule, RuleConfig, Severity,
};
use serde::Deserialize;

/// Rule code for eos_length.
pub const CODE: &str = "EOS004";

/// Rule name for eos_length.
pub const NAME: &str = "eos_length";

/// Default maximum name length.
pub const DEFAULT_LENGTH: usize = 16;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    #[serde(default = "default_length")]
    length: usize,
}

fn default_length() -> usize {
    DEFAULT_LENGTH
}

/// Flags names longer than a configured limit.
#[derive(Debug, Clone)]
pub struct Length {
    limit: usize,
    definitions: Vec<BlockDefinition>,
    severity: Severity,
}

impl Default for Length {
    fn default() -> Self {
        Self::new()
    }
}

impl Length {
    /// Creates a new rule with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_LENGTH,
            definitions: lintable_blocks(),
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration block.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] on unknown or mistyped options,
    /// including a negative `length`.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let options: Options = config.decode(NAME)?;
        Ok(Self::new()
            .limit(options.length)
            .level(config.severity()))
    }

    /// Sets the maximum name length.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn level(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl NamingCheck for Length {
    fn evaluate(&self, entry: &NormalizedEntry) -> Vec<String> {
        let length = entry.name.chars().count();
        if length > self.limit {
            vec![format!(
                "'{}' is {length} characters and should not be longer than {}.",
                entry.name, self.limit
            )]
        } else {
            Vec::new()
        }
    }
}

impl Rule for Length {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the length of names"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, module: &dyn Module, sink: &mut IssueSink<'_>) -> Result<(), CheckError> {
        walk(module, &self.definitions, self, sink).map(|_| ())
    }
}
