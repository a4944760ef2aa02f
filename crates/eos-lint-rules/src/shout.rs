//! Rule to flag names written in all uppercase.

use eos_lint_core::{
    lintable_blocks, walk, BlockDefinition, CheckError, ConfigError, IssueSink, Module,
    NamingCheck, NormalizedEntry, Rule, RuleConfig, Severity,
};
use serde::Deserialize;

/// Rule code for eos_shout.
pub const CODE: &str = "EOS003";

/// Rule name for eos_shout.
pub const NAME: &str = "eos_shout";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {}

/// Flags names whose letters are all uppercase.
///
/// Names without any letter (e.g. `"_1"`) are never flagged.
#[derive(Debug, Clone)]
pub struct Shout {
    definitions: Vec<BlockDefinition>,
    severity: Severity,
}

impl Default for Shout {
    fn default() -> Self {
        Self::new()
    }
}

impl Shout {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            definitions: lintable_blocks(),
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration block.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] if any option other than `level` is set.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let Options {} = config.decode(NAME)?;
        Ok(Self::new().level(config.severity()))
    }

    /// Sets the severity level.
    #[must_use]
    pub fn level(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

fn is_shouted(name: &str) -> bool {
    let mut letters = name.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

impl NamingCheck for Shout {
    fn evaluate(&self, entry: &NormalizedEntry) -> Vec<String> {
        if is_shouted(&entry.name) {
            vec![format!("'{}' should not be all uppercase.", entry.name)]
        } else {
            Vec::new()
        }
    }
}

impl Rule for Shout {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids all-uppercase names"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, module: &dyn Module, sink: &mut IssueSink<'_>) -> Result<(), CheckError> {
        walk(module, &self.definitions, self, sink).map(|_| ())
    }
}
