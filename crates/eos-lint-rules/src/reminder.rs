//! Rule to flag reminder tags such as `TODO` left in comments.
//!
//! Only root modules are checked; child modules are someone else's code.
//!
//! # Configuration
//!
//! - `tags`: tags to look for (default: `BUG, FIXME, HACK, TODO`)
//! - `level`: severity level (default: "warning")

use eos_lint_core::{
    scan_comments, CheckError, ConfigError, IssueSink, Module, Rule, RuleConfig, Severity,
};
use serde::Deserialize;
use tracing::debug;

/// Rule code for eos_reminder.
pub const CODE: &str = "EOS005";

/// Rule name for eos_reminder.
pub const NAME: &str = "eos_reminder";

/// Tags flagged when no `tags` option is configured.
pub const DEFAULT_TAGS: &[&str] = &["BUG", "FIXME", "HACK", "TODO"];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Flags comments whose first or second word is a reminder tag.
#[derive(Debug, Clone)]
pub struct Reminder {
    tags: Vec<String>,
    severity: Severity,
}

impl Default for Reminder {
    fn default() -> Self {
        Self::new()
    }
}

impl Reminder {
    /// Creates a new rule with the default tags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tags: DEFAULT_TAGS.iter().map(|t| (*t).to_string()).collect(),
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
        if let Some(tags) = options.tags {
            rule = rule.tags(tags);
        }
        Ok(rule)
    }

    /// Replaces the tag list. Tags are matched case-insensitively.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags
            .into_iter()
            .map(|t| t.into().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn level(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns the tags found in a comment, once per matching tag.
    fn matching_tags<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a str> {
        let upper = text.to_uppercase();
        let split = upper
            .split_once(' ')
            .map(|(head, rest)| (head.trim().to_string(), rest.to_string()));

        self.tags.iter().map(String::as_str).filter(move |tag| {
            split
                .as_ref()
                .is_some_and(|(head, rest)| head.ends_with(tag) || rest.starts_with(tag))
        })
    }
}

impl Rule for Reminder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags reminder tags such as TODO in comments"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, module: &dyn Module, sink: &mut IssueSink<'_>) -> Result<(), CheckError> {
        if !module.path().is_root() {
            debug!("{NAME}: skipping child module {}", module.path());
            return Ok(());
        }

        for file in module.files() {
            for comment in scan_comments(&file.source, &file.name)? {
                for tag in self.matching_tags(&comment.text) {
                    debug!("{NAME}: found {tag} at {}", comment.range);
                    sink.emit(
                        format!("'{}' has a reminder tag.", comment.text.trim()),
                        comment.range.clone(),
                    );
                }
            }
        }
        Ok(())
    }
}
