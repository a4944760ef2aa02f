//! Rule to enforce comment formatting.
//!
//! Three independent checks run on every comment of a root module:
//!
//! - block: `/* ... */` comments are not allowed
//! - jammed: the comment marker must be followed by a space (`# x`, `// x`)
//! - column: a comment must not extend past a column limit
//!
//! # Configuration
//!
//! - `block`: forbid block comments (default: true)
//! - `jammed`: forbid jammed comments (default: true)
//! - `column`: column limit, 0 disables the check (default: 80)
//! - `level`: severity level (default: "warning")

use eos_lint_core::{
    scan_comments, CheckError, ConfigError, IssueSink, Module, Rule, RuleConfig, Severity, Token,
};
use serde::Deserialize;
use tracing::debug;

/// Rule code for eos_comments.
pub const CODE: &str = "EOS006";

/// Rule name for eos_comments.
pub const NAME: &str = "eos_comments";

/// Default column limit.
pub const DEFAULT_COLUMN: usize = 80;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    #[serde(default = "enabled")]
    block: bool,
    #[serde(default = "enabled")]
    jammed: bool,
    #[serde(default = "default_column")]
    column: usize,
}

fn enabled() -> bool {
    true
}

fn default_column() -> usize {
    DEFAULT_COLUMN
}

/// Enforces comment style in root modules.
#[derive(Debug, Clone)]
pub struct Comments {
    block: bool,
    jammed: bool,
    column: usize,
    severity: Severity,
}

impl Default for Comments {
    fn default() -> Self {
        Self::new()
    }
}

impl Comments {
    /// Creates a new rule with every check enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            block: true,
            jammed: true,
            column: DEFAULT_COLUMN,
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
        Ok(Self::new()
            .block(options.block)
            .jammed(options.jammed)
            .column(options.column)
            .level(config.severity()))
    }

    /// Sets whether block comments are flagged.
    #[must_use]
    pub fn block(mut self, enabled: bool) -> Self {
        self.block = enabled;
        self
    }

    /// Sets whether jammed comments are flagged.
    #[must_use]
    pub fn jammed(mut self, enabled: bool) -> Self {
        self.jammed = enabled;
        self
    }

    /// Sets the column limit; 0 disables the check.
    #[must_use]
    pub fn column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn level(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn evaluate(&self, comment: &Token) -> Vec<String> {
        let text = comment.text.as_str();
        let line = text.trim_end_matches(['\r', '\n']);
        let mut messages = Vec::new();

        if self.block && text.starts_with("/*") {
            messages.push("Block comments not allowed.".to_string());
        }

        if self.jammed && is_jammed(text) {
            let snippet: String = text.trim().chars().take(5).collect();
            messages.push(format!("Comment is jammed ('{snippet} ...')."));
        }

        if self.column > 0 {
            let end = comment.range.start.column + line.chars().count() - 1;
            if end > self.column {
                messages.push(format!(
                    "Comment extends beyond column {} to {end}.",
                    self.column
                ));
            }
        }

        messages
    }
}

fn is_jammed(text: &str) -> bool {
    let next = if let Some(rest) = text.strip_prefix("//") {
        rest.chars().next()
    } else if let Some(rest) = text.strip_prefix('#') {
        rest.chars().next()
    } else {
        None
    };
    next.is_some_and(|c| c != ' ')
}

impl Rule for Comments {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces comment style: no block comments, a space after the marker, a column limit"
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
                for message in self.evaluate(&comment) {
                    sink.emit(message, comment.range.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check_module, check_source};
    use eos_lint_core::{HclModule, ModulePath};

    fn messages(rule: &Comments, src: &str) -> Vec<String> {
        check_source(rule, src)
            .into_iter()
            .map(|i| i.message)
            .collect()
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(
            messages(&Comments::new(), "/* old */\n"),
            vec!["Block comments not allowed."]
        );
        assert!(messages(&Comments::new().block(false), "/* old */\n").is_empty());
    }

    #[test]
    fn test_jammed_comments() {
        assert_eq!(
            messages(&Comments::new(), "//x marks the spot\n"),
            vec!["Comment is jammed ('//x m ...')."]
        );
        assert_eq!(
            messages(&Comments::new(), "#jammed\n"),
            vec!["Comment is jammed ('#jamm ...')."]
        );
        assert!(messages(&Comments::new(), "// x\n# y\n").is_empty());
    }

    #[test]
    fn test_bare_markers_are_jammed() {
        assert_eq!(
            messages(&Comments::new(), "#\n//\n"),
            vec!["Comment is jammed ('# ...').", "Comment is jammed ('// ...')."]
        );
        assert_eq!(
            check_source(&Comments::new(), "#\nvariable \"ok\" {}\n").len(),
            1
        );
    }

    #[test]
    fn test_bare_marker_at_end_of_file_is_not_jammed() {
        assert!(messages(&Comments::new(), "x = 1\n#").is_empty());
    }

    #[test]
    fn test_block_comment_is_not_jammed() {
        assert_eq!(
            messages(&Comments::new(), "/*x*/\n"),
            vec!["Block comments not allowed."]
        );
    }

    #[test]
    fn test_column_overflow() {
        let long = format!("# {}\n", "a".repeat(80));
        assert_eq!(
            messages(&Comments::new(), &long),
            vec!["Comment extends beyond column 80 to 82."]
        );

        let exact = format!("# {}\n", "a".repeat(78));
        assert!(messages(&Comments::new(), &exact).is_empty());
    }

    #[test]
    fn test_column_counts_from_comment_start() {
        let src = "x = 1 # trailing\n";
        assert_eq!(
            messages(&Comments::new().column(10), src),
            vec!["Comment extends beyond column 10 to 16."]
        );
        assert!(messages(&Comments::new().column(0), src).is_empty());
    }

    #[test]
    fn test_all_checks_may_fire() {
        let src = format!("/*{}*/\n", "a".repeat(90));
        let found = messages(&Comments::new(), &src);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1], "Comment extends beyond column 80 to 94.");
    }

    #[test]
    fn test_crlf_is_not_counted() {
        let src = format!("# {}\r\n", "a".repeat(78));
        assert!(messages(&Comments::new(), &src).is_empty());
    }

    #[test]
    fn test_child_modules_are_skipped() {
        let module = HclModule::from_sources([("main.tf", "/* nope */\n")])
            .with_path(ModulePath::root().child("net"));
        assert!(check_module(&Comments::new(), &module).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = RuleConfig::default()
            .option("block", false)
            .option("column", 0_i64);
        let rule = Comments::from_config(&config).expect("config");
        assert!(messages(&rule, "/* a very long block comment */\n").is_empty());
    }
}
