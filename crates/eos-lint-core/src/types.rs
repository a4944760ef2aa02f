//! Core types for lint issues and results.

use miette::{Diagnostic, LabeledSpan, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Notice,
    /// Style problem that should be addressed.
    Warning,
    /// Problem that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Notice => write!(f, "notice"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Maps a configured level to a severity.
///
/// Matching is case-insensitive: `"notice"` and `"warning"` map to their
/// severities and every other string, including the empty one, maps to
/// [`Severity::Error`].
#[must_use]
pub fn resolve_severity(level: &str) -> Severity {
    match level.to_ascii_lowercase().as_str() {
        "notice" => Severity::Notice,
        "warning" => Severity::Warning,
        _ => Severity::Error,
    }
}

/// A position in a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub byte: usize,
}

impl Pos {
    /// The position of the first byte of a file.
    pub const INITIAL: Self = Self {
        line: 1,
        column: 1,
        byte: 0,
    };

    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize, byte: usize) -> Self {
        Self { line, column, byte }
    }
}

/// A half-open span of source text in a named file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// File path relative to the analysis root.
    pub file: PathBuf,
    /// First position covered by the range.
    pub start: Pos,
    /// Position just past the end of the range.
    pub end: Pos,
}

impl Range {
    /// Creates a new range.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, start: Pos, end: Pos) -> Self {
        Self {
            file: file.into(),
            start,
            end,
        }
    }

    /// Length of the range in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.byte.saturating_sub(self.start.byte)
    }

    /// Returns true if the range covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{},{}-{},{}",
            self.file.display(),
            self.start.line,
            self.start.column,
            self.end.line,
            self.end.column
        )
    }
}

/// A lint issue found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Rule code (e.g., "EOS001").
    pub code: String,
    /// Rule name (e.g., "eos_type_echo").
    pub rule: String,
    /// Severity of this issue.
    pub severity: Severity,
    /// Source range the issue is reported at.
    pub range: Range,
    /// Human-readable message.
    pub message: String,
}

impl Issue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        range: Range,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            range,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.range.file.display(),
            self.range.start.line,
            self.range.start.column,
            self.severity,
            self.rule,
            self.message
        )
    }
}

/// Converts an [`Issue`] to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct IssueDiagnostic {
    message: String,
    span: SourceSpan,
    label_message: String,
    level: miette::Severity,
}

impl Diagnostic for IssueDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(&self.label_message))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.level)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.label_message.clone()),
            self.span,
        ))))
    }
}

impl From<&Issue> for IssueDiagnostic {
    fn from(issue: &Issue) -> Self {
        let level = match issue.severity {
            Severity::Notice => miette::Severity::Advice,
            Severity::Warning => miette::Severity::Warning,
            Severity::Error => miette::Severity::Error,
        };
        Self {
            message: format!("[{}] {}", issue.code, issue.message),
            span: SourceSpan::from((issue.range.start.byte, issue.range.len())),
            label_message: issue.rule.clone(),
            level,
        }
    }
}

/// A rule check that failed on one module without aborting the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckFailure {
    /// Name of the rule that failed; empty when a source file of the module
    /// could not be loaded.
    pub rule: String,
    /// Directory of the module being checked.
    pub module: PathBuf,
    /// Error message.
    pub message: String,
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All issues found.
    pub issues: Vec<Issue>,
    /// Rule checks that failed and were skipped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<CheckFailure>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of modules checked.
    pub modules_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Returns true if any issue meets or exceeds the given severity.
    #[must_use]
    pub fn has_issues_at(&self, severity: Severity) -> bool {
        self.issues.iter().any(|i| i.severity >= severity)
    }

    /// Returns issues filtered by rule name.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.rule == rule).collect()
    }

    /// Counts issues by severity as `(errors, warnings, notices)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.issues.iter().filter(|i| i.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Notice),
        )
    }

    /// Sorts issues by file, line, column and rule.
    pub fn sort(&mut self) {
        self.issues.sort_by(|a, b| {
            a.range
                .file
                .cmp(&b.range.file)
                .then(a.range.start.line.cmp(&b.range.start.line))
                .then(a.range.start.column.cmp(&b.range.start.column))
                .then(a.rule.cmp(&b.rule))
                .then_with(|| a.message.cmp(&b.message))
        });
    }
}
