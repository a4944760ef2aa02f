//! Issue collection for rule checks.

use crate::rule::Rule;
use crate::types::{Issue, Range, Severity};

/// Collects the issues one rule emits while checking one module.
///
/// Every issue is stamped with the rule's code, name and configured
/// severity, so rules only supply a message and a range.
#[derive(Debug)]
pub struct IssueSink<'a> {
    code: &'static str,
    rule: &'static str,
    severity: Severity,
    issues: &'a mut Vec<Issue>,
}

impl<'a> IssueSink<'a> {
    /// Creates a sink that appends to `issues` on behalf of `rule`.
    #[must_use]
    pub fn new(rule: &dyn Rule, issues: &'a mut Vec<Issue>) -> Self {
        Self {
            code: rule.code(),
            rule: rule.name(),
            severity: rule.severity(),
            issues,
        }
    }

    /// Records an issue at `range`.
    pub fn emit(&mut self, message: impl Into<String>, range: Range) {
        self.issues.push(Issue::new(
            self.code,
            self.rule,
            self.severity,
            range,
            message,
        ));
    }
}
