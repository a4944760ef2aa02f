//! Comment-based ignore annotations.
//!
//! Supports annotations like:
//! ```text
//! # tflint-ignore: eos_shout, eos_length
//! resource "aws_instance" "WEB" {}
//!
//! # tflint-ignore-file: eos_comments
//! ```
//!
//! A line annotation covers issues starting on its own line or the line
//! after it. A file annotation covers the whole file. `all` matches every
//! rule. Text after a further `#` is treated as a reason and ignored.

use crate::syntax::scan_comments;
use crate::module::SourceFile;
use crate::types::Issue;
use std::collections::HashSet;
use std::path::PathBuf;

const LINE_PREFIX: &str = "tflint-ignore:";
const FILE_PREFIX: &str = "tflint-ignore-file:";

/// Where an annotation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationScope {
    /// The annotated line and the one after it (1-indexed).
    Line(usize),
    /// Every line of the file.
    File,
}

/// A parsed ignore annotation.
#[derive(Debug, Clone)]
pub struct IgnoreAnnotation {
    /// File the annotation appears in.
    pub file: PathBuf,
    /// Rule names covered; may contain `all`.
    pub rules: HashSet<String>,
    /// Lines covered.
    pub scope: AnnotationScope,
}

impl IgnoreAnnotation {
    /// Returns true if this annotation suppresses `issue`.
    #[must_use]
    pub fn covers(&self, issue: &Issue) -> bool {
        if issue.range.file != self.file {
            return false;
        }
        if !self.rules.contains(&issue.rule) && !self.rules.contains("all") {
            return false;
        }
        match self.scope {
            AnnotationScope::File => true,
            AnnotationScope::Line(line) => {
                let start = issue.range.start.line;
                start == line || start == line + 1
            }
        }
    }
}

/// All ignore annotations of a module.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    entries: Vec<IgnoreAnnotation>,
}

impl Annotations {
    /// Collects annotations from the comments of `files`.
    ///
    /// Files that cannot be lexed contribute nothing; the rules reading
    /// them report the failure.
    #[must_use]
    pub fn from_files(files: &[SourceFile]) -> Self {
        let mut entries = Vec::new();
        for file in files {
            let Ok(comments) = scan_comments(&file.source, &file.name) else {
                tracing::debug!("skipping annotations in {}", file.name.display());
                continue;
            };
            for comment in comments {
                if let Some((rules, is_file)) = parse_annotation(&comment.text) {
                    let scope = if is_file {
                        AnnotationScope::File
                    } else {
                        AnnotationScope::Line(comment.range.start.line)
                    };
                    entries.push(IgnoreAnnotation {
                        file: file.name.clone(),
                        rules,
                        scope,
                    });
                }
            }
        }
        Self { entries }
    }

    /// Returns true if any annotation suppresses `issue`.
    #[must_use]
    pub fn is_ignored(&self, issue: &Issue) -> bool {
        self.entries.iter().any(|a| a.covers(issue))
    }

    /// Number of annotations found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no annotations were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses an annotation from a comment token's text.
///
/// Returns the rule names and whether the annotation is file-wide.
fn parse_annotation(text: &str) -> Option<(HashSet<String>, bool)> {
    let text = text.trim();
    let body = if let Some(rest) = text.strip_prefix('#') {
        rest
    } else if let Some(rest) = text.strip_prefix("//") {
        rest
    } else {
        text.strip_prefix("/*")?.strip_suffix("*/")?
    };
    let body = body.trim();

    let (list, is_file) = if let Some(rest) = body.strip_prefix(FILE_PREFIX) {
        (rest, true)
    } else {
        (body.strip_prefix(LINE_PREFIX)?, false)
    };

    let list = list.split('#').next().unwrap_or_default();
    let rules: HashSet<String> = list
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }
    Some((rules, is_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pos, Range, Severity};

    fn issue(rule: &str, file: &str, line: usize) -> Issue {
        Issue::new(
            "EOS000",
            rule,
            Severity::Warning,
            Range::new(file, Pos::new(line, 1, 0), Pos::new(line, 2, 1)),
            "message",
        )
    }

    #[test]
    fn test_parse_annotation() {
        let (rules, is_file) = parse_annotation("# tflint-ignore: eos_shout\n").expect("annotation");
        assert!(rules.contains("eos_shout"));
        assert!(!is_file);
    }

    #[test]
    fn test_parse_multiple_rules_and_reason() {
        let (rules, _) = parse_annotation("// tflint-ignore: eos_shout, eos_length # legacy names")
            .expect("annotation");
        assert_eq!(rules.len(), 2);
        assert!(rules.contains("eos_length"));
    }

    #[test]
    fn test_parse_file_annotation() {
        let (rules, is_file) =
            parse_annotation("/* tflint-ignore-file: all */").expect("annotation");
        assert!(rules.contains("all"));
        assert!(is_file);
    }

    #[test]
    fn test_not_an_annotation() {
        assert!(parse_annotation("# just a comment").is_none());
        assert!(parse_annotation("# tflint-ignore:").is_none());
    }

    #[test]
    fn line_annotation_covers_same_and_next_line() {
        let files = [SourceFile::new(
            "main.tf",
            "# tflint-ignore: eos_shout\nresource \"a\" \"B\" {}\n\nresource \"a\" \"C\" {} # tflint-ignore: eos_shout\n",
        )];
        let annotations = Annotations::from_files(&files);
        assert_eq!(annotations.len(), 2);

        assert!(annotations.is_ignored(&issue("eos_shout", "main.tf", 1)));
        assert!(annotations.is_ignored(&issue("eos_shout", "main.tf", 2)));
        assert!(!annotations.is_ignored(&issue("eos_shout", "main.tf", 3)));
        assert!(annotations.is_ignored(&issue("eos_shout", "main.tf", 4)));
        assert!(!annotations.is_ignored(&issue("eos_length", "main.tf", 2)));
        assert!(!annotations.is_ignored(&issue("eos_shout", "other.tf", 2)));
    }

    #[test]
    fn file_annotation_covers_every_line() {
        let files = [SourceFile::new(
            "main.tf",
            "# tflint-ignore-file: eos_comments\n",
        )];
        let annotations = Annotations::from_files(&files);
        assert!(annotations.is_ignored(&issue("eos_comments", "main.tf", 90)));
        assert!(!annotations.is_ignored(&issue("eos_shout", "main.tf", 90)));
    }

    #[test]
    fn unlexable_files_contribute_nothing() {
        let files = [SourceFile::new("bad.tf", "# tflint-ignore: all\nx = \"open\n")];
        assert!(Annotations::from_files(&files).is_empty());
    }
}
