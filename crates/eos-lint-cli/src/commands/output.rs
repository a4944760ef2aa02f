//! Shared output formatting for lint results.

use anyhow::Result;
use eos_lint_core::{IssueDiagnostic, LintResult, Severity};
use miette::{GraphicalReportHandler, NamedSource, Report};
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analysis root; issue file names are relative to it.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(result),
        OutputFormat::Json => render_json(result)?,
        OutputFormat::Compact => render_compact(result),
        OutputFormat::Pretty => render_pretty(result, root, &GraphicalReportHandler::new())?,
    };
    print!("{rendered}");
    Ok(())
}

fn render_text(result: &LintResult) -> String {
    let (errors, warnings, notices) = result.count_by_severity();
    let mut out = String::new();

    for issue in &result.issues {
        let severity_indicator = match issue.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Notice => "\x1b[34mnotice\x1b[0m",
        };

        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            issue.code,
            issue.rule,
            issue.range.file.display(),
            issue.range.start.line,
            issue.range.start.column,
        );
        let _ = writeln!(out, "  {}: {}", severity_indicator, issue.message);
        out.push('\n');
    }

    for failure in &result.failures {
        if failure.rule.is_empty() {
            let _ = writeln!(out, "\x1b[35mskipped file\x1b[0m {}", failure.message);
            continue;
        }
        let _ = writeln!(
            out,
            "\x1b[35mskipped\x1b[0m {} in {}: {}",
            failure.rule,
            failure.module.display(),
            failure.message
        );
    }
    if !result.failures.is_empty() {
        out.push('\n');
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    let _ = writeln!(
        out,
        "{}Found {} error(s), {} warning(s), {} notice(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, notices, result.files_checked
    );
    out
}

fn render_json(result: &LintResult) -> Result<String> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    Ok(json)
}

fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for issue in &result.issues {
        let _ = writeln!(out, "{issue}");
    }
    out
}

fn render_pretty(
    result: &LintResult,
    root: &Path,
    handler: &GraphicalReportHandler,
) -> Result<String> {
    let mut sources: HashMap<&PathBuf, Option<String>> = HashMap::new();
    let mut out = String::new();

    for issue in &result.issues {
        let source = sources
            .entry(&issue.range.file)
            .or_insert_with(|| match std::fs::read_to_string(root.join(&issue.range.file)) {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!("Cannot read {}: {e}", issue.range.file.display());
                    None
                }
            });

        let report = Report::new(IssueDiagnostic::from(issue));
        let report = match source {
            Some(text) => report.with_source_code(NamedSource::new(
                issue.range.file.display().to_string(),
                text.clone(),
            )),
            None => report,
        };
        handler.render_report(&mut out, &*report)?;
        out.push('\n');
    }

    let (errors, warnings, notices) = result.count_by_severity();
    let _ = writeln!(
        out,
        "Found {errors} error(s), {warnings} warning(s), {notices} notice(s) in {} file(s)",
        result.files_checked
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eos_lint_core::{CheckFailure, Issue, Pos, Range};
    use miette::GraphicalTheme;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> LintResult {
        let mut result = LintResult::new();
        result.issues.push(Issue::new(
            "EOS003",
            "eos_shout",
            Severity::Warning,
            Range::new("main.tf", Pos::new(1, 25, 24), Pos::new(1, 38, 37)),
            "'MY_INSTANCE' should not be all uppercase.",
        ));
        result.issues.push(Issue::new(
            "EOS004",
            "eos_length",
            Severity::Error,
            Range::new("vars.tf", Pos::new(2, 1, 10), Pos::new(2, 30, 39)),
            "'a_very_long_variable_name' is 25 characters and should not be longer than 16.",
        ));
        result.files_checked = 2;
        result.modules_checked = 1;
        result
    }

    #[test]
    fn compact_output() {
        insta::assert_snapshot!(render_compact(&sample()), @r"
        main.tf:1:25: warning [eos_shout] 'MY_INSTANCE' should not be all uppercase.
        vars.tf:2:1: error [eos_length] 'a_very_long_variable_name' is 25 characters and should not be longer than 16.
        ");
    }

    #[test]
    fn json_output() {
        let mut result = sample();
        result.issues.truncate(1);
        result.files_checked = 1;
        insta::assert_snapshot!(render_json(&result).expect("json"), @r#"
        {
          "issues": [
            {
              "code": "EOS003",
              "rule": "eos_shout",
              "severity": "warning",
              "range": {
                "file": "main.tf",
                "start": {
                  "line": 1,
                  "column": 25,
                  "byte": 24
                },
                "end": {
                  "line": 1,
                  "column": 38,
                  "byte": 37
                }
              },
              "message": "'MY_INSTANCE' should not be all uppercase."
            }
          ],
          "files_checked": 1,
          "modules_checked": 1
        }
        "#);
    }

    #[test]
    fn json_includes_failures_only_when_present() {
        let mut result = LintResult::new();
        assert!(!render_json(&result).expect("json").contains("failures"));

        result.failures.push(CheckFailure {
            rule: "eos_hungarian".into(),
            module: PathBuf::from("."),
            message: "failed to recover local values".into(),
        });
        assert!(render_json(&result).expect("json").contains("\"failures\""));
    }

    #[test]
    fn text_output_lists_issues_and_summary() {
        let out = render_text(&sample());
        assert!(out.contains("EOS003 eos_shout at main.tf:1:25\n"));
        assert!(out.contains("'MY_INSTANCE' should not be all uppercase."));
        assert!(out.contains("EOS004 eos_length at vars.tf:2:1\n"));
        assert!(out.contains("Found 1 error(s), 1 warning(s), 0 notice(s) in 2 file(s)"));
    }

    #[test]
    fn text_output_reports_failures() {
        let mut result = LintResult::new();
        result.failures.push(CheckFailure {
            rule: "eos_shout".into(),
            module: PathBuf::from("modules/net"),
            message: "failed to read module content".into(),
        });
        let out = render_text(&result);
        assert!(out.contains("eos_shout in modules/net: failed to read module content"));
    }

    #[test]
    fn text_output_reports_unreadable_files() {
        let mut result = LintResult::new();
        result.failures.push(CheckFailure {
            rule: String::new(),
            module: PathBuf::from("."),
            message: "bad.tf:1:6: Invalid UTF-8 sequence; source files must be UTF-8 encoded"
                .into(),
        });
        let out = render_text(&result);
        assert!(out.contains("skipped file\x1b[0m bad.tf:1:6: Invalid UTF-8 sequence"));
    }

    #[test]
    fn pretty_output_shows_source() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("main.tf"),
            "resource \"aws_instance\" \"MY_INSTANCE\" {}\n",
        )
        .expect("write");

        let mut result = sample();
        result.issues.truncate(1);
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
        let out = render_pretty(&result, dir.path(), &handler).expect("render");

        assert!(out.contains("[EOS003] 'MY_INSTANCE' should not be all uppercase."));
        assert!(out.contains("main.tf"));
        assert!(out.contains("resource \"aws_instance\" \"MY_INSTANCE\" {}"));
        assert!(out.ends_with("Found 0 error(s), 1 warning(s), 0 notice(s) in 2 file(s)\n"));
    }

    #[test]
    fn pretty_output_survives_missing_sources() {
        let dir = TempDir::new().expect("temp dir");
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
        let out = render_pretty(&sample(), dir.path(), &handler).expect("render");
        assert!(out.contains("[EOS004]"));
    }
}
