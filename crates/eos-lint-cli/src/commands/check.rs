//! Check command implementation.

use anyhow::{Context, Result};
use eos_lint_core::{Analyzer, Config, RuleBox, RuleConfig};
use eos_lint_rules::{all_rules, configured_rules, rule_from_config};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line settings for a check run.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to run instead of the configured set.
    pub rules_filter: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Treat every directory containing `.tf` files as a root module.
    pub recursive: bool,
}

/// Runs the check command.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;

    let rules = if let Some(filter) = &options.rules_filter {
        let names: Vec<&str> = filter.split(',').map(str::trim).collect();
        filter_rules(&names, &config)?
    } else {
        configured_rules(&config).context("Invalid rule configuration")?
    };

    let mut builder = Analyzer::builder()
        .root(path)
        .rules(rules)
        .excludes(options.exclude.iter().cloned())
        .config(config);
    if options.recursive {
        builder = builder.recursive(true);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Builds the named rules, accepting either rule names or codes.
///
/// Options still come from the configuration; `enabled` and the preset are
/// ignored since the rules were asked for explicitly.
fn filter_rules(names: &[&str], config: &Config) -> Result<Vec<RuleBox>> {
    let default_config = RuleConfig::default();
    let known = all_rules();
    let mut rules = Vec::new();

    for requested in names.iter().filter(|n| !n.is_empty()) {
        let Some(rule) = known
            .iter()
            .find(|r| r.name() == *requested || r.code().eq_ignore_ascii_case(requested))
        else {
            tracing::warn!("Unknown rule: {}", requested);
            continue;
        };
        let name = rule.name();
        let rule_config = config.rule_config(name).unwrap_or(&default_config);
        if let Some(rule) = rule_from_config(name, rule_config)
            .with_context(|| format!("Invalid configuration for {name}"))?
        {
            rules.push(rule);
        }
    }

    Ok(rules)
}
