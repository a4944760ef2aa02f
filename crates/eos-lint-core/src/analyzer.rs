//! Core analyzer for orchestrating lint execution.

use crate::config::{CallModuleType, Config};
use crate::context::IssueSink;
use crate::module::{HclModule, Module, ModulePath};
use crate::rule::{CheckError, Rule, RuleBox};
use crate::syntax::ParseError;
use crate::types::{CheckFailure, LintResult};
use crate::utils::Annotations;

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A source file could not be loaded and `fail_on_parse_error` is set.
    #[error("Cannot load module {}: {source}", .module.display())]
    Load {
        /// Directory of the module being loaded.
        module: PathBuf,
        /// Underlying failure.
        source: ParseError,
    },

    /// A rule check failed and `fail_on_parse_error` is set.
    #[error("Rule {rule} failed on {}: {source}", .module.display())]
    Check {
        /// Rule that failed.
        rule: String,
        /// Directory of the module being checked.
        module: PathBuf,
        /// Underlying failure.
        source: CheckError,
    },
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    recursive: Option<bool>,
    fail_on_parse_error: Option<bool>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds multiple boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Treats every directory containing `.tf` files as a root module.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    /// Sets whether a failed rule check aborts the run (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = Some(fail);
        self
    }

    /// Builds the analyzer.
    ///
    /// Explicit builder settings win over the configuration's `[analyzer]`
    /// table.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            normalize_path(&root)
        } else {
            normalize_path(&std::env::current_dir()?.join(&root))
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = exclude_patterns
            .iter()
            .map(String::as_str)
            .map(glob::Pattern::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            excludes,
            recursive: self.recursive.unwrap_or(config.analyzer.recursive),
            fail_on_parse_error: self
                .fail_on_parse_error
                .unwrap_or(config.analyzer.fail_on_parse_error),
            config,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    excludes: Vec<glob::Pattern>,
    recursive: bool,
    fail_on_parse_error: bool,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the exclude patterns in effect.
    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Analyzes every module under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if module discovery fails, or if a rule check fails
    /// while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let roots = self.discover_root_dirs()?;
        info!("Found {} root modules to analyze", roots.len());

        for dir in &roots {
            for module in self.load_module_tree(dir, &roots)? {
                self.analyze_module(&module, &mut result)?;
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} issues in {} files across {} modules",
            result.issues.len(),
            result.files_checked,
            result.modules_checked
        );

        Ok(result)
    }

    /// Runs every registered rule against one module.
    ///
    /// Rules are expected to be selected already; `enabled` settings in the
    /// configuration are not consulted here.
    fn analyze_module(
        &self,
        module: &HclModule,
        result: &mut LintResult,
    ) -> Result<(), AnalyzerError> {
        debug!("Analyzing {} at {}", module.path(), module.dir().display());

        for e in module.unreadable_files() {
            if self.fail_on_parse_error {
                return Err(AnalyzerError::Load {
                    module: module.dir().to_path_buf(),
                    source: e.clone(),
                });
            }
            result.failures.push(CheckFailure {
                rule: String::new(),
                module: self.display_path(module.dir()),
                message: e.to_string(),
            });
        }

        let annotations = Annotations::from_files(module.files());
        if !annotations.is_empty() {
            debug!("{} ignore annotations in {}", annotations.len(), module.path());
        }

        for rule in &self.rules {
            let mut issues = Vec::new();
            let outcome = {
                let mut sink = IssueSink::new(rule.as_ref(), &mut issues);
                rule.check(module, &mut sink)
            };

            let before = issues.len();
            issues.retain(|issue| !annotations.is_ignored(issue));
            if issues.len() < before {
                debug!(
                    "{} issues from {} ignored by annotations",
                    before - issues.len(),
                    rule.name()
                );
            }
            result.issues.extend(issues);

            if let Err(e) = outcome {
                warn!("Rule {} failed on {}: {}", rule.name(), module.path(), e);
                if self.fail_on_parse_error {
                    return Err(AnalyzerError::Check {
                        rule: rule.name().to_string(),
                        module: module.dir().to_path_buf(),
                        source: e,
                    });
                }
                result.failures.push(CheckFailure {
                    rule: rule.name().to_string(),
                    module: self.display_path(module.dir()),
                    message: e.to_string(),
                });
            }
        }

        result.files_checked += module.files().len();
        result.modules_checked += 1;
        Ok(())
    }

    /// Loads a root module and, when enabled, the local modules it calls.
    ///
    /// Calls into directories that are analyzed as root modules themselves
    /// are not followed.
    fn load_module_tree(
        &self,
        dir: &Path,
        roots: &[PathBuf],
    ) -> Result<Vec<HclModule>, AnalyzerError> {
        let mut modules = Vec::new();
        let mut visited = HashSet::new();
        let mut pending = vec![(dir.to_path_buf(), ModulePath::root())];

        while let Some((dir, path)) = pending.pop() {
            let key = std::fs::canonicalize(&dir).unwrap_or_else(|_| dir.clone());
            if !visited.insert(key) {
                debug!("Already analyzed {}, skipping", dir.display());
                continue;
            }

            let module = HclModule::load_dir(&self.root, &dir, path)?;

            if self.config.analyzer.call_module_type == CallModuleType::Local {
                match module.module_calls() {
                    Ok(calls) => {
                        for call in calls.into_iter().filter(|c| c.is_local()).rev() {
                            let child_dir = normalize_path(&dir.join(&call.source));
                            if !child_dir.is_dir() {
                                warn!(
                                    "Module {} source {} is not a directory",
                                    call.name, call.source
                                );
                                continue;
                            }
                            if roots.contains(&child_dir) {
                                debug!("{} is analyzed as a root module", child_dir.display());
                                continue;
                            }
                            if self.should_exclude(&child_dir) {
                                debug!("Excluding: {}", child_dir.display());
                                continue;
                            }
                            pending.push((child_dir, module.path().child(&call.name)));
                        }
                    }
                    Err(e) => debug!("Not following module calls of {}: {}", module.path(), e),
                }
            }

            modules.push(module);
        }

        Ok(modules)
    }

    /// Discovers the directories analyzed as root modules.
    fn discover_root_dirs(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if !self.recursive {
            return Ok(vec![self.root.clone()]);
        }

        let walker = ignore::WalkBuilder::new(&self.root)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .build();

        let mut dirs = HashSet::new();
        for entry in walker {
            let entry = entry.map_err(std::io::Error::other)?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "tf") && path.is_file() {
                if let Some(parent) = path.parent() {
                    if self.should_exclude(parent) {
                        debug!("Excluding: {}", parent.display());
                        continue;
                    }
                    dirs.insert(parent.to_path_buf());
                }
            }
        }

        let mut dirs: Vec<PathBuf> = dirs.into_iter().collect();
        dirs.sort();
        Ok(dirs)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = self.display_path(path);
        let candidates = [path.to_string_lossy(), relative.to_string_lossy()];

        self.excludes.iter().any(|pattern| {
            candidates.iter().any(|c| {
                pattern.matches(c) || pattern.matches(&format!("{}/", c.trim_end_matches('/')))
            })
        })
    }

    fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}

/// Resolves `.` and `..` components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/modules/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.exclude_patterns().len(), 2);
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/work")
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/work/.terraform/modules/vpc")));
        assert!(analyzer.should_exclude(Path::new("/work/vendor/net")));
        assert!(!analyzer.should_exclude(Path::new("/work/modules/net")));
    }

    #[test]
    fn normalize_path_resolves_relative_sources() {
        assert_eq!(
            normalize_path(Path::new("/work/./modules/net")),
            PathBuf::from("/work/modules/net")
        );
        assert_eq!(
            normalize_path(Path::new("/work/env/../shared")),
            PathBuf::from("/work/shared")
        );
    }

    #[test]
    fn invalid_exclude_pattern_fails_build() {
        let result = Analyzer::builder().root(".").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }
}
