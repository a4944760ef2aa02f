//! Locates the configuration file for a run.
//!
//! Lookup order, first hit wins:
//!
//! 1. the `--config` flag (or `$EOS_LINT_CONFIG`), taken as-is
//! 2. `eos-lint.toml`, then `.eos-lint.toml`, in the checked directory
//! 3. `config.toml` in the global directory (`$EOS_LINT_CONFIG_DIR`, else `~/.eos-lint`)
//! 4. built-in defaults

use anyhow::{Context, Result};
use eos_lint_core::Config;
use std::path::{Path, PathBuf};

/// Candidate names in the checked directory.
const PROJECT_FILES: &[&str] = &["eos-lint.toml", ".eos-lint.toml"];

/// File looked up inside the global directory.
const GLOBAL_FILE: &str = "config.toml";

/// Outcome of configuration lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line.
    Flag(PathBuf),
    /// Next to the modules being checked.
    Project(PathBuf),
    /// From the per-user directory.
    Global(PathBuf),
    /// Nothing found.
    Builtin,
}

impl ConfigSource {
    /// File backing this source; `None` for built-in defaults.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Flag(file) | Self::Project(file) | Self::Global(file) => Some(file),
            Self::Builtin => None,
        }
    }

    /// Reads and parses the configuration.
    pub fn load(&self) -> Result<Config> {
        let Some(file) = self.path() else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };
        if let Self::Global(_) = self {
            tracing::info!("Using global config: {}", file.display());
        }
        Config::from_file(file).with_context(|| format!("Failed to load config: {}", file.display()))
    }
}

/// Looks up the configuration for a check of `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, flag: Option<&Path>) -> ConfigSource {
    lookup(project_dir, flag, global_config_dir().as_deref())
}

fn lookup(project_dir: &Path, flag: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(file) = flag {
        return ConfigSource::Flag(file.to_path_buf());
    }

    if let Some(file) = PROJECT_FILES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|file| file.is_file())
    {
        tracing::debug!("Config from project: {}", file.display());
        return ConfigSource::Project(file);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_FILE)) {
        Some(file) if file.is_file() => {
            tracing::debug!("Config from global directory: {}", file.display());
            ConfigSource::Global(file)
        }
        _ => ConfigSource::Builtin,
    }
}

/// Per-user configuration directory: `$EOS_LINT_CONFIG_DIR`, else `~/.eos-lint`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os("EOS_LINT_CONFIG_DIR") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|home| home.join(".eos-lint")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, content: &str) -> PathBuf {
        let file = dir.join(name);
        fs::write(&file, content).expect("write config");
        file
    }

    #[test]
    fn flag_wins_even_over_project_file() {
        let dir = TempDir::new().expect("temp dir");
        let custom = touch(dir.path(), "custom.toml", "");
        touch(dir.path(), "eos-lint.toml", "");

        assert_eq!(
            lookup(dir.path(), Some(custom.as_path()), None),
            ConfigSource::Flag(custom)
        );
    }

    #[test]
    fn flagged_file_must_exist_when_loaded() {
        let source = lookup(
            Path::new("/tmp"),
            Some(Path::new("/nonexistent/eos-lint.toml")),
            None,
        );
        assert!(source.load().is_err());
    }

    #[test]
    fn project_files_are_tried_in_order() {
        let dir = TempDir::new().expect("temp dir");
        let dotted = touch(dir.path(), ".eos-lint.toml", "");
        assert_eq!(
            lookup(dir.path(), None, None),
            ConfigSource::Project(dotted)
        );

        let plain = touch(dir.path(), "eos-lint.toml", "");
        assert_eq!(lookup(dir.path(), None, None), ConfigSource::Project(plain));
    }

    #[test]
    fn global_file_is_the_fallback() {
        let project = TempDir::new().expect("temp dir");
        let global = TempDir::new().expect("temp dir");
        let file = touch(global.path(), "config.toml", "preset = \"naming\"\n");

        let source = lookup(project.path(), None, Some(global.path()));
        assert_eq!(source, ConfigSource::Global(file));
        let config = source.load().expect("global config should load");
        assert_eq!(config.preset.as_deref(), Some("naming"));
    }

    #[test]
    fn project_file_shadows_global_file() {
        let project = TempDir::new().expect("temp dir");
        let global = TempDir::new().expect("temp dir");
        touch(project.path(), "eos-lint.toml", "");
        touch(global.path(), "config.toml", "");

        assert!(matches!(
            lookup(project.path(), None, Some(global.path())),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn builtin_defaults_when_nothing_found() {
        let project = TempDir::new().expect("temp dir");
        let global = TempDir::new().expect("temp dir");

        let source = lookup(project.path(), None, Some(global.path()));
        assert_eq!(source, ConfigSource::Builtin);
        assert!(source.path().is_none());
        assert!(source.load().expect("defaults").preset.is_none());
    }
}
