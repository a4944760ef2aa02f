//! Rule presets and configuration-driven rule construction.

use crate::{comments, hungarian, length, reminder, shout, type_echo};
use crate::{Comments, Hungarian, Length, Reminder, Shout, TypeEcho};
use eos_lint_core::{Config, ConfigError, RuleBox, RuleConfig};
use std::str::FromStr;
use tracing::{debug, warn};

/// Preset configurations for eos-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every rule.
    Recommended,
    /// The four block naming rules.
    Naming,
    /// The two comment rules.
    Comments,
}

impl Preset {
    /// Returns the names of the rules in this preset.
    #[must_use]
    pub fn rule_names(self) -> &'static [&'static str] {
        match self {
            Self::Recommended => &[
                type_echo::NAME,
                hungarian::NAME,
                shout::NAME,
                length::NAME,
                reminder::NAME,
                comments::NAME,
            ],
            Self::Naming => &[type_echo::NAME, hungarian::NAME, shout::NAME, length::NAME],
            Self::Comments => &[reminder::NAME, comments::NAME],
        }
    }

    /// Returns the rules for this preset with default settings.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        all_rules()
            .into_iter()
            .filter(|r| self.rule_names().contains(&r.name()))
            .collect()
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "naming" => Ok(Self::Naming),
            "comments" => Ok(Self::Comments),
            _ => Err(ConfigError::UnknownPreset {
                name: s.to_string(),
            }),
        }
    }
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(TypeEcho::new()),
        Box::new(Hungarian::new()),
        Box::new(Shout::new()),
        Box::new(Length::new()),
        Box::new(Reminder::new()),
        Box::new(Comments::new()),
    ]
}

/// Builds one rule from its configuration block.
///
/// Returns `Ok(None)` for names that are not rules of this crate.
///
/// # Errors
///
/// Returns [`ConfigError::Decode`] if the rule's options are invalid.
pub fn rule_from_config(name: &str, config: &RuleConfig) -> Result<Option<RuleBox>, ConfigError> {
    let rule: RuleBox = match name {
        type_echo::NAME => Box::new(TypeEcho::from_config(config)?),
        hungarian::NAME => Box::new(Hungarian::from_config(config)?),
        shout::NAME => Box::new(Shout::from_config(config)?),
        length::NAME => Box::new(Length::from_config(config)?),
        reminder::NAME => Box::new(Reminder::from_config(config)?),
        comments::NAME => Box::new(Comments::from_config(config)?),
        _ => return Ok(None),
    };
    Ok(Some(rule))
}

/// Builds the rule set a configuration asks for.
///
/// Starts from the configured preset (`recommended` when unset), adds rules
/// explicitly enabled in `[rules.*]`, drops rules explicitly disabled, and
/// decodes every remaining rule's options.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] for an unknown preset and
/// [`ConfigError::Decode`] for invalid rule options.
pub fn configured_rules(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let preset = config
        .preset
        .as_deref()
        .map_or(Ok(Preset::Recommended), Preset::from_str)?;

    let default_config = RuleConfig::default();
    let mut rules = Vec::new();
    for rule in all_rules() {
        let name = rule.name();
        let in_preset = preset.rule_names().contains(&name);
        if !config.is_rule_enabled(name, in_preset && rule.enabled_by_default()) {
            debug!("Rule {name} is not enabled");
            continue;
        }
        let rule_config = config.rule_config(name).unwrap_or(&default_config);
        if let Some(rule) = rule_from_config(name, rule_config)? {
            rules.push(rule);
        }
    }

    let known = Preset::Recommended.rule_names();
    for name in config.rules.keys() {
        if !known.contains(&name.as_str()) {
            warn!("Unknown rule in configuration: {name}");
        }
    }

    Ok(rules)
}
