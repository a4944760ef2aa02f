//! Rule to flag Hungarian notation in names.
//!
//! # Configuration
//!
//! - `tags` (alias `defaults`): replaces the default tag list
//!   `str, int, num, bool, list, lst, set, map, arr, array`
//! - `more`: tags appended to the list in effect
//! - `level`: severity level (default: "warning")

use eos_lint_core::{
    lintable_blocks, walk, BlockDefinition, CheckError, ConfigError, IssueSink, Module,
    NamingCheck, NormalizedEntry, Rule, RuleConfig, Severity,
};
use serde::Deserialize;

/// Rule code for eos_hungarian.
pub const CODE: &str = "EOS002";

/// Rule name for eos_hungarian.
pub const NAME: &str = "eos_hungarian";

/// Type tags flagged when no `tags` option is configured.
pub const DEFAULT_TAGS: &[&str] = &[
    "str", "int", "num", "bool", "list", "lst", "set", "map", "arr", "array",
];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    #[serde(default, alias = "defaults")]
    tags: Option<Vec<String>>,
    #[serde(default)]
    more: Vec<String>,
}

/// Flags names that carry a type tag as a prefix, a suffix or an
/// underscore-separated part.
#[derive(Debug, Clone)]
pub struct Hungarian {
    tags: Vec<String>,
    definitions: Vec<BlockDefinition>,
    severity: Severity,
}

impl Default for Hungarian {
    fn default() -> Self {
        Self::new()
    }
}

impl Hungarian {
    /// Creates a new rule with the default tags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tags: DEFAULT_TAGS.iter().map(|t| (*t).to_string()).collect(),
            definitions: lintable_blocks(),
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
        if let Some(tags) = options.tags.filter(|t| !t.is_empty()) {
            rule = rule.tags(tags);
        }
        Ok(rule.more(options.more))
    }

    /// Replaces the tag list.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Appends tags to the list.
    #[must_use]
    pub fn more<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn level(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl NamingCheck for Hungarian {
    fn evaluate(&self, entry: &NormalizedEntry) -> Vec<String> {
        let name = &entry.name;
        self.tags
            .iter()
            .filter(|tag| !tag.is_empty())
            .find(|tag| {
                name.starts_with(tag.as_str())
                    || name.ends_with(tag.as_str())
                    || name.contains(&format!("_{tag}"))
            })
            .map(|tag| vec![format!("'{name}' uses Hungarian notation with '{tag}'.")])
            .unwrap_or_default()
    }
}

impl Rule for Hungarian {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids type tags in names"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, module: &dyn Module, sink: &mut IssueSink<'_>) -> Result<(), CheckError> {
        walk(module, &self.definitions, self, sink).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::check_source;
    use eos_lint_core::{Pos, Range};

    fn evaluate(rule: &Hungarian, name: &str) -> Vec<String> {
        rule.evaluate(&NormalizedEntry {
            kind: "variable".to_string(),
            name: name.to_string(),
            synonym: String::new(),
            range: Range::new("main.tf", Pos::INITIAL, Pos::INITIAL),
        })
    }

    #[test]
    fn test_prefix_suffix_and_infix() {
        let rule = Hungarian::new();
        assert_eq!(
            evaluate(&rule, "str_name"),
            vec!["'str_name' uses Hungarian notation with 'str'."]
        );
        assert_eq!(evaluate(&rule, "names_list").len(), 1);
        assert_eq!(evaluate(&rule, "my_bool_flag").len(), 1);
        assert!(evaluate(&rule, "region").is_empty());
    }

    #[test]
    fn test_first_tag_in_list_order_is_reported() {
        // Both "map" and "arr" match; "map" comes first in the defaults.
        assert_eq!(
            evaluate(&Hungarian::new(), "arr_of_map"),
            vec!["'arr_of_map' uses Hungarian notation with 'map'."]
        );
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(evaluate(&Hungarian::new(), "Str_Name").is_empty());
    }

    #[test]
    fn test_tags_replace_and_more_appends() {
        let rule = Hungarian::new().tags(["obj"]).more(["dict"]);
        assert!(evaluate(&rule, "str_name").is_empty());
        assert_eq!(evaluate(&rule, "obj_name").len(), 1);
        assert_eq!(evaluate(&rule, "name_dict").len(), 1);
    }

    #[test]
    fn test_from_config_accepts_defaults_alias() {
        let config = RuleConfig::default()
            .option("defaults", vec!["obj"])
            .option("more", vec!["dict"]);
        let rule = Hungarian::from_config(&config).expect("config");
        assert_eq!(rule.tags, vec!["obj", "dict"]);
    }

    #[test]
    fn test_local_is_checked() {
        let issues = check_source(&Hungarian::new(), "locals {\n  str_hung = \"x\"\n}\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "'str_hung' uses Hungarian notation with 'str'."
        );
        assert_eq!(issues[0].range.start, Pos::new(2, 3, 11));
    }
}
