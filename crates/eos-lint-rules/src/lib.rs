//! # eos-lint-rules
//!
//! Built-in elements-of-style rules for eos-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | EOS001 | `eos_type_echo` | Forbids names that repeat their block type |
//! | EOS002 | `eos_hungarian` | Forbids type tags such as `str_` in names |
//! | EOS003 | `eos_shout` | Forbids all-uppercase names |
//! | EOS004 | `eos_length` | Limits the length of names |
//! | EOS005 | `eos_reminder` | Flags `TODO`-style tags in comments |
//! | EOS006 | `eos_comments` | Enforces comment formatting |
//!
//! The first four check every `variable`, `check`, `data`, `ephemeral`,
//! `module`, `output` and `resource` block plus every local value. The comment
//! rules only check root modules.
//!
//! ## Usage
//!
//! ```ignore
//! use eos_lint_core::{Analyzer, Config};
//! use eos_lint_rules::configured_rules;
//!
//! let config = Config::from_file("eos-lint.toml".as_ref())?;
//! let analyzer = Analyzer::builder()
//!     .rules(configured_rules(&config)?)
//!     .config(config)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod comments;
pub mod hungarian;
pub mod length;
mod presets;
pub mod reminder;
pub mod shout;
pub mod type_echo;

pub use comments::Comments;
pub use hungarian::Hungarian;
pub use length::Length;
pub use presets::{all_rules, configured_rules, rule_from_config, Preset};
pub use reminder::Reminder;
pub use shout::Shout;
pub use type_echo::TypeEcho;

/// Re-export core types for convenience.
pub use eos_lint_core::{Issue, Rule, Severity};
