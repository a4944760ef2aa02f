//! Rule trait for defining lint rules.

use crate::context::IssueSink;
use crate::syntax::ParseError;
use crate::module::Module;
use crate::types::Severity;

/// A lint rule run once per module.
///
/// Rules are constructed from configuration and are immutable afterwards.
/// A check reads the module through the [`Module`] trait and reports
/// through the [`IssueSink`], which stamps each issue with this rule's
/// identity and severity.
///
/// # Example
///
/// ```ignore
/// use eos_lint_core::{CheckError, IssueSink, Module, Rule, Severity};
///
/// pub struct NoEmptyModules;
///
/// impl Rule for NoEmptyModules {
///     fn name(&self) -> &'static str { "no_empty_modules" }
///     fn code(&self) -> &'static str { "EOS100" }
///     fn severity(&self) -> Severity { Severity::Warning }
///
///     fn check(&self, module: &dyn Module, sink: &mut IssueSink<'_>) -> Result<(), CheckError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the snake_case name of this rule (e.g., "eos_shout").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "EOS003").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Whether the rule runs when the configuration does not mention it.
    fn enabled_by_default(&self) -> bool {
        true
    }

    /// Returns the severity issues from this rule are reported at.
    fn severity(&self) -> Severity;

    /// Checks a module, emitting issues into `sink`.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckError`] if the module cannot be read. Issues emitted
    /// before the failure stay in the sink.
    fn check(&self, module: &dyn Module, sink: &mut IssueSink<'_>) -> Result<(), CheckError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Errors that abort one rule's check of one module.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CheckError {
    /// The module's files could not be parsed or queried.
    #[error("failed to read module content: {0}")]
    Parse(#[from] ParseError),

    /// The module's local values could not be recovered.
    #[error("failed to recover local values: {0}")]
    LocalRecovery(#[source] ParseError),
}
