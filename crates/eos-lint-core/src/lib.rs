//! # eos-lint-core
//!
//! Core framework for style linting of Terraform/HCL modules.
//!
//! This crate provides the foundational traits and types for building
//! naming and comment-style rules. It includes:
//!
//! - [`scan`] and [`parse`], tree-sitter based tokens and structure of HCL files
//! - [`Module`] and [`HclModule`] for structural queries over a module
//! - [`walk`], which feeds every declared name to a [`NamingCheck`]
//! - [`Rule`] trait and [`IssueSink`] for reporting
//! - [`Analyzer`] for orchestrating lint execution
//!
//! ## Example
//!
//! ```ignore
//! use eos_lint_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./infra")
//!     .config(Config::default())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod module;
mod parser;
mod rule;
mod schema;
mod syntax;
mod types;
mod walker;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, CallModuleType, Config, ConfigError, RuleConfig, DEFAULT_LEVEL};
pub use context::IssueSink;
pub use syntax::{scan, scan_comments, ParseError, Token, TokenKind};
pub use module::{HclModule, Local, Module, ModuleCall, ModulePath, RawBlock, SourceFile};
pub use parser::{parse, Attribute, Block, Body};
pub use rule::{CheckError, Rule, RuleBox};
pub use schema::{build_block_schemas, lintable_blocks, BlockDefinition, BlockSchema, BodySchema};
pub use types::{
    resolve_severity, CheckFailure, Issue, IssueDiagnostic, LintResult, Pos, Range, Severity,
};
pub use walker::{normalize_block, walk, NamingCheck, NormalizedEntry, LOCAL_KIND};
