//! Block walking for naming rules.
//!
//! The walker asks a module for every lintable top-level block, turns each
//! into a uniform `(kind, name, synonym)` entry, recovers `locals`
//! attributes the structural query cannot see, and hands every entry to a
//! [`NamingCheck`]. Each message the check returns becomes an issue at the
//! entry's range.

use crate::context::IssueSink;
use crate::module::{Module, RawBlock};
use crate::rule::CheckError;
use crate::schema::{build_block_schemas, BlockDefinition};
use crate::types::Range;
use tracing::debug;

/// Kind given to entries recovered from `locals` blocks.
pub const LOCAL_KIND: &str = "local";

/// A declared name in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    /// The type token: a resource type, or the block keyword.
    pub kind: String,
    /// The human-chosen identifier; empty for unlabeled blocks.
    pub name: String,
    /// Synonym registered for `kind`, or empty.
    pub synonym: String,
    /// Range issues for this entry are reported at.
    pub range: Range,
}

/// A naming heuristic applied to each walked entry.
pub trait NamingCheck {
    /// Returns one message per problem found with `entry`.
    fn evaluate(&self, entry: &NormalizedEntry) -> Vec<String>;
}

/// Canonicalizes a raw block.
///
/// With two labels the first is the kind and the second the name; with one
/// label the keyword is the kind; with none the name is empty. The synonym
/// is taken from the first definition of the resolved kind that has one.
#[must_use]
pub fn normalize_block(block: &RawBlock, definitions: &[BlockDefinition]) -> NormalizedEntry {
    let (kind, name) = match block.labels.as_slice() {
        [kind, name, ..] => (kind.clone(), name.clone()),
        [name] => (block.kind.clone(), name.clone()),
        [] => (block.kind.clone(), String::new()),
    };

    let synonym = definitions
        .iter()
        .filter(|def| def.kind == kind)
        .find_map(|def| def.synonym.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string();

    NormalizedEntry {
        kind,
        name,
        synonym,
        range: block.def_range.clone(),
    }
}

/// Walks every lintable block and local of `module` through `check`.
///
/// Blocks are visited in file name order, then source order; locals follow
/// in source order. Returns the number of entries evaluated.
///
/// # Errors
///
/// Returns [`CheckError::Parse`] if the block query fails and
/// [`CheckError::LocalRecovery`] if locals cannot be recovered. Issues
/// emitted before the failure are kept.
pub fn walk(
    module: &dyn Module,
    definitions: &[BlockDefinition],
    check: &dyn NamingCheck,
    sink: &mut IssueSink<'_>,
) -> Result<usize, CheckError> {
    let schema = build_block_schemas(definitions);
    let blocks = module.content(&schema)?;
    debug!("walking {} blocks in {}", blocks.len(), module.path());

    let mut evaluated = 0;
    for block in &blocks {
        let entry = normalize_block(block, definitions);
        debug!("evaluating {} '{}'", entry.kind, entry.name);
        evaluate(&entry, check, sink);
        evaluated += 1;
    }

    let locals = module.locals().map_err(CheckError::LocalRecovery)?;
    let mut locals: Vec<_> = locals.into_values().collect();
    locals.sort_by(|a, b| {
        a.def_range
            .file
            .cmp(&b.def_range.file)
            .then(a.def_range.start.byte.cmp(&b.def_range.start.byte))
    });
    debug!("walking {} locals in {}", locals.len(), module.path());

    for local in locals {
        let entry = NormalizedEntry {
            kind: LOCAL_KIND.to_string(),
            name: local.name,
            synonym: String::new(),
            range: local.def_range,
        };
        debug!("evaluating local '{}'", entry.name);
        evaluate(&entry, check, sink);
        evaluated += 1;
    }

    Ok(evaluated)
}

fn evaluate(entry: &NormalizedEntry, check: &dyn NamingCheck, sink: &mut IssueSink<'_>) {
    for message in check.evaluate(entry) {
        sink.emit(message, entry.range.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::HclModule;
    use crate::rule::Rule;
    use crate::schema::lintable_blocks;
    use crate::types::{Pos, Severity};
    use std::sync::Mutex;

    fn raw(kind: &str, labels: &[&str]) -> RawBlock {
        RawBlock {
            kind: kind.to_string(),
            labels: labels.iter().map(|s| (*s).to_string()).collect(),
            def_range: Range::new("main.tf", Pos::INITIAL, Pos::new(1, 10, 9)),
        }
    }

    /// Records every entry and flags names containing "bad".
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<NormalizedEntry>>,
    }

    impl NamingCheck for Recorder {
        fn evaluate(&self, entry: &NormalizedEntry) -> Vec<String> {
            self.seen.lock().expect("lock").push(entry.clone());
            if entry.name.contains("bad") {
                vec![format!("'{}' is bad.", entry.name)]
            } else {
                Vec::new()
            }
        }
    }

    impl Rule for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn severity(&self) -> Severity {
            Severity::Warning
        }
        fn check(&self, module: &dyn Module, sink: &mut IssueSink<'_>) -> Result<(), CheckError> {
            walk(module, &lintable_blocks(), self, sink).map(|_| ())
        }
    }

    #[test]
    fn normalize_two_labels() {
        let entry = normalize_block(&raw("resource", &["aws_instance", "web"]), &lintable_blocks());
        assert_eq!(entry.kind, "aws_instance");
        assert_eq!(entry.name, "web");
        assert_eq!(entry.synonym, "");
    }

    #[test]
    fn normalize_one_and_zero_labels() {
        let entry = normalize_block(&raw("variable", &["region"]), &[]);
        assert_eq!((entry.kind.as_str(), entry.name.as_str()), ("variable", "region"));

        let entry = normalize_block(&raw("terraform", &[]), &[]);
        assert_eq!((entry.kind.as_str(), entry.name.as_str()), ("terraform", ""));
    }

    #[test]
    fn normalize_picks_first_non_empty_synonym() {
        let defs = vec![
            BlockDefinition::new("aws_instance", &["type", "name"]).with_synonym(""),
            BlockDefinition::new("aws_instance", &["type", "name"]).with_synonym("vm"),
            BlockDefinition::new("aws_instance", &["type", "name"]).with_synonym("server"),
        ];
        let entry = normalize_block(&raw("resource", &["aws_instance", "web"]), &defs);
        assert_eq!(entry.synonym, "vm");
    }

    #[test]
    fn walk_visits_blocks_then_locals() {
        let module = HclModule::from_sources([
            (
                "main.tf",
                "locals {\n  bad_local = 1\n  fine = 2\n}\nresource \"aws_instance\" \"bad_web\" {}\n",
            ),
            ("b.tf", "variable \"region\" {}\nprovider \"aws\" {}\n"),
        ]);
        let recorder = Recorder::default();
        let mut issues = Vec::new();
        let mut sink = IssueSink::new(&recorder, &mut issues);

        let count = walk(&module, &lintable_blocks(), &recorder, &mut sink).expect("walk");
        assert_eq!(count, 4);

        let seen = recorder.seen.lock().expect("lock");
        let names: Vec<&str> = seen.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["region", "bad_web", "bad_local", "fine"]);
        assert_eq!(seen[2].kind, LOCAL_KIND);

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].message, "'bad_web' is bad.");
        assert_eq!(issues[1].range.start.line, 2);
    }

    #[test]
    fn local_failure_keeps_block_issues() {
        let module = HclModule::from_sources([(
            "main.tf",
            "resource \"a\" \"bad\" {}\nlocals {\n  x = 1\n}\nlocals {\n  x = 2\n}\n",
        )]);
        let recorder = Recorder::default();
        let mut issues = Vec::new();
        let mut sink = IssueSink::new(&recorder, &mut issues);

        let err = recorder.check(&module, &mut sink).unwrap_err();
        assert!(matches!(err, CheckError::LocalRecovery(_)));
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn query_failure_is_a_parse_error() {
        let module = HclModule::from_sources([("main.tf", "resource \"a\" {}\n")]);
        let recorder = Recorder::default();
        let mut issues = Vec::new();
        let mut sink = IssueSink::new(&recorder, &mut issues);

        let err = recorder.check(&module, &mut sink).unwrap_err();
        assert!(matches!(err, CheckError::Parse(_)));
        assert!(issues.is_empty());
    }
}
