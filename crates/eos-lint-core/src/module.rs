//! Module access for rules.
//!
//! A [`Module`] is the unit rules check: a directory of `.tf` files that is
//! either the root module or a module called from it. [`HclModule`] is the
//! implementation backed by the tree-sitter HCL grammar.

use crate::parser::{self, Body};
use crate::schema::BodySchema;
use crate::syntax::ParseError;
use crate::types::{Pos, Range};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Address of a module relative to the root module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
    /// The root module.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true for the root module.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path of a module called from this one.
    #[must_use]
    pub fn child(&self, call_name: &str) -> Self {
        let mut steps = self.0.clone();
        steps.push(call_name.to_string());
        Self(steps)
    }

    /// Module call names from the root, outermost first.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for ModulePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return write!(f, "root");
        }
        let steps: Vec<String> = self.0.iter().map(|s| format!("module.{s}")).collect();
        write!(f, "{}", steps.join("."))
    }
}

/// A source file of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name used in ranges, relative to the analysis root.
    pub name: PathBuf,
    /// File contents.
    pub source: String,
}

impl SourceFile {
    /// Creates a new source file.
    #[must_use]
    pub fn new(name: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// A top-level block returned by a structural query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Block type keyword.
    pub kind: String,
    /// Positional labels (0, 1 or 2 of them).
    pub labels: Vec<String>,
    /// Range of the block header.
    pub def_range: Range,
}

/// A local value declared in a `locals` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    /// Local value name.
    pub name: String,
    /// Range of `name = expr`.
    pub def_range: Range,
}

/// A `module` block whose source is a local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCall {
    /// Call name (the block's label).
    pub name: String,
    /// The literal `source` value.
    pub source: String,
    /// Range of the block header.
    pub def_range: Range,
}

impl ModuleCall {
    /// Returns true if `source` points at a directory on disk.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.source.starts_with("./") || self.source.starts_with("../")
    }
}

/// Read access to one module, as seen by rules.
pub trait Module {
    /// Address of this module.
    fn path(&self) -> &ModulePath;

    /// Source files of this module, ordered by name.
    fn files(&self) -> &[SourceFile];

    /// Returns the top-level blocks matching `schema`, in file then source order.
    ///
    /// # Errors
    ///
    /// Fails if a file cannot be parsed, or if a requested block kind is
    /// declared with the wrong number of labels.
    fn content(&self, schema: &BodySchema) -> Result<Vec<RawBlock>, ParseError>;

    /// Returns every local value declared in the module, keyed by name.
    ///
    /// # Errors
    ///
    /// Fails if a file cannot be parsed or a local is declared twice.
    fn locals(&self) -> Result<HashMap<String, Local>, ParseError>;
}

/// A module backed by HCL source text.
#[derive(Debug)]
pub struct HclModule {
    path: ModulePath,
    dir: PathBuf,
    files: Vec<SourceFile>,
    unreadable: Vec<ParseError>,
    parsed: OnceLock<Result<Vec<Body>, ParseError>>,
}

impl HclModule {
    /// Creates a module from source files; files are sorted by name.
    #[must_use]
    pub fn new(path: ModulePath, dir: impl Into<PathBuf>, mut files: Vec<SourceFile>) -> Self {
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            path,
            dir: dir.into(),
            files,
            unreadable: Vec::new(),
            parsed: OnceLock::new(),
        }
    }

    /// Creates a root module from in-memory `(file name, source)` pairs.
    #[must_use]
    pub fn from_sources<I, N, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<PathBuf>,
        S: Into<String>,
    {
        let files = sources
            .into_iter()
            .map(|(name, source)| SourceFile::new(name, source))
            .collect();
        Self::new(ModulePath::root(), ".", files)
    }

    /// Loads every `*.tf` file directly inside `dir`.
    ///
    /// File names in ranges are made relative to `root`. A file that cannot
    /// be read or is not valid UTF-8 is left out of the module and reported
    /// by [`HclModule::unreadable_files`].
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be listed.
    pub fn load_dir(root: &Path, dir: &Path, path: ModulePath) -> std::io::Result<Self> {
        let pattern = format!("{}/*.tf", glob::Pattern::escape(&dir.to_string_lossy()));
        let entries = glob::glob(&pattern).map_err(std::io::Error::other)?;

        let mut files = Vec::new();
        let mut unreadable = Vec::new();
        for entry in entries {
            let file = entry.map_err(glob::GlobError::into_error)?;
            if !file.is_file() {
                continue;
            }
            let name = file
                .strip_prefix(root)
                .map_or_else(|_| file.clone(), Path::to_path_buf);
            match read_source(&file, &name) {
                Ok(source) => files.push(SourceFile::new(name, source)),
                Err(e) => {
                    tracing::warn!("{e}");
                    unreadable.push(e);
                }
            }
        }

        tracing::debug!("loaded {} files for {} from {}", files.len(), path, dir.display());
        let mut module = Self::new(path, dir, files);
        module.unreadable = unreadable;
        Ok(module)
    }

    /// Files of the module directory that could not be loaded.
    #[must_use]
    pub fn unreadable_files(&self) -> &[ParseError] {
        &self.unreadable
    }

    /// Returns a copy of this module with a different address.
    #[must_use]
    pub fn with_path(mut self, path: ModulePath) -> Self {
        self.path = path;
        self
    }

    /// Directory the module was loaded from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn bodies(&self) -> Result<&[Body], ParseError> {
        self.parsed
            .get_or_init(|| {
                self.files
                    .iter()
                    .map(|f| parser::parse(&f.source, &f.name))
                    .collect()
            })
            .as_deref()
            .map_err(Clone::clone)
    }

    /// Returns the `module` blocks whose source is a literal string.
    ///
    /// # Errors
    ///
    /// Fails if a file cannot be parsed.
    pub fn module_calls(&self) -> Result<Vec<ModuleCall>, ParseError> {
        let mut calls = Vec::new();
        for body in self.bodies()? {
            for block in body.blocks.iter().filter(|b| b.kind == "module") {
                let [name] = block.labels.as_slice() else {
                    continue;
                };
                let Some(source) = block.body.attribute("source").and_then(|a| a.value.clone())
                else {
                    continue;
                };
                calls.push(ModuleCall {
                    name: name.clone(),
                    source,
                    def_range: block.def_range.clone(),
                });
            }
        }
        Ok(calls)
    }
}

impl Module for HclModule {
    fn path(&self) -> &ModulePath {
        &self.path
    }

    fn files(&self) -> &[SourceFile] {
        &self.files
    }

    fn content(&self, schema: &BodySchema) -> Result<Vec<RawBlock>, ParseError> {
        let mut blocks = Vec::new();
        for body in self.bodies()? {
            for block in &body.blocks {
                let Some(wanted) = schema.find(&block.kind) else {
                    continue;
                };
                let expected = wanted.label_names.len();
                if block.labels.len() != expected {
                    return Err(label_count_error(block, &wanted.label_names));
                }
                blocks.push(RawBlock {
                    kind: block.kind.clone(),
                    labels: block.labels.clone(),
                    def_range: block.def_range.clone(),
                });
            }
        }
        Ok(blocks)
    }

    fn locals(&self) -> Result<HashMap<String, Local>, ParseError> {
        let mut locals: HashMap<String, Local> = HashMap::new();
        for body in self.bodies()? {
            for block in body.blocks.iter().filter(|b| b.kind == "locals") {
                if !block.labels.is_empty() {
                    return Err(label_count_error(block, &[]));
                }
                if let Some(nested) = block.body.blocks.first() {
                    return Err(ParseError::new(
                        &nested.def_range.file,
                        nested.def_range.start,
                        format!(
                            "Unsupported block type; blocks of type \"{}\" are not expected in locals",
                            nested.kind
                        ),
                    ));
                }
                for attr in &block.body.attributes {
                    if let Some(previous) = locals.get(&attr.name) {
                        return Err(ParseError::new(
                            &attr.range.file,
                            attr.range.start,
                            format!(
                                "Duplicate local value definition; a local value named \"{}\" was already defined at {}:{}",
                                attr.name,
                                previous.def_range.file.display(),
                                previous.def_range.start.line
                            ),
                        ));
                    }
                    locals.insert(
                        attr.name.clone(),
                        Local {
                            name: attr.name.clone(),
                            def_range: attr.range.clone(),
                        },
                    );
                }
            }
        }
        Ok(locals)
    }
}

fn read_source(file: &Path, name: &Path) -> Result<String, ParseError> {
    let bytes = std::fs::read(file)
        .map_err(|e| ParseError::new(name, Pos::INITIAL, format!("Failed to read file: {e}")))?;
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let prefix = String::from_utf8_lossy(valid);
        let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
        let pos = Pos::new(
            prefix.matches('\n').count() + 1,
            prefix[line_start..].chars().count() + 1,
            valid.len(),
        );
        ParseError::new(
            name,
            pos,
            "Invalid UTF-8 sequence; source files must be UTF-8 encoded",
        )
    })
}

fn label_count_error(block: &parser::Block, label_names: &[String]) -> ParseError {
    let expected = label_names.len();
    let message = if block.labels.len() < expected {
        format!(
            "Missing name for {kind}; all {kind} blocks must have {expected} labels ({names})",
            kind = block.kind,
            names = label_names.join(", ")
        )
    } else if expected == 0 {
        format!(
            "Extraneous label for {kind}; no labels are expected for {kind} blocks",
            kind = block.kind
        )
    } else {
        format!(
            "Extraneous label for {kind}; only {expected} labels ({names}) are expected for {kind} blocks",
            kind = block.kind,
            names = label_names.join(", ")
        )
    };
    ParseError::new(&block.def_range.file, block.def_range.start, message)
}
