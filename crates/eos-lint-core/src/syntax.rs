//! HCL syntax trees.
//!
//! Source files are parsed with the tree-sitter HCL grammar. [`scan`]
//! flattens a tree into its leaf tokens; [`crate::parse`] reads the block and
//! attribute skeleton from the same tree. Line comments (`#`, `//`) keep
//! their line terminator in [`Token::text`], matching how HCL itself reports
//! them; their range stops before it.

use crate::types::{Pos, Range};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Point, Tree};

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `# ...`, `// ...` or `/* ... */`.
    Comment,
    /// An identifier or block type keyword.
    Identifier,
    /// Part of a literal: numbers, template text, quote and heredoc markers.
    Literal,
    /// Operators, brackets and keywords such as `true`.
    Punctuation,
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Verbatim source text.
    pub text: String,
    /// Source range.
    pub range: Range,
}

impl Token {
    /// Returns true for comment tokens.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}

/// Error raised when a source file cannot be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}:{}:{}: {message}", .file.display(), .pos.line, .pos.column)]
pub struct ParseError {
    /// File the error occurred in.
    pub file: PathBuf,
    /// Position of the offending input.
    pub pos: Pos,
    /// Description of the problem.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, pos: Pos, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            pos,
            message: message.into(),
        }
    }
}

/// Lexes a whole source file into tokens, in source order.
///
/// # Errors
///
/// Returns a [`ParseError`] at the first syntax error of the file, such as
/// an unterminated string, comment or heredoc.
pub fn scan(source: &str, file: impl AsRef<Path>) -> Result<Vec<Token>, ParseError> {
    let file = file.as_ref();
    let tokens = SyntaxTree::parse(source, file)?.tokens();
    tracing::debug!("scanned {} tokens from {}", tokens.len(), file.display());
    Ok(tokens)
}

/// Lexes a source file and keeps only its comment tokens.
///
/// # Errors
///
/// Same as [`scan`].
pub fn scan_comments(source: &str, file: impl AsRef<Path>) -> Result<Vec<Token>, ParseError> {
    Ok(scan(source, file)?
        .into_iter()
        .filter(Token::is_comment)
        .collect())
}

/// A parsed, error-free source file.
pub(crate) struct SyntaxTree<'s> {
    source: &'s str,
    file: &'s Path,
    tree: Tree,
}

impl<'s> SyntaxTree<'s> {
    /// Parses `source`, rejecting trees that contain syntax errors.
    pub(crate) fn parse(source: &'s str, file: &'s Path) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_hcl::LANGUAGE.into())
            .map_err(|e| {
                ParseError::new(file, Pos::INITIAL, format!("Cannot load HCL grammar: {e}"))
            })?;

        // A byte order mark is not part of the grammar; blank it out without
        // moving any byte offsets.
        let text = match source.strip_prefix('\u{feff}') {
            Some(rest) => Cow::Owned(format!("   {rest}")),
            None => Cow::Borrowed(source),
        };
        let tree = parser
            .parse(text.as_bytes(), None)
            .ok_or_else(|| ParseError::new(file, Pos::INITIAL, "Parser produced no syntax tree"))?;

        let syntax = Self { source, file, tree };
        if let Some(node) = first_error(syntax.root()) {
            return Err(syntax.syntax_error(node));
        }
        Ok(syntax)
    }

    pub(crate) fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub(crate) fn text(&self, node: Node<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    pub(crate) fn range(&self, node: Node<'_>) -> Range {
        self.span(node, node)
    }

    /// Range from the start of `first` to the end of `last`.
    pub(crate) fn span(&self, first: Node<'_>, last: Node<'_>) -> Range {
        Range::new(
            self.file,
            self.pos(first.start_byte(), first.start_position()),
            self.pos(last.end_byte(), last.end_position()),
        )
    }

    pub(crate) fn error(&self, node: Node<'_>, message: impl Into<String>) -> ParseError {
        ParseError::new(
            self.file,
            self.pos(node.start_byte(), node.start_position()),
            message,
        )
    }

    /// Converts a tree-sitter point (byte column) to a character column.
    fn pos(&self, byte: usize, point: Point) -> Pos {
        let line_start = byte.saturating_sub(point.column);
        let column = self
            .source
            .get(line_start..byte)
            .map_or(point.column, |prefix| prefix.chars().count());
        Pos::new(point.row + 1, column + 1, byte)
    }

    fn syntax_error(&self, node: Node<'_>) -> ParseError {
        if node.is_missing() {
            return self.error(node, format!("Missing {}", node.kind()));
        }
        let snippet: String = self
            .text(node)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(20)
            .collect();
        if snippet.is_empty() {
            self.error(node, "Invalid syntax")
        } else {
            self.error(node, format!("Invalid syntax near \"{snippet}\""))
        }
    }

    /// Collects the leaf nodes of the tree as tokens.
    fn tokens(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if node.child_count() == 0 || node.kind() == "comment" {
                if node.end_byte() > node.start_byte() {
                    tokens.push(self.token(node));
                }
            } else if cursor.goto_first_child() {
                continue;
            }

            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return tokens;
                }
            }
        }
    }

    fn token(&self, node: Node<'_>) -> Token {
        let kind = match node.kind() {
            "comment" => TokenKind::Comment,
            "identifier" => TokenKind::Identifier,
            _ if node.is_named() => TokenKind::Literal,
            _ => TokenKind::Punctuation,
        };
        let raw = self.text(node);
        if kind != TokenKind::Comment || raw.starts_with("/*") {
            return Token {
                kind,
                text: raw.to_string(),
                range: self.range(node),
            };
        }

        let body = raw.trim_end_matches(['\r', '\n']);
        let end = node.start_byte() + body.len();
        let after = self.source.get(end..).unwrap_or("");
        let terminator = if after.starts_with("\r\n") {
            "\r\n"
        } else if after.starts_with('\n') {
            "\n"
        } else {
            ""
        };

        let start = self.pos(node.start_byte(), node.start_position());
        let stop = Pos::new(start.line, start.column + body.chars().count(), end);
        Token {
            kind,
            text: format!("{body}{terminator}"),
            range: Range::new(self.file, start, stop),
        }
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found.or(Some(node))
}
