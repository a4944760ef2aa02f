//! Structural reader for HCL bodies.
//!
//! Recovers the block/attribute skeleton of a file from its syntax tree:
//! block types, labels, definition ranges and attribute names. Expressions
//! are not evaluated; only plain literal strings keep a value.

use crate::syntax::{ParseError, SyntaxTree};
use crate::types::Range;
use std::path::Path;
use tree_sitter::Node;

/// A body: the contents of a file or of a block's braces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Nested blocks in source order.
    pub blocks: Vec<Block>,
}

impl Body {
    /// Returns the first attribute with the given name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A block such as `resource "aws_instance" "web" { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The block type keyword.
    pub kind: String,
    /// Labels in order, unquoted.
    pub labels: Vec<String>,
    /// Range of the header: type keyword through the last label.
    pub def_range: Range,
    /// Block contents.
    pub body: Body,
}

/// An attribute such as `name = expr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Range of `name = expr`.
    pub range: Range,
    /// Value when the expression is a single literal string.
    pub value: Option<String>,
}

/// Parses a file into its top-level body.
///
/// # Errors
///
/// Returns a [`ParseError`] at the first syntax error of the file.
pub fn parse(source: &str, file: &Path) -> Result<Body, ParseError> {
    let syntax = SyntaxTree::parse(source, file)?;
    let root = syntax.root();
    let mut cursor = root.walk();
    let body = root.named_children(&mut cursor).find(|n| n.kind() == "body");
    match body {
        Some(node) => read_body(&syntax, node),
        None => Ok(Body::default()),
    }
}

fn read_body(syntax: &SyntaxTree<'_>, node: Node<'_>) -> Result<Body, ParseError> {
    let mut body = Body::default();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "attribute" => body.attributes.push(read_attribute(syntax, child)?),
            "block" => body.blocks.push(read_block(syntax, child)?),
            _ => {}
        }
    }
    Ok(body)
}

fn read_block(syntax: &SyntaxTree<'_>, node: Node<'_>) -> Result<Block, ParseError> {
    let mut keyword = None;
    let mut last = None;
    let mut labels = Vec::new();
    let mut body = Body::default();

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "identifier" if keyword.is_none() => keyword = Some(child),
            "identifier" => {
                labels.push(syntax.text(child).to_string());
                last = Some(child);
            }
            "string_lit" => {
                let label = literal_string(syntax, child).ok_or_else(|| {
                    syntax.error(
                        child,
                        "Invalid block label: template sequences are not allowed",
                    )
                })?;
                labels.push(label);
                last = Some(child);
            }
            "body" => body = read_body(syntax, child)?,
            _ => {}
        }
    }

    let keyword = keyword.ok_or_else(|| syntax.error(node, "Block definition without a type"))?;
    Ok(Block {
        kind: syntax.text(keyword).to_string(),
        labels,
        def_range: syntax.span(keyword, last.unwrap_or(keyword)),
        body,
    })
}

fn read_attribute(syntax: &SyntaxTree<'_>, node: Node<'_>) -> Result<Attribute, ParseError> {
    let mut cursor = node.walk();
    let mut parts = node
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment");
    let name = parts
        .next()
        .filter(|n| n.kind() == "identifier")
        .ok_or_else(|| syntax.error(node, "Attribute name required"))?;
    let value = parts.next().and_then(|expr| literal_string(syntax, expr));
    Ok(Attribute {
        name: syntax.text(name).to_string(),
        range: syntax.range(node),
        value,
    })
}

/// Value of an expression that is nothing but a quoted string without
/// interpolations or directives.
fn literal_string(syntax: &SyntaxTree<'_>, node: Node<'_>) -> Option<String> {
    let mut node = node;
    while !matches!(node.kind(), "string_lit" | "quoted_template") {
        if node.named_child_count() != 1 {
            return None;
        }
        node = node.named_child(0)?;
    }

    let mut value = String::new();
    let mut cursor = node.walk();
    for part in node.named_children(&mut cursor) {
        match part.kind() {
            "quoted_template_start" | "quoted_template_end" => {}
            "template_literal" => value.push_str(&unescape(syntax.text(part))),
            _ => return None,
        }
    }
    Some(value)
}

fn unescape(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value.replace("$${", "${").replace("%%{", "%{")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pos;

    fn parse_ok(src: &str) -> Body {
        parse(src, Path::new("main.tf")).expect("source should parse")
    }

    #[test]
    fn parses_block_headers_and_ranges() {
        let body = parse_ok("variable \"variable_echo\" {\n  type = string\n}\n");
        assert_eq!(body.blocks.len(), 1);
        let block = &body.blocks[0];
        assert_eq!(block.kind, "variable");
        assert_eq!(block.labels, vec!["variable_echo"]);
        assert_eq!(block.def_range.start, Pos::new(1, 1, 0));
        assert_eq!(block.def_range.end, Pos::new(1, 25, 24));
        assert_eq!(block.body.attributes[0].name, "type");
    }

    #[test]
    fn parses_two_labels_and_identifier_labels() {
        let body = parse_ok("resource aws_instance web {}\ndata \"a\" \"b\" {}\n");
        assert_eq!(body.blocks[0].labels, vec!["aws_instance", "web"]);
        assert_eq!(body.blocks[1].labels, vec!["a", "b"]);
    }

    #[test]
    fn attribute_range_covers_expression() {
        let body = parse_ok("locals {\n  local_echo = 1\n}\n");
        let attr = &body.blocks[0].body.attributes[0];
        assert_eq!(attr.name, "local_echo");
        assert_eq!(attr.range.start, Pos::new(2, 3, 11));
        assert_eq!(attr.range.end.column, 17);
    }

    #[test]
    fn multi_line_expressions() {
        let src = "locals {\n  tags = {\n    a = \"}\" # brace in string\n    b = [1,\n 2]\n  }\n  next = \"x\"\n}\n";
        let body = parse_ok(src);
        let attrs = &body.blocks[0].body.attributes;
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].range.end.line, 6);
        assert!(attrs[0].value.is_none());
        assert_eq!(attrs[1].name, "next");
        assert_eq!(attrs[1].value.as_deref(), Some("x"));
    }

    #[test]
    fn string_values() {
        let body = parse_ok(
            "a = \"./modules/net\"\nb = \"x\\\"y\"\nc = \"$${raw}\"\nd = \"${var.x}\"\ne = \"\"\n",
        );
        let value = |name: &str| body.attribute(name).and_then(|a| a.value.clone());
        assert_eq!(value("a").as_deref(), Some("./modules/net"));
        assert_eq!(value("b").as_deref(), Some("x\"y"));
        assert_eq!(value("c").as_deref(), Some("${raw}"));
        assert_eq!(value("d"), None);
        assert_eq!(value("e").as_deref(), Some(""));
    }

    #[test]
    fn nested_blocks() {
        let body = parse_ok("check \"c\" {\n  assert {\n    condition = true\n  }\n}\n");
        let nested = &body.blocks[0].body.blocks[0];
        assert_eq!(nested.kind, "assert");
        assert_eq!(nested.body.attributes[0].name, "condition");
    }

    #[test]
    fn comments_between_tokens_are_ignored() {
        let body = parse_ok("# lead\nresource /* t */ \"a\" \"b\" { # trailing\n  x = 1 // c\n}\n");
        assert_eq!(body.blocks[0].labels, vec!["a", "b"]);
        assert_eq!(body.blocks[0].body.attributes.len(), 1);
    }

    #[test]
    fn empty_file_has_empty_body() {
        assert_eq!(parse_ok(""), Body::default());
        assert_eq!(parse_ok("# only a comment\n"), Body::default());
    }

    #[test]
    fn unclosed_block_is_an_error() {
        let err = parse("resource \"a\" \"b\" {\n", Path::new("x.tf")).unwrap_err();
        assert_eq!(err.file, Path::new("x.tf"));
    }

    #[test]
    fn missing_brace_is_an_error() {
        assert!(parse("resource \"a\" \"b\" = 1\n", Path::new("x.tf")).is_err());
    }

    #[test]
    fn templated_label_is_an_error() {
        assert!(parse("module \"${x}\" {}\n", Path::new("x.tf")).is_err());
    }

    #[test]
    fn missing_expression_is_an_error() {
        assert!(parse("a =\n", Path::new("x.tf")).is_err());
    }
}
