//! Tree-sitter adapter for Java sources.
//!
//! This module provides:
//! - `SourceParser`: builds tree-sitter trees in whole-file or member mode
//! - `ParsedSource`: the tree plus the bytes its nodes point into
//! - `SyntaxKind`: the closed set of grammar node kinds
//!
//! tree-sitter always produces a tree, recovering from bad input with
//! `ERROR` and `MISSING` nodes. Such trees are rejected here with a
//! `ParseError` so the flattening engine only ever sees clean input.

mod kind;

pub use kind::SyntaxKind;

use thiserror::Error;
use tree_sitter::{Language, Node, Parser as TsParser, Tree};

/// Opening text used to host a member fragment.
const MEMBER_PREFIX: &str = "class __AstcorpusFragment {\n";
/// Closing text used to host a member fragment.
const MEMBER_SUFFIX: &str = "\n}\n";

/// How source text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// A complete compilation unit.
    #[default]
    File,
    /// A class-body fragment such as a single method or field.
    Member,
}

/// Errors produced while building a syntax tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("grammar could not be loaded: {0}")]
    Language(String),
    #[error("parser produced no tree")]
    NoTree,
}

/// A successfully parsed source file.
pub struct ParsedSource {
    tree: Tree,
    source: Vec<u8>,
    mode: ParseMode,
}

impl ParsedSource {
    /// The root `program` node.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The bytes the tree was built from (including any member wrapper).
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Get text for a node. Invalid UTF-8 is replaced rather than rejected.
    pub fn node_text(&self, node: Node) -> String {
        String::from_utf8_lossy(&self.source[node.byte_range()]).into_owned()
    }

    /// The members of the wrapper class in member mode.
    ///
    /// Returns `None` in file mode.
    pub fn member_body(&self) -> Option<Node<'_>> {
        if self.mode != ParseMode::Member {
            return None;
        }
        let root = self.root();
        let mut cursor = root.walk();
        let class = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "class_declaration")?;
        class.child_by_field_name("body")
    }
}

/// Parser for Java source text.
pub struct SourceParser {
    language: Language,
}

impl Default for SourceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<TsParser, ParseError> {
        let mut parser = TsParser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Language(e.to_string()))?;
        Ok(parser)
    }

    /// Parse source text, rejecting trees that contain syntax errors.
    pub fn parse(&self, source: &[u8], mode: ParseMode) -> Result<ParsedSource, ParseError> {
        let text = match mode {
            ParseMode::File => source.to_vec(),
            ParseMode::Member => {
                let mut wrapped =
                    Vec::with_capacity(MEMBER_PREFIX.len() + source.len() + MEMBER_SUFFIX.len());
                wrapped.extend_from_slice(MEMBER_PREFIX.as_bytes());
                wrapped.extend_from_slice(source);
                wrapped.extend_from_slice(MEMBER_SUFFIX.as_bytes());
                wrapped
            }
        };

        // tree_sitter::Parser is not Sync, so each call builds its own.
        let mut parser = self.create_parser()?;
        let tree = parser.parse(&text, None).ok_or(ParseError::NoTree)?;

        let parsed = ParsedSource {
            tree,
            source: text,
            mode,
        };

        if let Some(err) = first_syntax_error(&parsed) {
            return Err(err);
        }

        Ok(parsed)
    }
}

/// Locate the first `ERROR` or `MISSING` node in document order.
fn first_syntax_error(parsed: &ParsedSource) -> Option<ParseError> {
    let root = parsed.root();
    if !root.has_error() {
        return None;
    }

    let mut node = root;
    loop {
        if node.is_error() || node.is_missing() {
            return Some(describe_error(parsed, node));
        }

        // Descend into the first child that carries the error.
        let mut cursor = node.walk();
        let next = node.children(&mut cursor).find(|c| c.has_error());
        match next {
            Some(child) => node = child,
            None => return Some(describe_error(parsed, node)),
        }
    }
}

fn describe_error(parsed: &ParsedSource, node: Node) -> ParseError {
    let position = node.start_position();
    let mut line = position.row + 1;
    if parsed.mode == ParseMode::Member {
        // The wrapper occupies exactly one line.
        line = line.saturating_sub(1).max(1);
    }

    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let text = parsed.node_text(node);
        let snippet: String = text.chars().take(40).collect();
        let snippet = snippet.split_whitespace().collect::<Vec<_>>().join(" ");
        if snippet.is_empty() {
            "unexpected input".to_string()
        } else {
            format!("unexpected `{}`", snippet)
        }
    };

    ParseError::Syntax {
        line,
        column: position.column + 1,
        message,
    }
}
