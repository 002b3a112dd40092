//! Helpers shared by the tree-sitter readers.

use crate::ast::{Node, Span};
use crate::traits::{Diagnostic, ReadError};
use tree_sitter::{Language, Node as SyntaxNode, Parser, Tree};

/// Most diagnostics reported for one parse.
const MAX_DIAGNOSTICS: usize = 16;

/// Parse `source`, failing with positioned diagnostics on syntax errors.
pub(crate) fn parse(source: &str, language: Language) -> Result<Tree, ReadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|err| ReadError::Language(err.to_string()))?;

    let tree = parser.parse(source, None).ok_or_else(|| ReadError::Parse {
        diagnostics: vec![Diagnostic {
            line: 1,
            column: 1,
            message: "parser produced no tree".into(),
        }],
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let mut diagnostics = Vec::new();
        collect_diagnostics(root, source, &mut diagnostics);
        if diagnostics.is_empty() {
            diagnostics.push(diagnostic(root, "syntax error".into()));
        }
        return Err(ReadError::Parse { diagnostics });
    }
    Ok(tree)
}

fn diagnostic(node: SyntaxNode, message: String) -> Diagnostic {
    let point = node.start_position();
    Diagnostic {
        line: point.row + 1,
        column: point.column + 1,
        message,
    }
}

fn collect_diagnostics(node: SyntaxNode, source: &str, out: &mut Vec<Diagnostic>) {
    if out.len() >= MAX_DIAGNOSTICS {
        return;
    }
    if node.is_missing() {
        out.push(diagnostic(node, format!("missing '{}'", node.kind())));
        return;
    }
    if node.is_error() {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        out.push(diagnostic(node, format!("unexpected '{}'", snippet(text))));
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_diagnostics(child, source, out);
    }
}

/// Line and block comment delimiters of a language.
pub(crate) struct CommentSyntax {
    pub(crate) line: &'static str,
    pub(crate) block: (&'static str, &'static str),
}

/// Whether `source` holds only whitespace and comments. Some grammars
/// reject a program without statements, so readers check this first.
pub(crate) fn is_blank(source: &str, comments: &CommentSyntax) -> bool {
    let (open, close) = comments.block;
    let mut rest = source.trim_start();
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(open) {
            let Some(end) = after.find(close) else {
                return false;
            };
            rest = after[end + close.len()..].trim_start();
        } else if let Some(after) = rest.strip_prefix(comments.line) {
            rest = after.split_once('\n').map_or("", |(_, next)| next).trim_start();
        } else {
            return false;
        }
    }
    true
}

/// The tree of a blank source.
pub(crate) fn empty_program(source: &str) -> Node {
    Node::block(Vec::new()).with_span(Span::new(0, source.len()))
}

/// First line of `text`, shortened for messages.
pub(crate) fn snippet(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > 40 {
        let cut: String = line.chars().take(40).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

/// Source text accessors bound to one input.
#[derive(Clone, Copy)]
pub(crate) struct SourceText<'a> {
    source: &'a str,
    language: &'static str,
}

impl<'a> SourceText<'a> {
    pub(crate) fn new(source: &'a str, language: &'static str) -> Self {
        Self { source, language }
    }

    pub(crate) fn text(&self, node: SyntaxNode) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    pub(crate) fn span(&self, node: SyntaxNode) -> Span {
        Span::new(node.start_byte(), node.end_byte())
    }

    /// Trimmed source between two sibling nodes, e.g. an operator that the
    /// grammar keeps as a hidden token.
    pub(crate) fn between(&self, left: SyntaxNode, right: SyntaxNode) -> &'a str {
        self.source
            .get(left.end_byte()..right.start_byte())
            .unwrap_or("")
            .trim()
    }

    /// Trimmed source from the start of `node` up to `child`.
    pub(crate) fn before(&self, node: SyntaxNode, child: SyntaxNode) -> &'a str {
        self.source
            .get(node.start_byte()..child.start_byte())
            .unwrap_or("")
            .trim()
    }

    /// Trimmed source from the end of `child` to the end of `node`.
    pub(crate) fn after(&self, node: SyntaxNode, child: SyntaxNode) -> &'a str {
        self.source
            .get(child.end_byte()..node.end_byte())
            .unwrap_or("")
            .trim()
    }

    /// Placeholder for a construct with no mapping.
    pub(crate) fn unsupported(&self, node: SyntaxNode) -> Node {
        tracing::debug!(
            language = self.language,
            kind = node.kind(),
            line = node.start_position().row + 1,
            "unsupported syntax"
        );
        Node::unknown(format!("unsupported {}: {}", node.kind(), snippet(self.text(node))))
            .with_span(self.span(node))
    }
}

/// Named children, skipping comments.
pub(crate) fn named_children<'t>(node: SyntaxNode<'t>) -> Vec<SyntaxNode<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

pub(crate) fn child_of_kind<'t>(node: SyntaxNode<'t>, kind: &str) -> Option<SyntaxNode<'t>> {
    named_children(node).into_iter().find(|child| child.kind() == kind)
}

pub(crate) fn children_of_kind<'t>(node: SyntaxNode<'t>, kind: &str) -> Vec<SyntaxNode<'t>> {
    named_children(node)
        .into_iter()
        .filter(|child| child.kind() == kind)
        .collect()
}

pub(crate) fn first_named<'t>(node: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    named_children(node).into_iter().next()
}

/// Text of the first anonymous child, e.g. an operator token.
pub(crate) fn first_token<'a>(node: SyntaxNode, source: &SourceText<'a>) -> Option<&'a str> {
    let mut cursor = node.walk();
    let token = node.children(&mut cursor).find(|child| !child.is_named());
    token.map(|t| source.text(t))
}

/// Text of the last anonymous child.
pub(crate) fn last_token<'a>(node: SyntaxNode, source: &SourceText<'a>) -> Option<&'a str> {
    let mut cursor = node.walk();
    let token = node.children(&mut cursor).filter(|child| !child.is_named()).last();
    token.map(|t| source.text(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: CommentSyntax = CommentSyntax {
        line: "#",
        block: ("<#", "#>"),
    };

    #[test]
    fn test_blank_sources() {
        assert!(is_blank("", &HASH));
        assert!(is_blank("  \n\t", &HASH));
        assert!(is_blank("# c\n<# block\n #>\n# last", &HASH));
        assert!(!is_blank("# c\n$x = 1", &HASH));
        assert!(!is_blank("<# unterminated", &HASH));
    }

    #[test]
    fn test_snippet_truncates() {
        assert_eq!(snippet("  short  "), "short");
        assert_eq!(snippet("first\nsecond"), "first");
        let long = "x".repeat(60);
        assert_eq!(snippet(&long), format!("{}...", "x".repeat(40)));
    }
}
