//! Parser adapter over tree-sitter.
//!
//! Wraps a per-language raw parse and converts the concrete syntax tree
//! into typed immutable nodes via the registry. Ranges are computed in
//! Unicode-scalar columns; regions that fail to parse become variation-point
//! nodes instead of errors, so queries and transforms keep working over
//! broken input.
//!
//! A fresh `tree_sitter::Parser` is built per call: the raw parser keeps
//! mutable internal state and is not shareable across callers.

use tracing::debug;

use crate::error::{AstError, Result};
use crate::language::Language;
use crate::registry::{CHILDREN_SLOT, FRAGMENT_KIND, FRAGMENT_TREE_KIND, VARIATION_POINT_KIND};
use crate::tree::node::{Ast, ChildEntry, Point, SourceRange};

/// Options controlling tree conversion.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Return the single most specific node when the source denotes exactly
    /// one construct, instead of the wrapping top-level node.
    pub deepest: bool,
    /// Merge each contiguous unparsable run into one fragment-tree node;
    /// when false, yield one fragment leaf per unparsable token.
    pub error_tree: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            deepest: false,
            error_tree: true,
        }
    }
}

/// Parse source text into a typed immutable tree.
pub fn parse(source: &str, language: Language) -> Result<Ast> {
    parse_with(source, language, ParseOptions::default())
}

/// Parse source text with explicit conversion options.
pub fn parse_with(source: &str, language: Language, options: ParseOptions) -> Result<Ast> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.grammar())
        .map_err(|_| AstError::UnsupportedLanguage(language.as_str().to_string()))?;

    let tree = parser
        .parse(source.as_bytes(), None)
        .ok_or_else(|| AstError::EmptyParse(format!("{language} parser produced no tree")))?;

    debug!(
        language = language.as_str(),
        bytes = source.len(),
        has_error = tree.root_node().has_error(),
        "parsed source"
    );

    let converter = Converter {
        source,
        language,
        error_tree: options.error_tree,
        lines: LineIndex::new(source),
    };
    let root = converter.convert_spanned(tree.root_node(), 0, source.len());
    Ok(if options.deepest { root.deepest() } else { root })
}

/// Byte-offset to line/column conversion counting Unicode scalar values.
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    fn point(&self, source: &str, byte: usize) -> Point {
        let line = match self.line_starts.binary_search(&byte) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let column = source[self.line_starts[line]..byte].chars().count() + 1;
        Point::new(line + 1, column)
    }
}

struct Converter<'a> {
    source: &'a str,
    language: Language,
    error_tree: bool,
    lines: LineIndex,
}

impl<'a> Converter<'a> {
    fn range(&self, start: usize, end: usize) -> SourceRange {
        SourceRange::new(
            self.lines.point(self.source, start),
            self.lines.point(self.source, end),
            start,
            end,
        )
    }

    /// Whether a raw child becomes a typed child. Named productions and
    /// anonymous tokens occupying a grammar field (operators) are children;
    /// pure punctuation stays in the interstitial gaps.
    fn includes(node: tree_sitter::Node, field: Option<&str>) -> bool {
        if node.is_missing() && node.start_byte() == node.end_byte() {
            return false;
        }
        node.is_named() || field.is_some()
    }

    fn convert(&self, node: tree_sitter::Node) -> Ast {
        if node.is_error() {
            return self.variation_point(node);
        }
        self.convert_spanned(node, node.start_byte(), node.end_byte())
    }

    /// Convert a raw node covering `[start, end)`. The root is forced to
    /// span the whole source so leading and trailing text survive verbatim.
    fn convert_spanned(&self, node: tree_sitter::Node, start: usize, end: usize) -> Ast {
        let mut raw_children = Vec::new();
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                let field = cursor.field_name();
                if Self::includes(child, field) {
                    raw_children.push((child, field.unwrap_or(CHILDREN_SLOT).to_string()));
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        if raw_children.is_empty() {
            return Ast::leaf(
                self.language,
                node.kind(),
                node.is_named(),
                self.range(start, end),
                &self.source[start..end],
            );
        }

        let mut gaps = Vec::with_capacity(raw_children.len() + 1);
        let mut children = Vec::with_capacity(raw_children.len());
        let mut at = start;
        for (child, slot) in raw_children {
            gaps.push(self.source[at..child.start_byte()].to_string());
            at = child.end_byte();
            children.push(ChildEntry {
                slot,
                ast: self.convert(child),
            });
        }
        gaps.push(self.source[at..end].to_string());

        Ast::interior(
            self.language,
            node.kind(),
            node.is_named(),
            self.range(start, end),
            gaps,
            children,
        )
    }

    /// Build a variation point for a region that failed to parse.
    fn variation_point(&self, node: tree_sitter::Node) -> Ast {
        let (start, end) = (node.start_byte(), node.end_byte());
        if self.error_tree {
            return Ast::leaf(
                self.language,
                FRAGMENT_TREE_KIND,
                true,
                self.range(start, end),
                &self.source[start..end],
            );
        }

        let mut tokens = Vec::new();
        collect_tokens(node, &mut tokens);
        if tokens.is_empty() {
            tokens.push((start, end));
        }

        let mut gaps = Vec::with_capacity(tokens.len() + 1);
        let mut children = Vec::with_capacity(tokens.len());
        let mut at = start;
        for (token_start, token_end) in tokens {
            gaps.push(self.source[at..token_start].to_string());
            at = token_end;
            children.push(ChildEntry {
                slot: CHILDREN_SLOT.to_string(),
                ast: Ast::leaf(
                    self.language,
                    FRAGMENT_KIND,
                    true,
                    self.range(token_start, token_end),
                    &self.source[token_start..token_end],
                ),
            });
        }
        gaps.push(self.source[at..end].to_string());

        Ast::interior(
            self.language,
            VARIATION_POINT_KIND,
            true,
            self.range(start, end),
            gaps,
            children,
        )
    }
}

/// Byte spans of the non-empty tokens under a raw node, in source order.
fn collect_tokens(node: tree_sitter::Node, out: &mut Vec<(usize, usize)>) {
    if node.child_count() == 0 {
        if node.end_byte() > node.start_byte() {
            out.push((node.start_byte(), node.end_byte()));
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Capability;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_python() {
        let source = "def foo():\n    return None\n";
        let root = parse(source, Language::Python).unwrap();
        assert_eq!(root.source_text(), source);
        assert_eq!(root.kind(), "module");
        assert!(root.has_capability(Capability::Root));
    }

    #[test]
    fn test_round_trip_other_languages() {
        for (source, language) in [
            ("println!(\"Hello, world!\");", Language::Rust),
            ("import foo;", Language::Java),
            ("int main(void) { return 0; }", Language::C),
            (
                "let message: string = 'Hello World!'\nconsole.log(message)",
                Language::TypeScript,
            ),
        ] {
            let root = parse(source, language).unwrap();
            assert_eq!(root.source_text(), source);
            assert_eq!(root.language(), language);
        }
    }

    #[test]
    fn test_pre_order_traversal() {
        let root = parse("x + 88", Language::Python).unwrap();
        let kinds: Vec<String> = root.traverse().map(|a| a.kind().to_string()).collect();
        assert_eq!(
            kinds,
            vec![
                "module",
                "expression_statement",
                "binary_operator",
                "identifier",
                "+",
                "integer"
            ]
        );
    }

    #[test]
    fn test_post_order_traversal() {
        let root = parse("x + 88", Language::Python).unwrap();
        let kinds: Vec<String> = root.post_traverse().map(|a| a.kind().to_string()).collect();
        assert_eq!(
            kinds,
            vec![
                "identifier",
                "+",
                "integer",
                "binary_operator",
                "expression_statement",
                "module"
            ]
        );
    }

    #[test]
    fn test_binary_operator_children_and_slots() {
        let root = parse("x + 88", Language::Python).unwrap();
        let binop = root.children()[0].children()[0].clone();
        assert_eq!(binop.kind(), "binary_operator");
        assert_eq!(binop.children().len(), 3);
        assert_eq!(binop.slot_one("right").unwrap().source_text(), "88");
        assert_eq!(binop.slot_one("operator").unwrap().source_text(), "+");
        assert_eq!(binop.slot("children").len(), 0);
    }

    #[test]
    fn test_deepest_collapses_to_most_specific() {
        let identifier = parse_with(
            "x",
            Language::Python,
            ParseOptions {
                deepest: true,
                ..ParseOptions::default()
            },
        )
        .unwrap();
        assert_eq!(identifier.kind(), "identifier");

        let binop = parse_with(
            "x + 88",
            Language::Python,
            ParseOptions {
                deepest: true,
                ..ParseOptions::default()
            },
        )
        .unwrap();
        assert_eq!(binop.kind(), "binary_operator");
        assert_eq!(binop.source_text(), "x + 88");
    }

    #[test]
    fn test_unicode_scalar_columns() {
        let source = "\"反复请求多次\"";
        let root = parse(source, Language::Python).unwrap();
        assert_eq!(root.source_text(), source);
        assert_eq!(root.range().start, Point::new(1, 1));
        assert_eq!(root.range().end, Point::new(1, 9));
    }

    #[test]
    fn test_empty_source() {
        let root = parse("", Language::Python).unwrap();
        assert_eq!(root.source_text(), "");
        assert_eq!(root.children().len(), 0);
    }

    fn count_kinds(root: &Ast, kind: &str) -> usize {
        root.traverse().filter(|a| a.kind() == kind).count()
    }

    #[test]
    fn test_error_tree_merges_fragments() {
        let source = "x = 1\n$ $\n";
        let root = parse_with(source, Language::Python, ParseOptions::default()).unwrap();
        assert_eq!(root.source_text(), source);
        assert_eq!(count_kinds(&root, FRAGMENT_TREE_KIND), 1);
        assert_eq!(count_kinds(&root, FRAGMENT_KIND), 0);
        let fragment = root
            .traverse()
            .find(|a| a.kind() == FRAGMENT_TREE_KIND)
            .unwrap();
        assert!(fragment.has_capability(Capability::ErrorRegion));
        assert!(fragment.source_text().contains('$'));
    }

    #[test]
    fn test_error_leaves_per_token() {
        let source = "x = 1\n$ $\n";
        let root = parse_with(
            source,
            Language::Python,
            ParseOptions {
                error_tree: false,
                ..ParseOptions::default()
            },
        )
        .unwrap();
        assert_eq!(root.source_text(), source);
        assert_eq!(count_kinds(&root, FRAGMENT_TREE_KIND), 0);
        assert_eq!(count_kinds(&root, VARIATION_POINT_KIND), 1);
        assert!(count_kinds(&root, FRAGMENT_KIND) >= 1);
        let fragment = root.traverse().find(|a| a.kind() == FRAGMENT_KIND).unwrap();
        assert!(fragment.has_capability(Capability::ErrorRegion));
    }

    #[test]
    fn test_comments_survive_round_trip() {
        let source = "int x; /* comment */\n";
        let root = parse(source, Language::C).unwrap();
        assert_eq!(root.source_text(), source);
        assert!(root.traverse().any(|a| a.kind() == "comment"));
    }
}
