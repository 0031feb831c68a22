//! The immutable AST node and its shared-ownership handle.
//!
//! Nodes are never mutated after construction. Every edit synthesizes new
//! ancestors from the edit point up to a new root and shares every other
//! subtree by reference; the alias count reported by [`Ast::refcount`] is a
//! diagnostic of that sharing, never a destruction mechanism.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::registry::{CapabilitySet, Capability, Registry, SlotArity, SlotSpec, CHILDREN_SLOT};

/// Stable object identity, distinct across logically-equal trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A position in source text, 1-indexed.
///
/// Columns count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
}

impl Point {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The source region a node covers: byte offsets plus line/column points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: Point,
    pub end: Point,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl SourceRange {
    pub fn new(start: Point, end: Point, start_byte: usize, end_byte: usize) -> Self {
        Self {
            start,
            end,
            start_byte,
            end_byte,
        }
    }

    /// Range of `text` anchored at a start point, used for nodes
    /// synthesized by edits and transforms.
    pub(crate) fn spanning(start: Point, start_byte: usize, text: &str) -> Self {
        let end = match text.rfind('\n') {
            None => Point::new(start.line, start.column + text.chars().count()),
            Some(last) => Point::new(
                start.line + text.matches('\n').count(),
                text[last + 1..].chars().count() + 1,
            ),
        };
        Self {
            start,
            end,
            start_byte,
            end_byte: start_byte + text.len(),
        }
    }

    /// Whether the range covers the given line/column point.
    pub fn contains(&self, line: usize, column: usize) -> bool {
        let after_start = line > self.start.line
            || (line == self.start.line && column >= self.start.column);
        let before_end =
            line < self.end.line || (line == self.end.line && column < self.end.column);
        after_start && before_end
    }
}

/// A child node tagged with the slot it occupies, kept in source order.
#[derive(Debug, Clone)]
pub struct ChildEntry {
    pub slot: String,
    pub ast: Ast,
}

#[derive(Debug)]
pub(crate) struct NodeData {
    id: NodeId,
    language: Language,
    kind: String,
    named: bool,
    caps: CapabilitySet,
    range: SourceRange,
    text: String,
    /// Interstitial text around children: `gaps.len() == children.len() + 1`.
    /// For a leaf, the single gap is the node's whole text.
    gaps: Vec<String>,
    children: Vec<ChildEntry>,
}

/// Shared-ownership handle over one immutable AST node.
///
/// Cloning is cheap and increases the node's alias count. Structural
/// equality ([`PartialEq`]) compares language, kind, and source text;
/// identity across trees is [`Ast::same`].
#[derive(Debug, Clone)]
pub struct Ast(Arc<NodeData>);

impl Ast {
    /// Build a leaf node carrying verbatim source text.
    pub(crate) fn leaf(
        language: Language,
        kind: impl Into<String>,
        named: bool,
        range: SourceRange,
        text: impl Into<String>,
    ) -> Self {
        let kind = kind.into();
        let text = text.into();
        let caps = Registry::global().capabilities(language, &kind);
        Ast(Arc::new(NodeData {
            id: NodeId::next(),
            language,
            kind,
            named,
            caps,
            range,
            gaps: vec![text.clone()],
            text,
            children: Vec::new(),
        }))
    }

    /// Build an interior node from interstitial gaps and slotted children.
    ///
    /// The node's text is assembled from the gaps and child texts, which is
    /// what makes verbatim round-tripping hold by construction.
    pub(crate) fn interior(
        language: Language,
        kind: impl Into<String>,
        named: bool,
        range: SourceRange,
        gaps: Vec<String>,
        children: Vec<ChildEntry>,
    ) -> Self {
        debug_assert_eq!(gaps.len(), children.len() + 1);
        let kind = kind.into();
        let caps = Registry::global().capabilities(language, &kind);
        let text = assemble(&gaps, &children);
        Ast(Arc::new(NodeData {
            id: NodeId::next(),
            language,
            kind,
            named,
            caps,
            range,
            text,
            gaps,
            children,
        }))
    }

    /// Synthesize a replacement for this node with new gaps and children,
    /// keeping kind and language and re-anchoring the range at the original
    /// start point.
    pub(crate) fn rebuild(&self, gaps: Vec<String>, children: Vec<ChildEntry>) -> Self {
        debug_assert_eq!(gaps.len(), children.len() + 1);
        let text = assemble(&gaps, &children);
        let range = SourceRange::spanning(self.0.range.start, self.0.range.start_byte, &text);
        Ast(Arc::new(NodeData {
            id: NodeId::next(),
            language: self.0.language,
            kind: self.0.kind.clone(),
            named: self.0.named,
            caps: self.0.caps,
            range,
            text,
            gaps,
            children,
        }))
    }

    /// Shallow-clone this node under a fresh object id, sharing every child
    /// by reference.
    pub(crate) fn reallocate(&self) -> Self {
        Ast(Arc::new(NodeData {
            id: NodeId::next(),
            language: self.0.language,
            kind: self.0.kind.clone(),
            named: self.0.named,
            caps: self.0.caps,
            range: self.0.range,
            text: self.0.text.clone(),
            gaps: self.0.gaps.clone(),
            children: self.0.children.clone(),
        }))
    }

    /// The node's stable object id.
    pub fn id(&self) -> NodeId {
        self.0.id
    }

    /// The node's language.
    pub fn language(&self) -> Language {
        self.0.language
    }

    /// The grammar node kind.
    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    /// Whether the node is a named grammar production (operators occupying
    /// a field are children but not named).
    pub fn is_named(&self) -> bool {
        self.0.named
    }

    /// The node's capability tags.
    pub fn capabilities(&self) -> CapabilitySet {
        self.0.caps
    }

    /// Whether the node carries the given capability tag.
    pub fn has_capability(&self, cap: Capability) -> bool {
        self.0.caps.contains(cap)
    }

    /// The node's source range.
    pub fn range(&self) -> SourceRange {
        self.0.range
    }

    /// The node's verbatim source text.
    pub fn source_text(&self) -> &str {
        &self.0.text
    }

    /// Children in source order, across all slots.
    pub fn children(&self) -> Vec<Ast> {
        self.0.children.iter().map(|e| e.ast.clone()).collect()
    }

    /// Children with their slot tags, in source order.
    pub fn child_entries(&self) -> &[ChildEntry] {
        &self.0.children
    }

    pub(crate) fn gaps(&self) -> &[String] {
        &self.0.gaps
    }

    /// Diagnostic alias count: how many live handles share this node.
    pub fn refcount(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Identity comparison: whether two handles share one underlying node.
    pub fn same(&self, other: &Ast) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Ordered slot specs for this node's type.
    ///
    /// Comes from the registry when the kind has a schema entry, otherwise
    /// derived from the node's actual children (fields in first-appearance
    /// order, then the generic variable slot).
    pub fn child_slots(&self) -> Vec<SlotSpec> {
        if let Some(schema) = Registry::global().schema(self.0.language, &self.0.kind) {
            return schema.slots.clone();
        }
        let mut slots: Vec<SlotSpec> = Vec::new();
        for entry in &self.0.children {
            if entry.slot == CHILDREN_SLOT {
                continue;
            }
            match slots.iter_mut().find(|s| s.name == entry.slot) {
                Some(existing) => existing.arity = SlotArity::Many,
                None => slots.push(SlotSpec::new(entry.slot.clone(), SlotArity::One)),
            }
        }
        slots.push(SlotSpec::new(CHILDREN_SLOT, SlotArity::Many));
        slots
    }

    /// Arity of a named slot, if the node's type declares or exhibits it.
    pub fn slot_arity(&self, name: &str) -> Option<SlotArity> {
        self.child_slots()
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.arity)
    }

    /// Contents of a named slot, in order. Slot names match
    /// case-insensitively; an undeclared slot is empty.
    pub fn slot(&self, name: &str) -> Vec<Ast> {
        self.0
            .children
            .iter()
            .filter(|e| e.slot.eq_ignore_ascii_case(name))
            .map(|e| e.ast.clone())
            .collect()
    }

    /// The sole occupant of a fixed-one slot, the named-accessor sugar for
    /// `slot(name)` on arity-one slots.
    pub fn slot_one(&self, name: &str) -> Option<Ast> {
        self.0
            .children
            .iter()
            .find(|e| e.slot.eq_ignore_ascii_case(name))
            .map(|e| e.ast.clone())
    }

    /// Descend while the node has exactly one child, returning the most
    /// specific node denoting the same construct.
    pub(crate) fn deepest(&self) -> Ast {
        let mut current = self.clone();
        while current.0.children.len() == 1 {
            current = current.0.children[0].ast.clone();
        }
        current
    }
}

impl PartialEq for Ast {
    fn eq(&self, other: &Self) -> bool {
        self.0.language == other.0.language
            && self.0.kind == other.0.kind
            && self.0.text == other.0.text
    }
}

impl Eq for Ast {}

fn assemble(gaps: &[String], children: &[ChildEntry]) -> String {
    let mut text = String::new();
    for (i, gap) in gaps.iter().enumerate() {
        text.push_str(gap);
        if let Some(entry) = children.get(i) {
            text.push_str(entry.ast.source_text());
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> Ast {
        let range = SourceRange::spanning(Point::new(1, 1), 0, text);
        Ast::leaf(Language::Python, "identifier", true, range, text)
    }

    #[test]
    fn test_leaf_round_trip() {
        let node = leaf("x");
        assert_eq!(node.source_text(), "x");
        assert_eq!(node.children().len(), 0);
        assert!(node.has_capability(Capability::Identifier));
    }

    #[test]
    fn test_interior_assembles_text() {
        let left = leaf("x");
        let right = leaf("y");
        let range = SourceRange::spanning(Point::new(1, 1), 0, "x + y");
        let node = Ast::interior(
            Language::Python,
            "binary_operator",
            true,
            range,
            vec!["".into(), " + ".into(), "".into()],
            vec![
                ChildEntry {
                    slot: "left".into(),
                    ast: left,
                },
                ChildEntry {
                    slot: "right".into(),
                    ast: right,
                },
            ],
        );
        assert_eq!(node.source_text(), "x + y");
        assert_eq!(node.slot_one("left").unwrap().source_text(), "x");
        assert_eq!(node.slot("right").len(), 1);
    }

    #[test]
    fn test_identity_vs_equality() {
        let a = leaf("x");
        let b = leaf("x");
        assert_eq!(a, b);
        assert!(!a.same(&b));
        assert_ne!(a.id(), b.id());
        assert!(a.same(&a.clone()));
    }

    #[test]
    fn test_refcount_tracks_sharing() {
        let a = leaf("x");
        assert_eq!(a.refcount(), 1);
        let b = a.clone();
        assert_eq!(a.refcount(), 2);
        drop(b);
        assert_eq!(a.refcount(), 1);
    }

    #[test]
    fn test_spanning_range_multiline() {
        let range = SourceRange::spanning(Point::new(1, 1), 0, "ab\ncde");
        assert_eq!(range.end, Point::new(2, 4));
        assert_eq!(range.end_byte, 6);

        let range = SourceRange::spanning(Point::new(1, 1), 0, "反复");
        assert_eq!(range.end, Point::new(1, 3));
        assert_eq!(range.end_byte, 6);
    }
}
