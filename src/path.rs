//! Stable node addressing.
//!
//! A path is a sequence of (slot, index) steps from a root. Because edits
//! rebuild only the spine above the edit point, a path computed on one tree
//! usually resolves to the corresponding node in a lightly-edited revision
//! of that tree, which is what makes paths useful as cross-revision anchors.

use serde::{Deserialize, Serialize};

use crate::error::{AstError, Result};
use crate::tree::Ast;

/// One step of a path: the slot name and the index among that slot's
/// occupants (not the node's overall child index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub slot: String,
    pub index: usize,
}

impl PathStep {
    pub fn new(slot: impl Into<String>, index: usize) -> Self {
        Self {
            slot: slot.into(),
            index,
        }
    }
}

/// Compute the path from `root` down to `target`.
///
/// Matching is by object identity, so the caller must hold a node of this
/// exact tree, not a structurally-equal copy.
pub fn path(root: &Ast, target: &Ast) -> Result<Vec<PathStep>> {
    fn descend(node: &Ast, target: &Ast, acc: &mut Vec<PathStep>) -> bool {
        if node.same(target) {
            return true;
        }
        let mut seen: Vec<(&str, usize)> = Vec::new();
        for entry in node.child_entries() {
            let index = match seen.iter_mut().find(|(slot, _)| *slot == entry.slot) {
                Some((_, count)) => {
                    *count += 1;
                    *count
                }
                None => {
                    seen.push((&entry.slot, 0));
                    0
                }
            };
            acc.push(PathStep::new(entry.slot.clone(), index));
            if descend(&entry.ast, target, acc) {
                return true;
            }
            acc.pop();
        }
        false
    }

    let mut acc = Vec::new();
    if descend(root, target, &mut acc) {
        Ok(acc)
    } else {
        Err(AstError::TargetNotFound)
    }
}

/// Resolve a path against a root. Slot names match case-insensitively.
pub fn lookup(root: &Ast, steps: &[PathStep]) -> Result<Ast> {
    let mut current = root.clone();
    for step in steps {
        current = current
            .slot(&step.slot)
            .get(step.index)
            .cloned()
            .ok_or(AstError::TargetNotFound)?;
    }
    Ok(current)
}

/// Ancestors of `target` within `root`, innermost first. Empty when the
/// target is the root itself or is not in the tree.
pub fn parents(root: &Ast, target: &Ast) -> Vec<Ast> {
    fn descend(node: &Ast, target: &Ast, acc: &mut Vec<Ast>) -> bool {
        if node.same(target) {
            return true;
        }
        for entry in node.child_entries() {
            if descend(&entry.ast, target, acc) {
                acc.push(node.clone());
                return true;
            }
        }
        false
    }

    let mut acc = Vec::new();
    descend(root, target, &mut acc);
    acc
}

/// The immediate parent of `target` within `root`.
pub fn parent(root: &Ast, target: &Ast) -> Option<Ast> {
    parents(root, target).into_iter().next()
}

/// The most specific node covering a 1-indexed line/column position.
pub fn ast_at_point(root: &Ast, line: usize, column: usize) -> Option<Ast> {
    if !root.range().contains(line, column) {
        return None;
    }
    let mut current = root.clone();
    loop {
        let inner = current
            .children()
            .into_iter()
            .find(|child| child.range().contains(line, column));
        match inner {
            Some(child) => current = child,
            None => return Some(current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::parse::parse;
    use pretty_assertions::assert_eq;

    fn binop_left(root: &Ast) -> Ast {
        root.children()[0].children()[0]
            .slot_one("left")
            .unwrap()
    }

    #[test]
    fn test_path_round_trip() {
        let root = parse("x + 88", Language::Python).unwrap();
        let left = binop_left(&root);
        let steps = path(&root, &left).unwrap();
        assert_eq!(
            steps,
            vec![
                PathStep::new("children", 0),
                PathStep::new("children", 0),
                PathStep::new("left", 0),
            ]
        );
        assert!(lookup(&root, &steps).unwrap().same(&left));
    }

    #[test]
    fn test_path_indexes_within_slot() {
        let root = parse("a\nb\nc\n", Language::Python).unwrap();
        let third = root.children()[2].clone();
        let steps = path(&root, &third).unwrap();
        assert_eq!(steps[0], PathStep::new("children", 2));
    }

    #[test]
    fn test_path_requires_identity() {
        let root = parse("x + 88", Language::Python).unwrap();
        let other = parse("x + 88", Language::Python).unwrap();
        let foreign = binop_left(&other);
        assert!(matches!(
            path(&root, &foreign),
            Err(AstError::TargetNotFound)
        ));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let root = parse("x + 88", Language::Python).unwrap();
        let steps = vec![
            PathStep::new("CHILDREN", 0),
            PathStep::new("CHILDREN", 0),
            PathStep::new("LEFT", 0),
        ];
        assert_eq!(lookup(&root, &steps).unwrap().source_text(), "x");
    }

    #[test]
    fn test_lookup_out_of_range() {
        let root = parse("x + 88", Language::Python).unwrap();
        let steps = vec![PathStep::new("children", 5)];
        assert!(matches!(lookup(&root, &steps), Err(AstError::TargetNotFound)));
    }

    #[test]
    fn test_parents_innermost_first() {
        let root = parse("x + 88", Language::Python).unwrap();
        let left = binop_left(&root);
        let chain: Vec<String> = parents(&root, &left)
            .iter()
            .map(|a| a.kind().to_string())
            .collect();
        assert_eq!(
            chain,
            vec!["binary_operator", "expression_statement", "module"]
        );
        assert_eq!(parent(&root, &left).unwrap().kind(), "binary_operator");
        assert!(parents(&root, &root).is_empty());
    }

    #[test]
    fn test_ast_at_point() {
        let root = parse("x + 88", Language::Python).unwrap();
        assert_eq!(ast_at_point(&root, 1, 1).unwrap().kind(), "identifier");
        assert_eq!(ast_at_point(&root, 1, 3).unwrap().kind(), "+");
        assert_eq!(ast_at_point(&root, 1, 5).unwrap().kind(), "integer");
        assert!(ast_at_point(&root, 9, 1).is_none());
    }
}
