//! Structural editing.
//!
//! Every edit is non-destructive: it synthesizes new nodes along the spine
//! from the edit point to the root and returns a new root, while the input
//! tree and every untouched subtree stay shared by reference.
//!
//! Separator text for inserted siblings is recovered from the surrounding
//! gaps where possible, falling back to the language's statement or
//! argument separator depending on the parent's capabilities.

use crate::error::{AstError, Result};
use crate::path::parents;
use crate::registry::{Capability, SlotArity, CHILDREN_SLOT};
use crate::tree::{Ast, ChildEntry, Value};

/// Remove `target` from its parent's variable slot, returning the new root.
///
/// Cutting from a fixed-one slot is rejected: the result would not be a
/// well-formed node of the parent's type.
pub fn cut(root: &Ast, target: &Ast) -> Result<Ast> {
    if root.same(target) {
        return Err(AstError::Slot("cannot cut the root node".to_string()));
    }
    edit_parent(root, target, |parent, idx| {
        let slot = &parent.child_entries()[idx].slot;
        if parent.slot_arity(slot) == Some(SlotArity::One) {
            return Err(AstError::Slot(format!(
                "slot {slot} of {} holds exactly one node",
                parent.kind()
            )));
        }
        let mut gaps = parent.gaps().to_vec();
        let mut children = parent.child_entries().to_vec();
        children.remove(idx);
        gaps.remove(idx + 1);
        Ok((gaps, children))
    })
}

/// Replace `target` with a value, returning the new root.
///
/// Replacing the root itself returns the materialized replacement.
pub fn replace(root: &Ast, target: &Ast, value: impl Into<Value>) -> Result<Ast> {
    let replacement = value.into().to_ast(root.language())?;
    if root.same(target) {
        return Ok(replacement);
    }
    edit_parent(root, target, |parent, idx| {
        let mut children = parent.child_entries().to_vec();
        children[idx].ast = replacement;
        Ok((parent.gaps().to_vec(), children))
    })
}

/// Insert a value as a new sibling immediately before `target`, returning
/// the new root. The new node joins `target`'s slot, so the slot must be a
/// variable one.
pub fn insert(root: &Ast, target: &Ast, value: impl Into<Value>) -> Result<Ast> {
    let replacement = value.into().to_ast(root.language())?;
    if root.same(target) {
        return Err(AstError::Slot(
            "cannot insert a sibling before the root node".to_string(),
        ));
    }
    edit_parent(root, target, |parent, idx| {
        let slot = parent.child_entries()[idx].slot.clone();
        if parent.slot_arity(&slot) == Some(SlotArity::One) {
            return Err(AstError::Slot(format!(
                "slot {slot} of {} holds exactly one node",
                parent.kind()
            )));
        }
        let sep = sibling_separator(parent, idx);
        let mut gaps = parent.gaps().to_vec();
        gaps.insert(idx + 1, sep);
        let mut children = parent.child_entries().to_vec();
        children.insert(
            idx,
            ChildEntry {
                slot,
                ast: replacement,
            },
        );
        Ok((gaps, children))
    })
}

/// Copy a node under a fresh object id, sharing all children by reference.
pub fn copy(node: &Ast) -> Ast {
    node.reallocate()
}

/// Start a copy of `node` with slot overrides.
pub fn copier(node: &Ast) -> Copier {
    Copier::of(node)
}

enum SlotOverride {
    One(Value),
    Many(Vec<Value>),
}

/// Builder for copies with per-slot replacements.
///
/// Overrides apply in insertion order; the result is a detached node, not a
/// spliced-in revision of any tree.
pub struct Copier {
    base: Ast,
    overrides: Vec<(String, SlotOverride)>,
}

impl Copier {
    pub fn of(node: &Ast) -> Self {
        Self {
            base: node.clone(),
            overrides: Vec::new(),
        }
    }

    /// Override a slot with a single value.
    pub fn set(mut self, slot: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides
            .push((slot.into(), SlotOverride::One(value.into())));
        self
    }

    /// Override a variable slot with a full replacement sequence.
    pub fn set_many(mut self, slot: impl Into<String>, values: Vec<Value>) -> Self {
        self.overrides
            .push((slot.into(), SlotOverride::Many(values)));
        self
    }

    pub fn build(self) -> Result<Ast> {
        if self.overrides.is_empty() {
            return Ok(self.base.reallocate());
        }
        let mut current = self.base;
        for (slot, value) in self.overrides {
            let arity = current.slot_arity(&slot).ok_or_else(|| {
                AstError::Slot(format!("{} has no slot named {slot}", current.kind()))
            })?;
            current = match (arity, value) {
                (SlotArity::One, SlotOverride::One(v)) => override_one(&current, &slot, v)?,
                (SlotArity::One, SlotOverride::Many(_)) => {
                    return Err(AstError::Slot(format!(
                        "slot {slot} of {} holds exactly one node",
                        current.kind()
                    )))
                }
                (SlotArity::Many, SlotOverride::One(v)) => {
                    override_many(&current, &slot, vec![v])?
                }
                (SlotArity::Many, SlotOverride::Many(vs)) => override_many(&current, &slot, vs)?,
            };
        }
        Ok(current)
    }
}

fn override_one(node: &Ast, slot: &str, value: Value) -> Result<Ast> {
    let idx = node
        .child_entries()
        .iter()
        .position(|e| e.slot.eq_ignore_ascii_case(slot))
        .ok_or_else(|| AstError::Slot(format!("slot {slot} of {} is empty", node.kind())))?;
    let mut children = node.child_entries().to_vec();
    children[idx].ast = value.to_ast(node.language())?;
    Ok(node.rebuild(node.gaps().to_vec(), children))
}

fn override_many(node: &Ast, slot: &str, mut values: Vec<Value>) -> Result<Ast> {
    // Emptying the statement slot of a block-like node leaves source that no
    // longer parses; substitute the language's placeholder statement.
    if values.is_empty()
        && slot.eq_ignore_ascii_case(CHILDREN_SLOT)
        && (node.has_capability(Capability::Root) || node.has_capability(Capability::Compound))
    {
        values.push(Value::Text(
            node.language().placeholder_statement().to_string(),
        ));
    }

    let mut replacements = Vec::with_capacity(values.len());
    for value in values {
        replacements.push(value.to_ast(node.language())?);
    }

    let gaps = node.gaps();
    let entries = node.child_entries();
    let occupied: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.slot.eq_ignore_ascii_case(slot))
        .map(|(i, _)| i)
        .collect();

    let canonical = entries
        .iter()
        .find(|e| e.slot.eq_ignore_ascii_case(slot))
        .map(|e| e.slot.clone())
        .unwrap_or_else(|| slot.to_string());
    let new_entries = |asts: Vec<Ast>| -> Vec<ChildEntry> {
        asts.into_iter()
            .map(|ast| ChildEntry {
                slot: canonical.clone(),
                ast,
            })
            .collect()
    };

    let (Some(&first), Some(&last)) = (occupied.first(), occupied.last()) else {
        // No current occupants: append at the end, inside any closing
        // delimiters the final gap holds.
        if replacements.is_empty() {
            return Ok(node.reallocate());
        }
        let (prefix, suffix) = split_closing(gaps.last().map(String::as_str).unwrap_or(""));
        let mut new_gaps: Vec<String> = gaps[..gaps.len() - 1].to_vec();
        new_gaps.push(prefix.to_string());
        let mut children = entries.to_vec();
        let sep = default_separator(node);
        for (i, entry) in new_entries(replacements).into_iter().enumerate() {
            if i > 0 {
                new_gaps.push(sep.clone());
            }
            children.push(entry);
        }
        new_gaps.push(suffix.to_string());
        return Ok(node.rebuild(new_gaps, children));
    };

    let sep = if occupied.len() >= 2 && !gaps[first + 1].is_empty() {
        gaps[first + 1].clone()
    } else {
        default_separator(node)
    };

    let mut new_gaps: Vec<String> = gaps[..=first].to_vec();
    let mut children: Vec<ChildEntry> = entries[..first].to_vec();
    if replacements.is_empty() {
        // Slot emptied: drop the occupants and their trailing separators.
        new_gaps.extend_from_slice(&gaps[last + 2..]);
    } else {
        for (i, entry) in new_entries(replacements).into_iter().enumerate() {
            if i > 0 {
                new_gaps.push(sep.clone());
            }
            children.push(entry);
        }
        new_gaps.push(gaps[last + 1].clone());
        new_gaps.extend_from_slice(&gaps[last + 2..]);
    }
    children.extend_from_slice(&entries[last + 1..]);
    Ok(node.rebuild(new_gaps, children))
}

/// Split a gap before its trailing run of closing delimiters, so children
/// appended to an empty delimited list land inside the delimiters.
fn split_closing(gap: &str) -> (&str, &str) {
    let tail: usize = gap
        .chars()
        .rev()
        .take_while(|c| matches!(c, ')' | ']' | '}' | '>'))
        .map(char::len_utf8)
        .sum();
    gap.split_at(gap.len() - tail)
}

/// Separator for a sibling inserted before child `idx`: the gap between
/// existing siblings when one is visible, else the language default for the
/// parent's shape.
fn sibling_separator(parent: &Ast, idx: usize) -> String {
    let gaps = parent.gaps();
    let count = parent.child_entries().len();
    if idx + 1 < count && !gaps[idx + 1].is_empty() {
        return gaps[idx + 1].clone();
    }
    if idx > 0 && !gaps[idx].is_empty() {
        return gaps[idx].clone();
    }
    default_separator(parent)
}

fn default_separator(parent: &Ast) -> String {
    if parent.has_capability(Capability::Root) || parent.has_capability(Capability::Compound) {
        parent.language().statement_separator().to_string()
    } else {
        parent.language().argument_separator().to_string()
    }
}

/// Rebuild the spine above `target` after applying `edit` to its parent.
fn edit_parent<F>(root: &Ast, target: &Ast, edit: F) -> Result<Ast>
where
    F: FnOnce(&Ast, usize) -> Result<(Vec<String>, Vec<ChildEntry>)>,
{
    let chain = parents(root, target);
    let parent = chain.first().ok_or(AstError::TargetNotFound)?;
    let idx = child_index(parent, target)?;
    let (gaps, children) = edit(parent, idx)?;
    let mut current = parent.rebuild(gaps, children);
    let mut below = parent.clone();
    for ancestor in chain.into_iter().skip(1) {
        let i = child_index(&ancestor, &below)?;
        let mut children = ancestor.child_entries().to_vec();
        children[i].ast = current;
        current = ancestor.rebuild(ancestor.gaps().to_vec(), children);
        below = ancestor;
    }
    Ok(current)
}

fn child_index(parent: &Ast, child: &Ast) -> Result<usize> {
    parent
        .child_entries()
        .iter()
        .position(|e| e.ast.same(child))
        .ok_or(AstError::TargetNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::parse::parse;
    use pretty_assertions::assert_eq;

    fn first_statement(root: &Ast) -> Ast {
        root.children()[0].clone()
    }

    #[test]
    fn test_cut_statement() {
        let root = parse("x = 88\n", Language::Python).unwrap();
        let edited = cut(&root, &first_statement(&root)).unwrap();
        assert_eq!(edited.source_text(), "");
        assert_eq!(root.source_text(), "x = 88\n");
    }

    #[test]
    fn test_cut_middle_statement_takes_following_separator() {
        let root = parse("a\nb\nc\n", Language::Python).unwrap();
        let b = root.children()[1].clone();
        let edited = cut(&root, &b).unwrap();
        assert_eq!(edited.source_text(), "a\nc\n");
    }

    #[test]
    fn test_cut_from_fixed_slot_is_rejected() {
        let root = parse("x + 88", Language::Python).unwrap();
        let left = root.children()[0].children()[0].slot_one("left").unwrap();
        assert!(matches!(cut(&root, &left), Err(AstError::Slot(_))));
        assert!(matches!(cut(&root, &root), Err(AstError::Slot(_))));
    }

    #[test]
    fn test_replace_identifier_with_literal_text() {
        let root = parse("x = 88\n", Language::Python).unwrap();
        let x = root
            .traverse()
            .find(|a| a.kind() == "identifier")
            .unwrap();
        let edited = replace(&root, &x, "y").unwrap();
        assert_eq!(edited.source_text(), "y = 88\n");
        assert_eq!(root.source_text(), "x = 88\n");
    }

    #[test]
    fn test_replace_shares_untouched_siblings() {
        let root = parse("a\nb\nc\n", Language::Python).unwrap();
        let b = root.children()[1].clone();
        let edited = replace(&root, &b, "z").unwrap();
        assert_eq!(edited.source_text(), "a\nz\nc\n");
        assert!(edited.children()[0].same(&root.children()[0]));
        assert!(edited.children()[2].same(&root.children()[2]));
        assert!(!edited.same(&root));
    }

    #[test]
    fn test_replace_root_returns_replacement() {
        let root = parse("x = 88\n", Language::Python).unwrap();
        let other = parse("y = 1\n", Language::Python).unwrap();
        let edited = replace(&root, &root, &other).unwrap();
        assert!(edited.same(&other));
    }

    #[test]
    fn test_insert_statement_reuses_newline_separator() {
        let root = parse("x = 88\n", Language::Python).unwrap();
        let edited = insert(&root, &first_statement(&root), "y = 2").unwrap();
        assert_eq!(edited.source_text(), "y = 2\nx = 88\n");
    }

    #[test]
    fn test_insert_argument_reuses_comma_separator() {
        let root = parse("f(a, b)", Language::Python).unwrap();
        let b = root
            .traverse()
            .filter(|a| a.kind() == "identifier")
            .nth(2)
            .unwrap();
        assert_eq!(b.source_text(), "b");
        let edited = insert(&root, &b, "c").unwrap();
        assert_eq!(edited.source_text(), "f(a, c, b)");
    }

    #[test]
    fn test_insert_before_fixed_slot_is_rejected() {
        let root = parse("x + 88", Language::Python).unwrap();
        let left = root.children()[0].children()[0].slot_one("left").unwrap();
        assert!(matches!(insert(&root, &left, "y"), Err(AstError::Slot(_))));
    }

    #[test]
    fn test_copy_is_fresh_identity_same_structure() {
        let root = parse("x = 88\n", Language::Python).unwrap();
        let copied = copy(&root);
        assert_eq!(copied, root);
        assert!(!copied.same(&root));
        assert_ne!(copied.id(), root.id());
        assert!(copied.children()[0].same(&root.children()[0]));
    }

    #[test]
    fn test_copier_overrides_fixed_slot() {
        let root = parse("x + 1", Language::Python).unwrap();
        let binop = root.children()[0].children()[0].clone();
        let copied = copier(&binop).set("left", 0.5).build().unwrap();
        assert_eq!(copied.source_text(), "0.5 + 1");
        assert_eq!(binop.source_text(), "x + 1");
    }

    #[test]
    fn test_copier_unknown_or_empty_slot_is_rejected() {
        let root = parse("x + 1", Language::Python).unwrap();
        let binop = root.children()[0].children()[0].clone();
        assert!(matches!(
            copier(&binop).set("middle", "y").build(),
            Err(AstError::Slot(_))
        ));

        let assignment = parse("x = 1", Language::Python).unwrap().children()[0].children()[0]
            .clone();
        assert!(matches!(
            copier(&assignment).set("type", "int").build(),
            Err(AstError::Slot(_))
        ));
    }

    #[test]
    fn test_copier_replaces_variable_slot() {
        let root = parse("x = 88\n", Language::Python).unwrap();
        let copied = copier(&root)
            .set_many(
                "children",
                vec![Value::Text("y = 2".into()), (&first_statement(&root)).into()],
            )
            .build()
            .unwrap();
        assert_eq!(copied.source_text(), "y = 2\nx = 88\n");
    }

    #[test]
    fn test_copier_empty_children_substitutes_placeholder() {
        let root = parse("x = 88\n", Language::Python).unwrap();
        let copied = copier(&root).set_many("children", vec![]).build().unwrap();
        assert_eq!(copied.source_text(), "pass\n");
    }

    #[test]
    fn test_copier_fills_empty_argument_list() {
        let root = parse("f()", Language::Python).unwrap();
        let args = root
            .traverse()
            .find(|a| a.kind() == "argument_list")
            .unwrap();
        let copied = copier(&args)
            .set_many("children", vec!["x".into()])
            .build()
            .unwrap();
        assert_eq!(copied.source_text(), "(x)");

        let copied = copier(&args)
            .set_many("children", vec!["x".into(), "y".into()])
            .build()
            .unwrap();
        assert_eq!(copied.source_text(), "(x, y)");
    }

    #[test]
    fn test_copier_many_reuses_argument_separator() {
        let root = parse("f(a, b)", Language::Python).unwrap();
        let args = root
            .traverse()
            .find(|a| a.kind() == "argument_list")
            .unwrap();
        let copied = copier(&args)
            .set_many(
                "children",
                vec!["x".into(), "y".into(), "z".into()],
            )
            .build()
            .unwrap();
        assert_eq!(copied.source_text(), "(x, y, z)");
    }
}
