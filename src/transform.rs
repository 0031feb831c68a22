//! Whole-tree rewriting.
//!
//! A transform walks the tree bottom-up and asks a visitor about every
//! node. Returning a value replaces that node (the replacement is taken as
//! given and not visited again); returning `None` keeps the node, rebuilt
//! only when some descendant changed. Subtrees the visitor never touches
//! are shared between the input and the result, and any visitor error
//! aborts the whole transform with the input tree untouched.

use crate::error::Result;
use crate::tree::{Ast, Value};

/// Rewrite `root` with a visitor, returning the new root.
///
/// The visitor runs post-order and always sees nodes of the ORIGINAL tree,
/// so its decisions cannot observe earlier rewrites.
pub fn transform<F>(root: &Ast, mut visitor: F) -> Result<Ast>
where
    F: FnMut(&Ast) -> Result<Option<Value>>,
{
    walk(root, &mut visitor)
}

fn walk<F>(node: &Ast, visitor: &mut F) -> Result<Ast>
where
    F: FnMut(&Ast) -> Result<Option<Value>>,
{
    let mut children = node.child_entries().to_vec();
    let mut changed = false;
    for entry in &mut children {
        let rewritten = walk(&entry.ast, visitor)?;
        if !rewritten.same(&entry.ast) {
            entry.ast = rewritten;
            changed = true;
        }
    }
    match visitor(node)? {
        Some(value) => value.to_ast(node.language()),
        None if changed => Ok(node.rebuild(node.gaps().to_vec(), children)),
        None => Ok(node.clone()),
    }
}
