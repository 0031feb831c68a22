//! Tree traversal iterators.

use super::node::Ast;

/// Pre-order traversal: each node before its children.
pub struct Traverse {
    stack: Vec<Ast>,
}

impl Iterator for Traverse {
    type Item = Ast;

    fn next(&mut self) -> Option<Ast> {
        let node = self.stack.pop()?;
        for entry in node.child_entries().iter().rev() {
            self.stack.push(entry.ast.clone());
        }
        Some(node)
    }
}

/// Post-order traversal: children before parents, siblings left to right.
pub struct PostTraverse {
    stack: Vec<(Ast, bool)>,
}

impl Iterator for PostTraverse {
    type Item = Ast;

    fn next(&mut self) -> Option<Ast> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                return Some(node);
            }
            self.stack.push((node.clone(), true));
            for entry in node.child_entries().iter().rev() {
                self.stack.push((entry.ast.clone(), false));
            }
        }
    }
}

impl Ast {
    /// Iterate this subtree in pre-order.
    pub fn traverse(&self) -> Traverse {
        Traverse {
            stack: vec![self.clone()],
        }
    }

    /// Iterate this subtree in post-order.
    pub fn post_traverse(&self) -> PostTraverse {
        PostTraverse {
            stack: vec![(self.clone(), false)],
        }
    }
}
