//! Semantic queries over capability-tagged nodes.
//!
//! Wrappers for function definitions and call expressions expose the parts
//! every language shares (name, parameters, body, callee, arguments), with
//! the per-language slot differences resolved here once. Import and scope
//! queries live in the submodules.

pub mod imports;
pub mod scope;

pub use imports::{imports, ImportBinding};
pub use scope::{scope_bindings, vars_in_scope, ScopeBinding};

use crate::registry::Capability;
use crate::tree::Ast;

/// First occupant of `slot` on the node or in its subtree, without crossing
/// into nested lexical scopes. Covers languages where a slot lives on an
/// inner wrapper, like parameters under a C function declarator.
pub(crate) fn find_slot(node: &Ast, slot: &str) -> Option<Ast> {
    for entry in node.child_entries() {
        if entry.slot.eq_ignore_ascii_case(slot) {
            return Some(entry.ast.clone());
        }
    }
    for entry in node.child_entries() {
        if entry.ast.has_capability(Capability::LexicalScope) {
            continue;
        }
        if let Some(found) = find_slot(&entry.ast, slot) {
            return Some(found);
        }
    }
    None
}

fn first_identifier(node: &Ast) -> Option<Ast> {
    node.traverse()
        .find(|n| n.has_capability(Capability::Identifier))
}

/// A function definition of any supported language.
#[derive(Debug, Clone)]
pub struct FunctionAst {
    ast: Ast,
}

impl FunctionAst {
    /// Wrap a node if it is a function definition.
    pub fn of(ast: &Ast) -> Option<Self> {
        ast.has_capability(Capability::FunctionDefinition)
            .then(|| Self { ast: ast.clone() })
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The node carrying the function's name. Anonymous functions (lambdas,
    /// closures) have none; C-style definitions find it inside the
    /// declarator.
    pub fn name(&self) -> Option<Ast> {
        if let Some(name) = self.ast.slot_one("name") {
            return Some(name);
        }
        self.ast
            .slot_one("declarator")
            .as_ref()
            .and_then(first_identifier)
    }

    pub fn name_text(&self) -> Option<String> {
        self.name().map(|n| n.source_text().to_string())
    }

    /// Parameter nodes in declaration order, comments excluded.
    pub fn parameters(&self) -> Vec<Ast> {
        let Some(list) = find_slot(&self.ast, "parameters") else {
            return Vec::new();
        };
        list.children()
            .into_iter()
            .filter(|p| p.is_named() && p.kind() != "comment")
            .collect()
    }

    pub fn body(&self) -> Option<Ast> {
        self.ast.slot_one("body")
    }
}

/// A call expression of any supported language.
#[derive(Debug, Clone)]
pub struct CallAst {
    ast: Ast,
}

impl CallAst {
    /// Wrap a node if it is a call expression.
    pub fn of(ast: &Ast) -> Option<Self> {
        ast.has_capability(Capability::CallExpression)
            .then(|| Self { ast: ast.clone() })
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The callee expression: a bare name, or the attribute/member/selector
    /// expression being invoked.
    pub fn callee(&self) -> Option<Ast> {
        self.ast
            .slot_one("function")
            .or_else(|| self.ast.slot_one("name"))
            .or_else(|| self.ast.slot_one("method"))
    }

    /// Rendered callee, with receiver-style calls joined by a dot.
    pub fn callee_text(&self) -> Option<String> {
        let callee = self.callee()?;
        let receiver = self
            .ast
            .slot_one("object")
            .or_else(|| self.ast.slot_one("receiver"));
        match receiver {
            Some(receiver) => Some(format!(
                "{}.{}",
                receiver.source_text(),
                callee.source_text()
            )),
            None => Some(callee.source_text().to_string()),
        }
    }

    /// Argument nodes in call order, comments excluded.
    pub fn arguments(&self) -> Vec<Ast> {
        let Some(list) = self.ast.slot_one("arguments") else {
            return Vec::new();
        };
        list.children()
            .into_iter()
            .filter(|a| a.is_named() && a.kind() != "comment")
            .collect()
    }

    /// The module qualifier providing this call's callee, resolved against
    /// the imports visible at the call site.
    ///
    /// A dotted callee yields its qualifier with any import alias expanded
    /// back to the module it names; a bare callee resolves through
    /// from-import symbols and yields the providing module, or nothing.
    pub fn provided_by(&self, root: &Ast) -> Option<String> {
        let callee = self.callee_text()?;
        let visible = imports(root, &self.ast);
        match callee.rfind('.') {
            Some(dot) => {
                let qualifier = &callee[..dot];
                let base = qualifier.split('.').next()?;
                for binding in &visible {
                    if binding.alias.as_deref() == Some(base) {
                        return Some(format!("{}{}", binding.module, &qualifier[base.len()..]));
                    }
                }
                Some(qualifier.to_string())
            }
            None => visible
                .iter()
                .find(|b| b.symbol.as_deref() == Some(callee.as_str()))
                .map(|b| b.module.clone()),
        }
    }
}

/// All function definitions under `root`, in pre-order.
pub fn function_asts(root: &Ast) -> Vec<FunctionAst> {
    root.traverse()
        .filter_map(|node| FunctionAst::of(&node))
        .collect()
}

/// All call expressions under `root`, in pre-order.
pub fn call_asts(root: &Ast) -> Vec<CallAst> {
    root.traverse()
        .filter_map(|node| CallAst::of(&node))
        .collect()
}
