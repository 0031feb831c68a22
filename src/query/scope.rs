//! Lexical scope queries.
//!
//! Scope membership is capability-driven: any node tagged as a lexical
//! scope contributes its parameter and declaration bindings, and a lookup
//! walks the enclosing scopes innermost first with inner names shadowing
//! outer ones.

use serde::Serialize;

use crate::path::parents;
use crate::registry::Capability;
use crate::tree::Ast;

use super::find_slot;

/// A name visible at some point in the tree, with the scope that owns it
/// and the node that declares it.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeBinding {
    pub name: String,
    #[serde(skip)]
    pub scope: Ast,
    #[serde(skip)]
    pub decl: Ast,
}

/// Names visible at `at`, innermost scope first, shadowed names removed.
///
/// Module-level bindings are skipped unless `keep_globals` is set.
pub fn vars_in_scope(root: &Ast, at: &Ast, keep_globals: bool) -> Vec<ScopeBinding> {
    let mut scopes = parents(root, at);
    if at.same(root) {
        scopes.push(root.clone());
    }
    let mut out: Vec<ScopeBinding> = Vec::new();
    for scope in scopes {
        if !scope.has_capability(Capability::LexicalScope) {
            continue;
        }
        if !keep_globals && scope.has_capability(Capability::Root) {
            continue;
        }
        for binding in scope_bindings(&scope) {
            if !out.iter().any(|b| b.name == binding.name) {
                out.push(binding);
            }
        }
    }
    out
}

/// Bindings a single scope introduces: its parameters first, then the
/// declarations directly inside it, in source order. Declarations inside
/// nested scopes belong to those scopes and are not included, but a nested
/// scope's own name (a function or class definition) is.
pub fn scope_bindings(scope: &Ast) -> Vec<ScopeBinding> {
    let mut out = Vec::new();

    if scope.has_capability(Capability::FunctionDefinition) {
        if let Some(parameters) = find_slot(scope, "parameters") {
            for parameter in parameters.children() {
                if !parameter.is_named() || parameter.kind() == "comment" {
                    continue;
                }
                if let Some(id) = binding_identifier(&parameter) {
                    out.push(ScopeBinding {
                        name: id.source_text().to_string(),
                        scope: scope.clone(),
                        decl: id,
                    });
                }
            }
        }
    }

    let mut stack: Vec<Ast> = scope.children().into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.has_capability(Capability::LexicalScope) {
            if let Some(name) = node.slot_one("name") {
                out.push(ScopeBinding {
                    name: name.source_text().to_string(),
                    scope: scope.clone(),
                    decl: node,
                });
            }
            continue;
        }
        for decl in declared_identifiers(&node) {
            out.push(ScopeBinding {
                name: decl.source_text().to_string(),
                scope: scope.clone(),
                decl,
            });
        }
        for child in node.children().into_iter().rev() {
            stack.push(child);
        }
    }
    out
}

/// The identifiers a single declaration-like node binds.
fn declared_identifiers(node: &Ast) -> Vec<Ast> {
    match node.kind() {
        "assignment" | "augmented_assignment" | "assignment_expression" => node
            .slot_one("left")
            .filter(|l| l.has_capability(Capability::Identifier))
            .into_iter()
            .collect(),
        "variable_declarator" => node
            .slot_one("name")
            .and_then(|n| binding_identifier(&n))
            .into_iter()
            .collect(),
        "let_declaration" => node
            .slot_one("pattern")
            .filter(|p| p.has_capability(Capability::Identifier))
            .into_iter()
            .collect(),
        "init_declarator" => node
            .slot_one("declarator")
            .and_then(|d| binding_identifier(&d))
            .into_iter()
            .collect(),
        "short_var_declaration" => node
            .slot("left")
            .iter()
            .flat_map(|l| l.children())
            .filter(|c| c.has_capability(Capability::Identifier))
            .collect(),
        _ => Vec::new(),
    }
}

fn binding_identifier(node: &Ast) -> Option<Ast> {
    node.traverse()
        .find(|n| n.has_capability(Capability::Identifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::parse::parse;
    use pretty_assertions::assert_eq;

    fn names(bindings: &[ScopeBinding]) -> Vec<&str> {
        bindings.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_parameters_then_globals() {
        let source = "b = 1\ndef bar(a):\n    return a\n";
        let root = parse(source, Language::Python).unwrap();
        let ret = root
            .traverse()
            .find(|n| n.kind() == "return_statement")
            .unwrap();
        let bindings = vars_in_scope(&root, &ret, true);
        assert_eq!(names(&bindings), vec!["a", "b", "bar"]);
        assert!(!vars_in_scope(&root, &ret, false)
            .iter()
            .any(|b| b.name == "b"));
    }

    #[test]
    fn test_inner_shadows_outer() {
        let source = "x = 1\ndef f(x):\n    return x\n";
        let root = parse(source, Language::Python).unwrap();
        let ret = root
            .traverse()
            .find(|n| n.kind() == "return_statement")
            .unwrap();
        let bindings = vars_in_scope(&root, &ret, true);
        assert_eq!(names(&bindings), vec!["x", "f"]);
        assert_eq!(bindings[0].decl.range().start.line, 2);
    }

    #[test]
    fn test_nested_function_binds_its_name_only() {
        let source = "def outer():\n    y = 1\n    def inner(z):\n        return z\n    return inner\n";
        let root = parse(source, Language::Python).unwrap();
        let outer = root
            .traverse()
            .find(|n| n.kind() == "function_definition")
            .unwrap();
        let bindings = scope_bindings(&outer);
        assert_eq!(names(&bindings), vec!["y", "inner"]);
    }

    #[test]
    fn test_typed_and_defaulted_parameters() {
        let source = "def f(a: int, b=2):\n    return a\n";
        let root = parse(source, Language::Python).unwrap();
        let f = root
            .traverse()
            .find(|n| n.kind() == "function_definition")
            .unwrap();
        assert_eq!(names(&scope_bindings(&f)), vec!["a", "b"]);
    }

    #[test]
    fn test_scope_of_binding_is_recorded() {
        let source = "def f(a):\n    return a\n";
        let root = parse(source, Language::Python).unwrap();
        let ret = root
            .traverse()
            .find(|n| n.kind() == "return_statement")
            .unwrap();
        let bindings = vars_in_scope(&root, &ret, true);
        assert_eq!(bindings[0].scope.kind(), "function_definition");
        assert_eq!(bindings[1].name, "f");
        assert_eq!(bindings[1].scope.kind(), "module");
    }

    #[test]
    fn test_javascript_declarators() {
        let source = "function f(p) {\n  let q = 1;\n  return q;\n}\n";
        let root = parse(source, Language::JavaScript).unwrap();
        let ret = root
            .traverse()
            .find(|n| n.kind() == "return_statement")
            .unwrap();
        assert_eq!(names(&vars_in_scope(&root, &ret, false)), vec!["p", "q"]);
        assert_eq!(
            names(&vars_in_scope(&root, &ret, true)),
            vec!["p", "q", "f"]
        );
    }
}
