//! Import extraction and normalization.
//!
//! Each language's import forms are flattened into uniform
//! (module, alias, symbol) bindings so callers can resolve qualified names
//! without per-language knowledge.

use serde::Serialize;

use crate::registry::Capability;
use crate::tree::Ast;

/// One normalized import binding.
///
/// `module` is what gets imported, `alias` the local rename if any, and
/// `symbol` the member pulled out of the module for from-import forms
/// (`*` for wildcard imports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    pub module: String,
    pub alias: Option<String>,
    pub symbol: Option<String>,
}

impl ImportBinding {
    fn module(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            alias: None,
            symbol: None,
        }
    }
}

/// Import bindings visible at `at` within `root`: every import when `at` is
/// the root itself, otherwise only imports starting at or before it.
pub fn imports(root: &Ast, at: &Ast) -> Vec<ImportBinding> {
    let everything = at.same(root);
    let cutoff = at.range().start_byte;
    root.traverse()
        .filter(|n| n.has_capability(Capability::ImportStatement))
        .filter(|n| everything || n.range().start_byte <= cutoff)
        .flat_map(|stmt| normalize(&stmt))
        .collect()
}

fn normalize(stmt: &Ast) -> Vec<ImportBinding> {
    use crate::language::Language::*;
    match stmt.language() {
        Python => python_bindings(stmt),
        JavaScript | TypeScript | Tsx => js_bindings(stmt),
        Go => go_bindings(stmt),
        Rust => rust_bindings(stmt),
        Java => java_bindings(stmt),
        C | Cpp => c_bindings(stmt),
        // require/require_relative are plain method calls, not import nodes.
        Ruby => Vec::new(),
    }
}

fn text(node: &Ast) -> String {
    node.source_text().to_string()
}

fn unquote(source: &str) -> String {
    source
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '<' | '>'))
        .to_string()
}

fn python_bindings(stmt: &Ast) -> Vec<ImportBinding> {
    match stmt.kind() {
        "import_statement" => stmt
            .slot("name")
            .iter()
            .map(|name| {
                if name.kind() == "aliased_import" {
                    ImportBinding {
                        module: name.slot_one("name").map(|n| text(&n)).unwrap_or_default(),
                        alias: name.slot_one("alias").map(|a| text(&a)),
                        symbol: None,
                    }
                } else {
                    ImportBinding::module(text(name))
                }
            })
            .collect(),
        "import_from_statement" => {
            let module = stmt
                .slot_one("module_name")
                .map(|m| text(&m))
                .unwrap_or_default();
            let names = stmt.slot("name");
            if names.is_empty() {
                if stmt.traverse().any(|n| n.kind() == "wildcard_import") {
                    return vec![ImportBinding {
                        module,
                        alias: None,
                        symbol: Some("*".to_string()),
                    }];
                }
                return vec![ImportBinding::module(module)];
            }
            names
                .iter()
                .map(|name| {
                    if name.kind() == "aliased_import" {
                        ImportBinding {
                            module: module.clone(),
                            alias: name.slot_one("alias").map(|a| text(&a)),
                            symbol: name.slot_one("name").map(|n| text(&n)),
                        }
                    } else {
                        ImportBinding {
                            module: module.clone(),
                            alias: None,
                            symbol: Some(text(name)),
                        }
                    }
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

fn js_bindings(stmt: &Ast) -> Vec<ImportBinding> {
    let Some(module) = stmt.slot_one("source").map(|s| unquote(s.source_text())) else {
        return Vec::new();
    };
    let mut bindings = Vec::new();
    for node in stmt.traverse() {
        match node.kind() {
            "import_specifier" => bindings.push(ImportBinding {
                module: module.clone(),
                alias: node.slot_one("alias").map(|a| text(&a)),
                symbol: node.slot_one("name").map(|n| text(&n)),
            }),
            "namespace_import" => bindings.push(ImportBinding {
                module: module.clone(),
                alias: node
                    .traverse()
                    .find(|n| n.has_capability(Capability::Identifier))
                    .map(|n| text(&n)),
                symbol: None,
            }),
            _ => {}
        }
    }
    if bindings.is_empty() {
        bindings.push(ImportBinding::module(module));
    }
    bindings
}

fn go_bindings(stmt: &Ast) -> Vec<ImportBinding> {
    stmt.traverse()
        .filter(|n| n.kind() == "import_spec")
        .map(|spec| ImportBinding {
            module: spec
                .slot_one("path")
                .map(|p| unquote(p.source_text()))
                .unwrap_or_default(),
            alias: spec.slot_one("name").map(|n| text(&n)),
            symbol: None,
        })
        .collect()
}

fn rust_bindings(stmt: &Ast) -> Vec<ImportBinding> {
    let Some(argument) = stmt.slot_one("argument") else {
        return Vec::new();
    };
    if argument.kind() == "use_as_clause" {
        return vec![ImportBinding {
            module: argument
                .slot_one("path")
                .map(|p| text(&p))
                .unwrap_or_default(),
            alias: argument.slot_one("alias").map(|a| text(&a)),
            symbol: None,
        }];
    }
    vec![ImportBinding::module(text(&argument))]
}

fn java_bindings(stmt: &Ast) -> Vec<ImportBinding> {
    let module = stmt
        .children()
        .iter()
        .filter(|c| c.is_named())
        .map(|c| c.source_text())
        .collect::<Vec<_>>()
        .join(".");
    if module.is_empty() {
        Vec::new()
    } else {
        vec![ImportBinding::module(module)]
    }
}

fn c_bindings(stmt: &Ast) -> Vec<ImportBinding> {
    match stmt.slot_one("path") {
        Some(path) => vec![ImportBinding::module(unquote(path.source_text()))],
        None => Vec::new(),
    }
}
