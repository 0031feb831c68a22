//! Literal-or-AST argument values.
//!
//! Edits, templates, and transforms all accept either an existing AST node
//! or a literal. AST nodes splice by their own source text; strings are raw
//! source text auto-parsed in the enclosing language; numbers and booleans
//! are printed per the language's literal syntax and then parsed.

use crate::error::Result;
use crate::language::Language;
use crate::parse::{parse_with, ParseOptions};
use crate::tree::node::Ast;

/// An argument that is either an AST node or a literal.
#[derive(Debug, Clone)]
pub enum Value {
    Ast(Ast),
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Render the value as source text in the given language.
    pub fn to_source(&self, language: Language) -> String {
        match self {
            Value::Ast(ast) => ast.source_text().to_string(),
            Value::Text(text) => text.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => language.print_bool(*b).to_string(),
        }
    }

    /// Materialize the value as an AST node in the given language.
    ///
    /// AST values are used verbatim; everything else is printed and parsed
    /// down to its most specific node.
    pub fn to_ast(&self, language: Language) -> Result<Ast> {
        match self {
            Value::Ast(ast) => Ok(ast.clone()),
            other => parse_with(
                &other.to_source(language),
                language,
                ParseOptions {
                    deepest: true,
                    ..ParseOptions::default()
                },
            ),
        }
    }
}

impl From<Ast> for Value {
    fn from(ast: Ast) -> Self {
        Value::Ast(ast)
    }
}

impl From<&Ast> for Value {
    fn from(ast: &Ast) -> Self {
        Value::Ast(ast.clone())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
