//! Language-Agnostic AST Engine
//!
//! Immutable, queryable, editable syntax trees over tree-sitter grammars.
//! Source parses into trees that round-trip to the original text verbatim;
//! edits, templates, and transforms synthesize new trees and share every
//! untouched subtree with their input.

pub mod edit;
pub mod error;
pub mod language;
pub mod parse;
pub mod path;
pub mod query;
pub mod registry;
pub mod template;
pub mod transform;
pub mod tree;

pub use edit::{copier, copy, cut, insert, replace, Copier};
pub use error::{AstError, Result};
pub use language::Language;
pub use parse::{parse, parse_with, ParseOptions};
pub use path::{ast_at_point, lookup, parent, parents, path, PathStep};
pub use query::{
    call_asts, function_asts, imports, scope_bindings, vars_in_scope, CallAst, FunctionAst,
    ImportBinding, ScopeBinding,
};
pub use registry::{Capability, CapabilitySet, Registry, SlotArity, SlotSpec, TypeSchema};
pub use template::Template;
pub use transform::transform;
pub use tree::{Ast, ChildEntry, NodeId, Point, SourceRange, Value};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::edit::{copier, copy, cut, insert, replace};
    pub use crate::error::{AstError, Result};
    pub use crate::language::Language;
    pub use crate::parse::{parse, parse_with, ParseOptions};
    pub use crate::path::{ast_at_point, lookup, parent, parents, path};
    pub use crate::query::*;
    pub use crate::template::Template;
    pub use crate::transform::transform;
    pub use crate::tree::{Ast, Point, SourceRange, Value};
}
