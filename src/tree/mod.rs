//! Immutable AST value model.
//!
//! This module provides:
//! - The shared-ownership [`Ast`] handle over immutable node data
//! - Slot-addressed children with verbatim interstitial text
//! - Literal-or-AST argument values for edits, templates, and transforms
//! - Pre-order and post-order traversal iterators

pub mod node;
pub mod traverse;
pub mod value;

pub use node::{Ast, ChildEntry, NodeId, Point, SourceRange};
pub use traverse::{PostTraverse, Traverse};
pub use value::Value;
