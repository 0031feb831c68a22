//! Node type registry: per-language slot schemas and capability tags.
//!
//! Maps `(language, grammar node kind)` to a slot schema and a set of
//! cross-language capability tags. Generic algorithms (queries, tag-driven
//! transforms) dispatch on capabilities, never on concrete kinds, and the
//! capability set is resolved once when a node is built rather than at each
//! query site.
//!
//! Tables are hand-authored per language in [`tables`]; kinds without an
//! entry fall back to a schema derived from the node's actual children.

pub mod tables;

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Grammar kind of a leaf wrapping one unparsable token.
pub const FRAGMENT_KIND: &str = "source_text_fragment";

/// Grammar kind of a node wrapping a whole contiguous unparsable run.
pub const FRAGMENT_TREE_KIND: &str = "source_text_fragment_tree";

/// Grammar kind of the wrapper holding per-token fragments.
pub const VARIATION_POINT_KIND: &str = "error_variation_point";

/// Name of the generic variable-arity slot holding unnamed children.
pub const CHILDREN_SLOT: &str = "children";

/// Arity of a child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotArity {
    /// Exactly one child; exposed through named accessors.
    One,
    /// Zero or more children in order.
    Many,
}

/// A named, arity-constrained attachment point for children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: String,
    pub arity: SlotArity,
}

impl SlotSpec {
    pub fn new(name: impl Into<String>, arity: SlotArity) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// Cross-language marker classifying a node's semantic role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Top-level node of a parsed file.
    Root,
    /// Statement-sequence body (block, compound statement).
    Compound,
    /// A statement wrapping a bare expression.
    ExpressionStatement,
    /// A bare identifier.
    Identifier,
    /// A function, method, or lambda definition.
    FunctionDefinition,
    /// A call site.
    CallExpression,
    /// An import/include/use statement.
    ImportStatement,
    /// A node opening a lexical scope.
    LexicalScope,
    /// A variation point covering source that failed to parse.
    ErrorRegion,
}

impl Capability {
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// A small set of capability tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    pub fn contains(&self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut bits = 0;
        for cap in iter {
            bits |= cap.bit();
        }
        CapabilitySet(bits)
    }
}

impl From<&[Capability]> for CapabilitySet {
    fn from(caps: &[Capability]) -> Self {
        caps.iter().copied().collect()
    }
}

/// Schema for one grammar node kind: ordered slots plus capability tags.
///
/// Named fixed-one slots precede the variable slot in declaration order.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    pub slots: Vec<SlotSpec>,
    pub caps: CapabilitySet,
}

impl TypeSchema {
    pub fn new(slots: &[(&str, SlotArity)], caps: &[Capability]) -> Self {
        Self {
            slots: slots
                .iter()
                .map(|(name, arity)| SlotSpec::new(*name, *arity))
                .collect(),
            caps: caps.into(),
        }
    }

    /// Arity of a named slot, if declared.
    pub fn slot_arity(&self, name: &str) -> Option<SlotArity> {
        self.slots
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.arity)
    }
}

/// Closed per-language table of node type schemas.
#[derive(Debug, Default)]
pub struct Registry {
    map: HashMap<Language, HashMap<&'static str, TypeSchema>>,
}

impl Registry {
    /// Build the registry from the hand-authored per-language tables.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for language in Language::ALL {
            registry
                .map
                .insert(language, tables::table_for(language).into_iter().collect());
        }
        registry
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        lazy_static! {
            static ref REGISTRY: Registry = Registry::builtin();
        }
        &REGISTRY
    }

    /// Look up the schema for a grammar node kind, if one is declared.
    pub fn schema(&self, language: Language, kind: &str) -> Option<&TypeSchema> {
        self.map.get(&language).and_then(|kinds| kinds.get(kind))
    }

    /// Capability tags for a grammar node kind.
    ///
    /// Variation-point kinds carry `ErrorRegion` in every language; kinds
    /// with no table entry carry no tags.
    pub fn capabilities(&self, language: Language, kind: &str) -> CapabilitySet {
        if matches!(
            kind,
            FRAGMENT_KIND | FRAGMENT_TREE_KIND | VARIATION_POINT_KIND
        ) {
            return [Capability::ErrorRegion].into_iter().collect();
        }
        self.schema(language, kind)
            .map(|s| s.caps)
            .unwrap_or_default()
    }

    /// Grammar kinds declared for a language.
    pub fn kinds(&self, language: Language) -> Vec<&'static str> {
        self.map
            .get(&language)
            .map(|kinds| kinds.keys().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_set() {
        let caps: CapabilitySet = [Capability::Root, Capability::LexicalScope]
            .into_iter()
            .collect();
        assert!(caps.contains(Capability::Root));
        assert!(caps.contains(Capability::LexicalScope));
        assert!(!caps.contains(Capability::CallExpression));
    }

    #[test]
    fn test_python_schema_lookup() {
        let registry = Registry::global();
        let schema = registry.schema(Language::Python, "binary_operator").unwrap();
        let names: Vec<_> = schema.slots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["left", "operator", "right", "children"]);
        assert_eq!(schema.slot_arity("right"), Some(SlotArity::One));
        assert_eq!(schema.slot_arity("children"), Some(SlotArity::Many));
    }

    #[test]
    fn test_fragment_kinds_carry_error_region() {
        let registry = Registry::global();
        for kind in [FRAGMENT_KIND, FRAGMENT_TREE_KIND, VARIATION_POINT_KIND] {
            let caps = registry.capabilities(Language::C, kind);
            assert!(caps.contains(Capability::ErrorRegion), "{kind}");
        }
    }

    #[test]
    fn test_every_language_has_a_root_kind() {
        let registry = Registry::global();
        for language in Language::ALL {
            let has_root = registry
                .kinds(language)
                .iter()
                .any(|k| registry.capabilities(language, k).contains(Capability::Root));
            assert!(has_root, "{language} has no Root-tagged kind");
        }
    }
}
