//! Supported languages and their source-level conventions.
//!
//! The language enumeration is closed but growable: adding a language means
//! adding a grammar crate, a variant here, and a schema table in the
//! registry. Everything else in the engine is language-agnostic.

use serde::{Deserialize, Serialize};

use crate::error::{AstError, Result};

/// Supported programming languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Go,
    Rust,
    Java,
    C,
    Cpp,
    Ruby,
}

impl Language {
    /// All supported languages, in registry order.
    pub const ALL: [Language; 10] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Tsx,
        Language::Go,
        Language::Rust,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::Ruby,
    ];

    /// Resolve a language from a string identifier.
    ///
    /// This is the language-not-supported failure path: unrecognized names
    /// are rejected rather than guessed at.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "tsx" => Ok(Language::Tsx),
            "go" | "golang" => Ok(Language::Go),
            "rust" | "rs" => Ok(Language::Rust),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            "ruby" | "rb" => Ok(Language::Ruby),
            other => Err(AstError::UnsupportedLanguage(other.to_string())),
        }
    }

    /// Get a string representation of the language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Ruby => "ruby",
        }
    }

    /// Get the tree-sitter grammar for this language.
    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::language(),
            Language::JavaScript => tree_sitter_javascript::language(),
            Language::TypeScript => tree_sitter_typescript::language_typescript(),
            Language::Tsx => tree_sitter_typescript::language_tsx(),
            Language::Go => tree_sitter_go::language(),
            Language::Rust => tree_sitter_rust::language(),
            Language::Java => tree_sitter_java::language(),
            Language::C => tree_sitter_c::language(),
            Language::Cpp => tree_sitter_cpp::language(),
            Language::Ruby => tree_sitter_ruby::language(),
        }
    }

    /// Separator spliced between sibling statements when editing inserts
    /// into a statement-level slot without a reusable gap.
    pub fn statement_separator(&self) -> &'static str {
        "\n"
    }

    /// Separator spliced between sequence values in templates and between
    /// siblings in expression-level slots.
    pub fn argument_separator(&self) -> &'static str {
        ", "
    }

    /// A no-op statement that keeps a body grammar-valid when every real
    /// statement has been elided.
    pub fn placeholder_statement(&self) -> &'static str {
        match self {
            Language::Python => "pass",
            Language::Ruby => "nil",
            _ => ";",
        }
    }

    /// Print a boolean per the language's literal syntax.
    pub fn print_bool(&self, value: bool) -> &'static str {
        match self {
            Language::Python => {
                if value {
                    "True"
                } else {
                    "False"
                }
            }
            _ => {
                if value {
                    "true"
                } else {
                    "false"
                }
            }
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Language::from_name("python").unwrap(), Language::Python);
        assert_eq!(Language::from_name("RUST").unwrap(), Language::Rust);
        assert_eq!(Language::from_name("c++").unwrap(), Language::Cpp);
    }

    #[test]
    fn test_unknown_language_rejected() {
        let err = Language::from_name("foo").unwrap_err();
        assert!(matches!(err, AstError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_literal_conventions() {
        assert_eq!(Language::Python.print_bool(true), "True");
        assert_eq!(Language::Rust.print_bool(true), "true");
        assert_eq!(Language::Python.placeholder_statement(), "pass");
        assert_eq!(Language::C.placeholder_statement(), ";");
    }
}
