//! Error type for AST engine operations.

/// Result type alias for AST engine operations.
pub type Result<T> = std::result::Result<T, AstError>;

/// The single error kind raised by AST engine operations.
///
/// Parse errors in source text are deliberately *not* represented here;
/// they become variation-point nodes in the tree so that queries and
/// transforms keep working over syntactically broken input.
#[derive(Debug, thiserror::Error)]
pub enum AstError {
    /// The requested language has no grammar in the registry.
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    /// A template placeholder had no bound argument, or the bound
    /// arguments did not match the template's own placeholder numbering.
    #[error("Template error: {0}")]
    Template(String),

    /// An edit target was not reachable from the given root.
    #[error("Edit target not found under the given root")]
    TargetNotFound,

    /// A slot was missing, or an edit violated its declared arity.
    #[error("Slot error: {0}")]
    Slot(String),

    /// The parser or a template expansion produced no usable node.
    #[error("No parseable node: {0}")]
    EmptyParse(String),

    /// A transform visitor aborted the pass.
    #[error("Transform visitor failed: {0}")]
    Transform(String),
}
