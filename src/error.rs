//! Error types for the dependency injection container.

use std::sync::Arc;

/// Dependency injection errors
///
/// Every failure surfaces synchronously from the operation that caused it.
/// Nothing is retried and nothing is partially committed: an error anywhere in
/// a dependency chain aborts the whole `resolve` call.
///
/// # Examples
///
/// ```rust
/// use layered_di::{Container, DiError};
///
/// let container = Container::new();
/// match container.resolve("missing") {
///     Err(DiError::UnknownDependency(name)) => assert_eq!(name, "missing"),
///     _ => unreachable!(),
/// }
///
/// let circular = DiError::CircularDependency(vec!["a".into(), "b".into(), "a".into()]);
/// assert_eq!(circular.to_string(), "Circular dependency: a -> b -> a");
/// ```
#[derive(thiserror::Error, Debug, Clone)]
pub enum DiError {
    /// Operation attempted on a container after `dispose()`
    #[error("Container has been disposed")]
    ContainerDisposed,

    /// No registration visible under this name
    #[error("Dependency not registered: {0}")]
    UnknownDependency(String),

    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),

    /// A structured key names a resolver kind nobody registered
    #[error("No resolver registered for dependency kind '{kind}' (required by '{name}')")]
    UnresolvableDependencyKind { kind: String, name: String },

    /// A dependency list entry that is neither a name nor a usable structured key
    #[error("Malformed dependency key at index {index} of '{name}': {reason}")]
    MalformedDependencyKey {
        name: String,
        index: usize,
        reason: &'static str,
    },

    /// A resolver plugin was handed a structured key lacking the data it reads
    ///
    /// Raised when a plugin is invoked outside a registration build; keys in
    /// a dependency list are checked up front and reported as
    /// `MalformedDependencyKey` instead.
    #[error("Structured key of kind '{kind}' is unusable: {reason}")]
    InvalidStructuredKey { kind: String, reason: &'static str },

    /// Downcast of a resolved instance failed
    #[error("Type mismatch for '{name}': expected {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    /// A recipe asked for a construction argument that was not declared
    #[error("Missing construction argument {index} for '{name}'")]
    MissingArgument { name: String, index: usize },

    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),

    /// Failure raised by a recipe's own construction logic
    #[error("Construction failed: {0}")]
    Construction(Arc<dyn std::error::Error + Send + Sync>),
}

impl DiError {
    /// Wraps an arbitrary error raised while building an instance.
    pub fn construction<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        DiError::Construction(Arc::new(error))
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
