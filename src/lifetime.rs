//! Registration lifetime definitions.

/// Lifetime policy controlling where, and how often, a registration is built.
///
/// The three policies share one per-container cache; what differs is which
/// container in a hierarchy is allowed to populate or reuse a cached entry.
///
/// # Examples
///
/// ```rust
/// use layered_di::{Container, Recipe};
/// use std::sync::Arc;
///
/// #[derive(Clone)]
/// struct Session;
///
/// let root = Container::new();
/// root.register("session", Recipe::blueprint(Session))
///     .unwrap()
///     .singleton_per_container();
///
/// let child = root.create_child_container().unwrap();
/// let a = root.resolve_as::<Session>("session").unwrap();
/// let b = child.resolve_as::<Session>("session").unwrap();
/// assert!(!Arc::ptr_eq(&a, &b)); // one per container level
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "camelCase"))]
pub enum Lifetime {
    /// One instance for the whole container tree
    ///
    /// Built and cached by the container that owns the registration.
    /// Descendants that merely inherit the registration delegate to that
    /// owner, so the instance is never duplicated further down the tree.
    Singleton,
    /// One instance per container level that resolves it
    ///
    /// A descendant never reuses an instance cached by an ancestor; it
    /// builds and caches its own on first resolution.
    SingletonPerContainer,
    /// Caller-supplied instance
    ///
    /// Never constructed and never disposed by the container. Shared as-is
    /// by every descendant.
    External,
}

impl Lifetime {
    /// Whether instances built under this lifetime are stored in the cache.
    pub fn is_cached(self) -> bool {
        matches!(self, Lifetime::Singleton | Lifetime::SingletonPerContainer)
    }
}
