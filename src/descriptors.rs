//! Registration descriptors for introspection and diagnostics.

use crate::lifetime::Lifetime;
use crate::recipe::RecipeKind;

/// Snapshot of one registration visible from a container
///
/// Produced by [`Container::descriptors`](crate::Container::descriptors).
/// A name registered both locally and by an ancestor appears once, describing
/// the local registration that shadows the ancestor's.
///
/// # Examples
///
/// ```rust
/// use layered_di::{Container, Lifetime, Recipe};
///
/// #[derive(Clone)]
/// struct Db;
///
/// let root = Container::new();
/// root.register_instance("url", "postgres://localhost".to_string()).unwrap();
/// root.register_with("db", Recipe::blueprint(Db), ["url"]).unwrap();
///
/// let child = root.create_child_container().unwrap();
/// child.register("db", Recipe::blueprint(Db)).unwrap().singleton_per_container();
///
/// let descriptors = child.descriptors();
/// let db = descriptors.iter().find(|d| d.name == "db").unwrap();
/// assert!(db.owned);
/// assert_eq!(db.dependency_count, 0);
/// assert_eq!(db.lifetime, Lifetime::SingletonPerContainer);
///
/// let url = descriptors.iter().find(|d| d.name == "url").unwrap();
/// assert!(!url.owned);
/// assert_eq!(url.lifetime, Lifetime::External);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDescriptor {
    /// Registration name
    pub name: String,
    /// Current lifetime policy
    pub lifetime: Lifetime,
    /// Number of declared dependency keys
    pub dependency_count: usize,
    /// Shape of the recipe
    pub recipe_kind: RecipeKind,
    /// Whether the describing container defines this registration itself
    pub owned: bool,
}

impl RegistrationDescriptor {
    pub fn is_external(&self) -> bool {
        self.lifetime == Lifetime::External
    }
}
