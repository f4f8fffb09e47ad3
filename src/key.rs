//! Dependency keys declared by registrations.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::container::Container;
use crate::error::DiResult;
use crate::instance::Instance;

/// Kind tag handled by the built-in `factory` resolver.
pub const FACTORY_KIND: &str = "factory";
/// Kind tag handled by the built-in `autoFactory` resolver.
pub const AUTO_FACTORY_KIND: &str = "autoFactory";

pub(crate) type KeyResolveFn = Arc<dyn Fn(&Container) -> DiResult<Instance> + Send + Sync>;

/// One entry of a registration's dependency list.
///
/// Plain names are resolved against the same container; structured keys are
/// handed to the resolver plugin registered for their kind.
///
/// # Examples
///
/// ```rust
/// use layered_di::DependencyKey;
///
/// let deps = [
///     DependencyKey::from("logger"),
///     DependencyKey::auto_factory("worker"),
///     DependencyKey::from(DependencyKey::structured("env").with_param("var", "HOME")),
/// ];
/// assert_eq!(deps[0].name(), Some("logger"));
/// assert_eq!(deps[1].kind(), Some("autoFactory"));
/// ```
#[derive(Clone)]
pub enum DependencyKey {
    /// Reference to another registration
    Name(String),
    /// Key interpreted by a resolver plugin
    Structured(StructuredKey),
}

impl DependencyKey {
    /// Structured key for a custom resolver kind.
    pub fn structured(kind: impl Into<String>) -> StructuredKey {
        StructuredKey::new(kind)
    }

    /// Key whose value is produced by calling `resolve` with the resolving container.
    pub fn factory<F>(resolve: F) -> Self
    where
        F: Fn(&Container) -> DiResult<Instance> + Send + Sync + 'static,
    {
        let mut key = StructuredKey::new(FACTORY_KIND);
        key.resolve = Some(Arc::new(resolve));
        DependencyKey::Structured(key)
    }

    /// Key whose value is a deferred [`AutoFactory`](crate::AutoFactory) for `name`.
    pub fn auto_factory(name: impl Into<String>) -> Self {
        DependencyKey::Structured(StructuredKey::new(AUTO_FACTORY_KIND).with_name(name))
    }

    /// The referenced registration name for plain keys.
    pub fn name(&self) -> Option<&str> {
        match self {
            DependencyKey::Name(name) => Some(name),
            DependencyKey::Structured(_) => None,
        }
    }

    /// The resolver kind for structured keys.
    pub fn kind(&self) -> Option<&str> {
        match self {
            DependencyKey::Name(_) => None,
            DependencyKey::Structured(key) => Some(&key.kind),
        }
    }

    /// Structural check; the reason is reported in `MalformedDependencyKey`.
    ///
    /// Keys tagged with a built-in kind must carry the data that kind reads.
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        match self {
            DependencyKey::Name(name) if name.is_empty() => Err("empty dependency name"),
            DependencyKey::Structured(key) if key.kind.is_empty() => Err("structured key without a kind tag"),
            DependencyKey::Structured(key) if key.kind == FACTORY_KIND && key.resolve.is_none() => {
                Err("factory key without a resolve function")
            }
            DependencyKey::Structured(key) if key.kind == AUTO_FACTORY_KIND && key.name.is_none() => {
                Err("autoFactory key without a target name")
            }
            _ => Ok(()),
        }
    }
}

impl From<&str> for DependencyKey {
    fn from(name: &str) -> Self {
        DependencyKey::Name(name.to_string())
    }
}

impl From<String> for DependencyKey {
    fn from(name: String) -> Self {
        DependencyKey::Name(name)
    }
}

impl From<StructuredKey> for DependencyKey {
    fn from(key: StructuredKey) -> Self {
        DependencyKey::Structured(key)
    }
}

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKey::Name(name) => f.debug_tuple("Name").field(name).finish(),
            DependencyKey::Structured(key) => f.debug_tuple("Structured").field(key).finish(),
        }
    }
}

/// Dependency key carrying a `kind` tag plus whatever the matching resolver needs.
#[derive(Clone)]
pub struct StructuredKey {
    kind: String,
    name: Option<String>,
    resolve: Option<KeyResolveFn>,
    params: BTreeMap<String, String>,
}

impl StructuredKey {
    /// Creates a key for the given resolver kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            resolve: None,
            params: BTreeMap::new(),
        }
    }

    /// Sets the target registration name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a free-form parameter for custom resolvers.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Runs the key's own resolution function, if it carries one.
    pub fn call_resolve(&self, container: &Container) -> Option<DiResult<Instance>> {
        self.resolve.as_ref().map(|resolve| resolve(container))
    }
}

impl fmt::Debug for StructuredKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredKey")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("has_resolve", &self.resolve.is_some())
            .field("params", &self.params)
            .finish()
    }
}
