//! The container: registration, resolution and the handle types around them.
//!
//! Each container owns one layer of registrations, cached instances and
//! resolver plugins. Child containers layer over their parent: reads fall
//! through to the parent chain, writes land in the child's own layer.

use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::Mutex;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::ContainerOptions;
use crate::descriptors::RegistrationDescriptor;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::internal::ResolutionContext;
use crate::key::DependencyKey;
use crate::lifetime::Lifetime;
use crate::recipe::{Args, Recipe};
use crate::registration::{LifecycleHandle, Registration};
use crate::resolvers::{self, SharedResolver};
use crate::traits::DependencyResolver;

mod disposal;
mod scope;

/// Hierarchical dependency injection container.
///
/// `Container` is a cheap handle; clones refer to the same container. Child
/// containers keep their parent alive, and a parent keeps its children alive
/// until it is disposed. Disposing a child detaches it from its parent.
///
/// The container performs no synchronisation beyond keeping its own maps
/// consistent: resolution is synchronous, and concurrent resolution of the
/// same name on one container is reported as a circular dependency. Hosts
/// that share a container across threads must serialise access.
///
/// # Examples
///
/// ```
/// use layered_di::{Container, Instance, Recipe};
/// use std::sync::Arc;
///
/// struct Logger;
/// struct Service { logger: Arc<Logger> }
///
/// let logger = Arc::new(Logger);
///
/// let root = Container::new();
/// root.register_external("logger", Instance::from_arc(logger.clone())).unwrap();
/// root.register_with(
///     "service",
///     Recipe::constructor(|args| Ok(Instance::new(Service { logger: args.get::<Logger>(0)? }))),
///     ["logger"],
/// ).unwrap();
///
/// let service = root.resolve_as::<Service>("service").unwrap();
/// assert!(Arc::ptr_eq(&service.logger, &logger));
///
/// let child = root.create_child_container().unwrap();
/// assert!(Arc::ptr_eq(&child.resolve_as::<Service>("service").unwrap(), &service));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

/// Non-owning reference to a container.
#[derive(Clone)]
pub(crate) struct WeakContainer {
    inner: Weak<ContainerInner>,
}

impl WeakContainer {
    pub(crate) fn upgrade(&self) -> Option<Container> {
        self.inner.upgrade().map(|inner| Container { inner })
    }
}

pub(crate) struct ContainerInner {
    parent: Option<Container>,
    options: ContainerOptions,
    layer: Mutex<Layer>,
    context: ResolutionContext,
}

/// One container's own entries; ancestors' entries are reached through `parent`.
#[derive(Default)]
pub(crate) struct Layer {
    registrations: IndexMap<String, Arc<Registration>>,
    cache: IndexMap<String, Instance>,
    resolvers: IndexMap<String, SharedResolver>,
    /// Built instances evicted by re-registration, still owed a dispose
    retired: Vec<Instance>,
    children: Vec<Container>,
    next_child: usize,
    disposed: bool,
}

impl Layer {
    /// Stores `registration`, evicting any instance this layer cached for the
    /// name under the previous recipe.
    fn replace(&mut self, registration: Arc<Registration>) {
        let name = registration.name.clone();
        let previous = self.registrations.insert(name.clone(), registration);
        if let Some(stale) = self.cache.shift_remove(&name) {
            let external = previous.is_some_and(|p| p.lifetime() == Lifetime::External);
            if !external {
                self.retired.push(stale);
            }
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates a root container with the built-in resolvers installed.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    pub fn with_options(options: ContainerOptions) -> Self {
        let layer = Layer {
            resolvers: resolvers::builtin(),
            ..Layer::default()
        };
        debug!(container = options.display_label(), "created root container");
        Self::from_parts(None, options, layer)
    }

    fn from_parts(parent: Option<Container>, options: ContainerOptions, layer: Layer) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                parent,
                options,
                layer: Mutex::new(layer),
                context: ResolutionContext::default(),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakContainer {
        WeakContainer {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn label(&self) -> &str {
        self.inner.options.display_label()
    }

    fn ensure_active(&self) -> DiResult<()> {
        if self.inner.layer.lock().disposed {
            return Err(DiError::ContainerDisposed);
        }
        Ok(())
    }

    /// Registers a recipe with no dependencies. See [`Container::register_with`].
    pub fn register(&self, name: impl Into<String>, recipe: Recipe) -> DiResult<LifecycleHandle> {
        self.register_with(name, recipe, std::iter::empty::<DependencyKey>())
    }

    /// Registers a recipe under `name` with lifetime [`Lifetime::Singleton`].
    ///
    /// Replaces any registration of the same name in this container's own
    /// layer; an ancestor's registration stays untouched and remains visible
    /// to every container that does not shadow it. An instance this layer had
    /// already cached for the name is evicted (and disposed with the
    /// container). Dependency keys are checked when the registration is
    /// built, not here.
    pub fn register_with<I>(&self, name: impl Into<String>, recipe: Recipe, dependencies: I) -> DiResult<LifecycleHandle>
    where
        I: IntoIterator,
        I::Item: Into<DependencyKey>,
    {
        let name = name.into();
        let dependencies: Vec<DependencyKey> = dependencies.into_iter().map(Into::into).collect();
        let registration = Arc::new(Registration::new(name.clone(), recipe, dependencies, Lifetime::Singleton));

        {
            let mut layer = self.inner.layer.lock();
            if layer.disposed {
                return Err(DiError::ContainerDisposed);
            }
            layer.replace(registration.clone());
        }

        debug!(
            container = self.label(),
            name = %name,
            dependencies = registration.dependencies.len(),
            recipe = ?registration.recipe.kind(),
            "registered"
        );
        Ok(LifecycleHandle::new(registration, self.downgrade()))
    }

    /// Registers a caller-owned value with lifetime [`Lifetime::External`].
    pub fn register_instance<T: Send + Sync + 'static>(&self, name: impl Into<String>, value: T) -> DiResult<()> {
        self.register_external(name, Instance::new(value))
    }

    /// Registers an existing instance with lifetime [`Lifetime::External`].
    ///
    /// The instance is seeded into this container's cache immediately, shared
    /// by every descendant, and never disposed by the container, even when it
    /// carries a disposal hook.
    pub fn register_external(&self, name: impl Into<String>, instance: Instance) -> DiResult<()> {
        let name = name.into();
        let registration = Arc::new(Registration::external(name.clone(), instance.clone()));

        {
            let mut layer = self.inner.layer.lock();
            if layer.disposed {
                return Err(DiError::ContainerDisposed);
            }
            layer.replace(registration);
            layer.cache.insert(name.clone(), instance);
        }

        debug!(container = self.label(), name = %name, "registered external instance");
        Ok(())
    }

    /// Installs a resolver plugin for structured keys tagged `kind`.
    ///
    /// Replaces this container's own resolver for `kind`, shadowing any
    /// inherited one.
    pub fn add_resolver<R>(&self, kind: impl Into<String>, resolver: R) -> DiResult<()>
    where
        R: DependencyResolver + 'static,
    {
        let kind = kind.into();
        let mut layer = self.inner.layer.lock();
        if layer.disposed {
            return Err(DiError::ContainerDisposed);
        }
        debug!(container = self.label(), kind = %kind, "added resolver");
        layer.resolvers.insert(kind, Arc::new(resolver));
        Ok(())
    }

    /// Resolves `name` within this container's scope.
    ///
    /// Cached instances are reused according to the registration's lifetime
    /// (see [`Lifetime`]); otherwise the dependency list is resolved in
    /// order, the recipe is instantiated with the results, and the instance is
    /// cached in this container's own layer when the lifetime calls for it.
    pub fn resolve(&self, name: &str) -> DiResult<Instance> {
        self.ensure_active()?;

        let (registration, owner_depth) = self
            .inner
            .lookup(|layer| layer.registrations.get(name).cloned())
            .ok_or_else(|| DiError::UnknownDependency(name.to_string()))?;

        if let Some(instance) = self.cached_instance(name, &registration, owner_depth)? {
            trace!(container = self.label(), name, "cache hit");
            return Ok(instance);
        }

        let instance = self.build(&registration)?;

        if registration.lifetime().is_cached() {
            let mut layer = self.inner.layer.lock();
            if layer.disposed {
                drop(layer);
                instance.run_dispose();
                return Err(DiError::ContainerDisposed);
            }
            layer.cache.insert(name.to_string(), instance.clone());
        }
        Ok(instance)
    }

    /// Resolves `name` and downcasts it to `T`.
    pub fn resolve_as<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
        self.resolve(name)?.downcast::<T>()
    }

    fn build(&self, registration: &Registration) -> DiResult<Instance> {
        let name = registration.name.as_str();
        let _guard = self.inner.context.enter(name, self.inner.options.max_depth)?;
        trace!(container = self.label(), name, "constructing");

        let mut values = SmallVec::with_capacity(registration.dependencies.len());
        for (index, key) in registration.dependencies.iter().enumerate() {
            key.check().map_err(|reason| DiError::MalformedDependencyKey {
                name: name.to_string(),
                index,
                reason,
            })?;

            let value = match key {
                DependencyKey::Name(dependency) => self.resolve(dependency)?,
                DependencyKey::Structured(structured) => {
                    let (resolver, _) = self
                        .inner
                        .lookup(|layer| layer.resolvers.get(structured.kind()).cloned())
                        .ok_or_else(|| DiError::UnresolvableDependencyKind {
                            kind: structured.kind().to_string(),
                            name: name.to_string(),
                        })?;
                    resolver.resolve(self, structured)?
                }
            };
            values.push(value);
        }

        registration.recipe.instantiate(&Args::new(name, values))
    }

    /// Whether a registration for `name` is visible from this container.
    pub fn is_registered(&self, name: &str) -> bool {
        self.inner.lookup(|layer| layer.registrations.get(name).map(|_| ())).is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.layer.lock().disposed
    }

    pub fn is_child(&self) -> bool {
        self.inner.parent.is_some()
    }

    pub fn parent(&self) -> Option<&Container> {
        self.inner.parent.as_ref()
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// Describes every registration visible from this container, sorted by name.
    pub fn descriptors(&self) -> Vec<RegistrationDescriptor> {
        let mut seen: IndexMap<String, RegistrationDescriptor> = IndexMap::new();
        let mut current = Some(self.clone());
        let mut owned = true;

        while let Some(container) = current {
            {
                let layer = container.inner.layer.lock();
                for (name, registration) in &layer.registrations {
                    seen.entry(name.clone()).or_insert_with(|| RegistrationDescriptor {
                        name: name.clone(),
                        lifetime: registration.lifetime(),
                        dependency_count: registration.dependencies.len(),
                        recipe_kind: registration.recipe.kind(),
                        owned,
                    });
                }
            }
            owned = false;
            current = container.inner.parent.clone();
        }

        let mut descriptors: Vec<_> = seen.into_values().collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Whether two handles refer to the same container.
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ContainerInner {
    /// Finds the first entry produced by `find`, starting at this layer and
    /// walking up the parent chain. Also returns the depth of the layer the
    /// entry came from: 0 for this container, 1 for its parent, and so on.
    pub(crate) fn lookup<T>(&self, find: impl Fn(&Layer) -> Option<T>) -> Option<(T, usize)> {
        let own = find(&*self.layer.lock());
        if let Some(value) = own {
            return Some((value, 0));
        }

        let mut depth = 1;
        let mut current = self.parent.clone();
        while let Some(container) = current {
            let found = find(&*container.inner.layer.lock());
            if let Some(value) = found {
                return Some((value, depth));
            }
            depth += 1;
            current = container.inner.parent.clone();
        }
        None
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layer = self.inner.layer.lock();
        f.debug_struct("Container")
            .field("label", &self.label())
            .field("is_child", &self.is_child())
            .field("registrations", &layer.registrations.len())
            .field("cached", &layer.cache.len())
            .field("disposed", &layer.disposed)
            .finish()
    }
}
