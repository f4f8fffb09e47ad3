//! Registration records and the lifecycle handle returned by `register`.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::container::WeakContainer;
use crate::error::DiResult;
use crate::instance::Instance;
use crate::key::DependencyKey;
use crate::lifetime::Lifetime;
use crate::recipe::Recipe;

/// Recipe, dependency list and lifetime stored under a name
pub(crate) struct Registration {
    pub(crate) name: String,
    pub(crate) recipe: Recipe,
    pub(crate) dependencies: Vec<DependencyKey>,
    lifetime: Mutex<Lifetime>,
}

impl Registration {
    pub(crate) fn new(name: String, recipe: Recipe, dependencies: Vec<DependencyKey>, lifetime: Lifetime) -> Self {
        Self {
            name,
            recipe,
            dependencies,
            lifetime: Mutex::new(lifetime),
        }
    }

    /// Registration backing `register_instance`; its recipe hands back the
    /// same instance and is never reached while the seeded cache entry exists.
    pub(crate) fn external(name: String, instance: Instance) -> Self {
        let recipe = Recipe::constructor(move |_| Ok(instance.clone()));
        Self::new(name, recipe, Vec::new(), Lifetime::External)
    }

    pub(crate) fn lifetime(&self) -> Lifetime {
        *self.lifetime.lock()
    }

    fn set_lifetime(&self, lifetime: Lifetime) {
        *self.lifetime.lock() = lifetime;
    }
}

/// Handle to a registration created by [`Container::register`].
///
/// New registrations start as [`Lifetime::Singleton`]; the handle switches
/// them between the two cached lifetimes and peeks at the cached instance.
///
/// [`Container::register`]: crate::Container::register
///
/// # Examples
///
/// ```rust
/// use layered_di::{Container, Lifetime, Recipe};
///
/// #[derive(Clone)]
/// struct Clock;
///
/// let container = Container::new();
/// let handle = container.register("clock", Recipe::blueprint(Clock)).unwrap();
/// assert_eq!(handle.lifetime(), Lifetime::Singleton);
/// assert!(handle.instance().is_none());
///
/// let clock = container.resolve("clock").unwrap();
/// assert!(handle.instance().unwrap().ptr_eq(&clock));
///
/// handle.singleton_per_container();
/// assert_eq!(handle.lifetime(), Lifetime::SingletonPerContainer);
/// ```
#[derive(Clone)]
pub struct LifecycleHandle {
    registration: Arc<Registration>,
    owner: WeakContainer,
}

impl LifecycleHandle {
    pub(crate) fn new(registration: Arc<Registration>, owner: WeakContainer) -> Self {
        Self { registration, owner }
    }

    /// One instance for the whole container tree.
    pub fn singleton(&self) -> &Self {
        self.registration.set_lifetime(Lifetime::Singleton);
        self
    }

    /// One instance per container level.
    pub fn singleton_per_container(&self) -> &Self {
        self.registration.set_lifetime(Lifetime::SingletonPerContainer);
        self
    }

    pub fn lifetime(&self) -> Lifetime {
        self.registration.lifetime()
    }

    pub fn name(&self) -> &str {
        &self.registration.name
    }

    /// The instance the registering container has cached for this
    /// registration. Instances cached by ancestors under the same name, or
    /// built from a registration that later replaced this one, are not
    /// reported. Never triggers construction.
    pub fn instance(&self) -> Option<Instance> {
        self.owner.upgrade()?.cached_for(&self.registration)
    }

    /// Typed variant of [`LifecycleHandle::instance`].
    pub fn instance_as<T: Send + Sync + 'static>(&self) -> Option<DiResult<Arc<T>>> {
        self.instance().map(|instance| instance.downcast::<T>())
    }
}

impl std::fmt::Debug for LifecycleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHandle")
            .field("name", &self.registration.name)
            .field("lifetime", &self.lifetime())
            .finish()
    }
}
