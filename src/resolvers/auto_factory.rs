use std::fmt;
use std::sync::Arc;

use crate::container::{Container, WeakContainer};
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::key::StructuredKey;
use crate::traits::DependencyResolver;

/// Produces an [`AutoFactory`] bound to the resolving container.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoFactoryResolver;

impl DependencyResolver for AutoFactoryResolver {
    fn resolve(&self, container: &Container, key: &StructuredKey) -> DiResult<Instance> {
        let name = key.name().ok_or_else(|| DiError::InvalidStructuredKey {
            kind: key.kind().to_string(),
            reason: "autoFactory key without a target name",
        })?;
        Ok(Instance::new(AutoFactory {
            container: container.downgrade(),
            name: name.to_string(),
        }))
    }
}

/// Zero-argument callable that resolves a registration on demand.
///
/// Holds the container weakly, so a cached instance keeping an `AutoFactory`
/// does not keep its own container alive.
///
/// # Examples
///
/// ```
/// use layered_di::{Container, DependencyKey, Instance, Recipe};
///
/// struct Worker { make_job: std::sync::Arc<layered_di::AutoFactory> }
///
/// let container = Container::new();
/// container.register_instance("job", 42u32).unwrap();
/// container.register_with(
///     "worker",
///     Recipe::constructor(|args| Ok(Instance::new(Worker { make_job: args.auto_factory(0)? }))),
///     [DependencyKey::auto_factory("job")],
/// ).unwrap();
///
/// let worker = container.resolve_as::<Worker>("worker").unwrap();
/// assert_eq!(*worker.make_job.get::<u32>().unwrap(), 42);
/// ```
pub struct AutoFactory {
    container: WeakContainer,
    name: String,
}

impl AutoFactory {
    /// Resolves the target registration against the bound container.
    pub fn call(&self) -> DiResult<Instance> {
        let container = self.container.upgrade().ok_or(DiError::ContainerDisposed)?;
        container.resolve(&self.name)
    }

    /// Resolves and downcasts the target registration.
    pub fn get<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.call()?.downcast::<T>()
    }

    /// Name of the registration this factory resolves.
    pub fn target(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for AutoFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoFactory").field("name", &self.name).finish()
    }
}
