//! Resolver plugin trait for structured dependency keys.

use crate::container::Container;
use crate::error::DiResult;
use crate::instance::Instance;
use crate::key::StructuredKey;

/// Converts a structured dependency key into a value.
///
/// Resolvers are registered per container under a kind tag with
/// [`Container::add_resolver`] and are inherited by child containers unless
/// a child registers its own resolver for the same kind.
///
/// Closures with the matching signature implement this trait directly.
///
/// # Examples
///
/// ```
/// use layered_di::{Container, DependencyKey, DiResult, Instance, Recipe, StructuredKey};
///
/// let container = Container::new();
/// container
///     .add_resolver("const", |_: &Container, key: &StructuredKey| -> DiResult<Instance> {
///         Ok(Instance::new(key.param("value").unwrap_or_default().to_string()))
///     })
///     .unwrap();
///
/// container.register_with(
///     "banner",
///     Recipe::constructor(|args| Ok(Instance::new(format!("** {} **", args.get::<String>(0)?)))),
///     [DependencyKey::structured("const").with_param("value", "hi")],
/// ).unwrap();
///
/// assert_eq!(*container.resolve_as::<String>("banner").unwrap(), "** hi **");
/// ```
pub trait DependencyResolver: Send + Sync {
    /// Produces the value for `key` on behalf of `container`.
    fn resolve(&self, container: &Container, key: &StructuredKey) -> DiResult<Instance>;
}

impl<F> DependencyResolver for F
where
    F: Fn(&Container, &StructuredKey) -> DiResult<Instance> + Send + Sync,
{
    fn resolve(&self, container: &Container, key: &StructuredKey) -> DiResult<Instance> {
        self(container, key)
    }
}
