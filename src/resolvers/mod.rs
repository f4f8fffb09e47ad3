//! Built-in resolver plugins for structured dependency keys.
//!
//! Two kinds ship with every root container:
//!
//! - `factory`: the key carries its own resolution function
//! - `autoFactory`: the key names a registration and resolves to a deferred
//!   [`AutoFactory`] for it

mod auto_factory;
mod factory;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::key::{AUTO_FACTORY_KIND, FACTORY_KIND};
use crate::traits::DependencyResolver;

pub use auto_factory::{AutoFactory, AutoFactoryResolver};
pub use factory::FactoryResolver;

pub(crate) type SharedResolver = Arc<dyn DependencyResolver>;

/// Resolver layer seeded into every root container.
pub(crate) fn builtin() -> IndexMap<String, SharedResolver> {
    let mut resolvers: IndexMap<String, SharedResolver> = IndexMap::new();
    resolvers.insert(FACTORY_KIND.to_string(), Arc::new(FactoryResolver));
    resolvers.insert(AUTO_FACTORY_KIND.to_string(), Arc::new(AutoFactoryResolver));
    resolvers
}
