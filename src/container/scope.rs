//! Child containers and scope-aware cache retrieval.
//!
//! A child sees its ancestors' registrations, cached instances and resolvers,
//! but whether an inherited cached instance may be reused depends on the
//! registration's lifetime and on which container defines it. An entry cached
//! above the layer that defines the registration was built from a shadowed
//! recipe and counts as absent:
//!
//! | cached entry                  | registration            | outcome            |
//! |-------------------------------|-------------------------|--------------------|
//! | own layer                     | any                     | reuse              |
//! | none, or above the owner      | inherited `Singleton`   | delegate to parent |
//! | none, or above the owner      | otherwise               | build here         |
//! | ancestor, at or below owner   | `SingletonPerContainer` | build here         |
//! | ancestor, at or below owner   | otherwise               | reuse              |

use std::sync::Arc;

use tracing::{debug, trace};

use super::{Container, Layer};
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::lifetime::Lifetime;
use crate::registration::Registration;

impl Container {
    /// Creates a child container layered over this one.
    ///
    /// The child reads through to this container's registrations, cached
    /// instances and resolvers; its own writes never affect this container.
    /// Disposing this container disposes the child as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_di::{Container, Recipe};
    ///
    /// #[derive(Clone)]
    /// struct Config(&'static str);
    ///
    /// let root = Container::new();
    /// root.register("config", Recipe::blueprint(Config("root"))).unwrap();
    ///
    /// let child = root.create_child_container().unwrap();
    /// child.register("config", Recipe::blueprint(Config("child"))).unwrap();
    ///
    /// assert_eq!(root.resolve_as::<Config>("config").unwrap().0, "root");
    /// assert_eq!(child.resolve_as::<Config>("config").unwrap().0, "child");
    ///
    /// root.dispose();
    /// assert!(child.is_disposed());
    /// ```
    pub fn create_child_container(&self) -> DiResult<Container> {
        let index = {
            let mut layer = self.inner.layer.lock();
            if layer.disposed {
                return Err(DiError::ContainerDisposed);
            }
            let index = layer.next_child;
            layer.next_child += 1;
            index
        };

        let options = self.inner.options.for_child(index);
        let child = Container::from_parts(Some(self.clone()), options, Layer::default());

        self.inner.layer.lock().children.push(child.clone());
        debug!(container = self.label(), child = child.label(), "created child container");
        Ok(child)
    }

    /// Number of children not yet disposed.
    pub fn child_count(&self) -> usize {
        self.inner.layer.lock().children.len()
    }

    /// Removes `child` from this container's children after it was disposed.
    pub(super) fn detach_child(&self, child: &Container) {
        self.inner.layer.lock().children.retain(|c| !c.ptr_eq(child));
    }

    /// The instance this container cached for `registration`, if the
    /// registration is still the one stored under its name here. Never
    /// triggers construction.
    pub(crate) fn cached_for(&self, registration: &Arc<Registration>) -> Option<Instance> {
        let layer = self.inner.layer.lock();
        let current = layer.registrations.get(&registration.name)?;
        if !Arc::ptr_eq(current, registration) {
            return None;
        }
        layer.cache.get(&registration.name).cloned()
    }

    /// Cache retrieval honouring scope inheritance.
    ///
    /// `owner_depth` is the depth of the layer defining `registration`, 0
    /// when this container defines it. `Ok(None)` means the caller must build
    /// locally.
    pub(super) fn cached_instance(
        &self,
        name: &str,
        registration: &Arc<Registration>,
        owner_depth: usize,
    ) -> DiResult<Option<Instance>> {
        let lifetime = registration.lifetime();
        let cached = self
            .inner
            .lookup(|layer| layer.cache.get(name).cloned())
            .filter(|(_, depth)| *depth <= owner_depth);

        match cached {
            Some((instance, 0)) => Ok(Some(instance)),
            Some(_) if lifetime == Lifetime::SingletonPerContainer => Ok(None),
            Some((instance, _)) => Ok(Some(instance)),
            None => match self.parent() {
                Some(parent) if owner_depth > 0 && lifetime == Lifetime::Singleton => {
                    trace!(container = self.label(), name, "delegating singleton to parent");
                    parent.resolve(name).map(Some)
                }
                _ => Ok(None),
            },
        }
    }
}
