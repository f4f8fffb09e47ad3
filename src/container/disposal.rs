//! Disposal cascade.

use tracing::{debug, warn};

use super::{Container, ContainerInner};
use crate::instance::Instance;
use crate::lifetime::Lifetime;

impl Container {
    /// Disposes this container and, recursively, all of its children.
    ///
    /// Idempotent. On the first call the container stops accepting
    /// registrations and resolutions, runs the disposal hook of every instance
    /// it built and cached in its own layer (latest first), and then disposes
    /// each child. External instances are never disposed, and instances
    /// cached by ancestors are left alone. A disposed child is removed from
    /// its parent's children.
    pub fn dispose(&self) {
        let children = match self.inner.dispose_own_layer() {
            Some(children) => children,
            None => return,
        };

        for child in &children {
            child.dispose();
        }
        if let Some(parent) = self.parent() {
            parent.detach_child(self);
        }
        debug!(container = self.label(), "disposed");
    }
}

impl ContainerInner {
    /// Marks the container disposed and runs its own instances' hooks.
    /// Returns the children still to cascade to, or `None` if already disposed.
    fn dispose_own_layer(&self) -> Option<Vec<Container>> {
        let (instances, children) = {
            let mut layer = self.layer.lock();
            if layer.disposed {
                return None;
            }
            layer.disposed = true;

            let cached: Vec<(String, Instance)> = layer.cache.drain(..).collect();
            let mut owed = std::mem::take(&mut layer.retired);
            layer.resolvers.clear();
            let children = std::mem::take(&mut layer.children);
            drop(layer);

            for (name, instance) in cached {
                let lifetime = self
                    .lookup(|l| l.registrations.get(&name).map(|r| r.lifetime()))
                    .map(|(lifetime, _)| lifetime);
                if lifetime != Some(Lifetime::External) {
                    owed.push(instance);
                }
            }
            (owed, children)
        };

        let mut disposed = 0usize;
        for instance in instances.iter().rev() {
            if instance.run_dispose() {
                disposed += 1;
            }
        }
        debug!(
            container = self.options.display_label(),
            instances = disposed,
            "ran disposal hooks"
        );
        Some(children)
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        let layer = self.layer.get_mut();
        let owes_dispose = layer.cache.iter().any(|(name, instance)| {
            instance.is_disposable()
                && layer
                    .registrations
                    .get(name)
                    .map_or(true, |registration| registration.lifetime() != Lifetime::External)
        });
        let pending = !layer.disposed && (owes_dispose || !layer.retired.is_empty());
        if pending {
            warn!(
                container = self.options.display_label(),
                "container dropped without dispose(); disposal hooks will not run"
            );
        }
    }
}
