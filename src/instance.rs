//! Type-erased instances handed out by the container.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::traits::Dispose;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

type DisposeHook = Arc<dyn Fn() + Send + Sync>;

/// A resolved value together with its optional disposal hook.
///
/// Cloning an `Instance` is cheap and yields a handle to the same underlying
/// value, so identity can be checked with [`Instance::ptr_eq`].
#[derive(Clone)]
pub struct Instance {
    value: AnyArc,
    type_name: &'static str,
    dispose: Option<DisposeHook>,
}

impl Instance {
    /// Wraps a plain value with no disposal hook.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value with no disposal hook.
    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
            dispose: None,
        }
    }

    /// Wraps a value whose [`Dispose::dispose`] runs when the owning
    /// container is disposed.
    pub fn disposable<T: Dispose>(value: T) -> Self {
        Self::disposable_arc(Arc::new(value))
    }

    /// Shared variant of [`Instance::disposable`].
    pub fn disposable_arc<T: Dispose>(value: Arc<T>) -> Self {
        let target = value.clone();
        Self {
            value,
            type_name: std::any::type_name::<T>(),
            dispose: Some(Arc::new(move || target.dispose())),
        }
    }

    /// Downcasts to the concrete type.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.value
            .clone()
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                name: self.type_name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Borrowing downcast.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Name of the concrete type this instance was built from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether this instance carries a disposal hook.
    pub fn is_disposable(&self) -> bool {
        self.dispose.is_some()
    }

    /// Identity comparison of the underlying values.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    pub(crate) fn run_dispose(&self) -> bool {
        match &self.dispose {
            Some(hook) => {
                hook();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .field("disposable", &self.dispose.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(Arc<AtomicUsize>);

    impl Dispose for Counter {
        fn dispose(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn downcast_reports_both_types_on_mismatch() {
        let instance = Instance::new(7u32);
        assert_eq!(*instance.downcast::<u32>().unwrap(), 7);

        match instance.downcast::<String>() {
            Err(DiError::TypeMismatch { name, expected }) => {
                assert_eq!(name, "u32");
                assert!(expected.contains("String"));
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn clones_share_identity_and_hook() {
        let hits = Arc::new(AtomicUsize::new(0));
        let instance = Instance::disposable(Counter(hits.clone()));
        let clone = instance.clone();

        assert!(instance.ptr_eq(&clone));
        assert!(clone.is_disposable());
        assert!(clone.run_dispose());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(!Instance::new(1u8).run_dispose());
    }
}
