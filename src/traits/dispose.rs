//! Disposal trait for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this for services that need structured teardown (flushing
/// buffers, closing handles). Wrap them with [`Instance::disposable`] (or use
/// [`Recipe::disposable_blueprint`]) so the owning container runs the hook on
/// `dispose()`.
///
/// [`Instance::disposable`]: crate::Instance::disposable
/// [`Recipe::disposable_blueprint`]: crate::Recipe::disposable_blueprint
///
/// # Examples
///
/// ```
/// use layered_di::{Container, Dispose, Instance, Recipe};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// struct Cache {
///     flushed: Arc<AtomicBool>,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         self.flushed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// let flushed = Arc::new(AtomicBool::new(false));
/// let flag = flushed.clone();
///
/// let container = Container::new();
/// container
///     .register("cache", Recipe::constructor(move |_| {
///         Ok(Instance::disposable(Cache { flushed: flag.clone() }))
///     }))
///     .unwrap();
///
/// container.resolve("cache").unwrap();
/// container.dispose();
/// assert!(flushed.load(Ordering::SeqCst));
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
