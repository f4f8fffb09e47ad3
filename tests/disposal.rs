use layered_di::{Container, DiError, Dispose, Instance, Recipe};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone)]
struct Tracked {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Dispose for Tracked {
    fn dispose(&self) {
        self.log.lock().push(self.name);
    }
}

fn tracked(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Recipe {
    Recipe::disposable_blueprint(Tracked { name, log: log.clone() })
}

#[test]
fn test_dispose_runs_hooks_latest_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = Container::new();
    container.register("first", tracked("first", &log)).unwrap();
    container.register("second", tracked("second", &log)).unwrap();
    container.register("third", tracked("third", &log)).unwrap();

    container.resolve("first").unwrap();
    container.resolve("second").unwrap();
    container.resolve("third").unwrap();

    container.dispose();
    assert_eq!(*log.lock(), vec!["third", "second", "first"]);
}

#[test]
fn test_dispose_is_idempotent() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = Container::new();
    container.register("svc", tracked("svc", &log)).unwrap();
    container.resolve("svc").unwrap();

    container.dispose();
    container.dispose();
    assert_eq!(log.lock().len(), 1);
    assert!(container.is_disposed());
}

#[test]
fn test_unresolved_registrations_are_not_disposed() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = Container::new();
    container.register("never_built", tracked("never_built", &log)).unwrap();

    container.dispose();
    assert!(log.lock().is_empty());
}

#[test]
fn test_external_instances_are_never_disposed() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = Container::new();
    container
        .register_external("ext", Instance::disposable(Tracked { name: "ext", log: log.clone() }))
        .unwrap();
    container.resolve("ext").unwrap();

    let child = container.create_child_container().unwrap();
    child.resolve("ext").unwrap();

    container.dispose();
    assert!(log.lock().is_empty());
}

#[test]
fn test_operations_after_dispose_fail() {
    let container = Container::new();
    container.register_instance("a", 1u8).unwrap();
    container.dispose();

    assert!(matches!(container.resolve("a"), Err(DiError::ContainerDisposed)));
    assert!(matches!(container.resolve("unknown"), Err(DiError::ContainerDisposed)));
    assert!(matches!(
        container.register("b", Recipe::constructor(|_| Ok(Instance::new(())))),
        Err(DiError::ContainerDisposed)
    ));
    assert!(matches!(container.register_instance("c", 2u8), Err(DiError::ContainerDisposed)));
    assert!(matches!(container.create_child_container(), Err(DiError::ContainerDisposed)));

    let plugin = |_: &Container, _: &layered_di::StructuredKey| -> layered_di::DiResult<Instance> { Ok(Instance::new(())) };
    assert!(matches!(container.add_resolver("noop", plugin), Err(DiError::ContainerDisposed)));
}

#[test]
fn test_dispose_cascades_to_descendants() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let root = Container::new();
    root.register("root_svc", tracked("root_svc", &log)).unwrap();
    root.register("per_level", tracked("per_level", &log))
        .unwrap()
        .singleton_per_container();

    let child = root.create_child_container().unwrap();
    let grandchild = child.create_child_container().unwrap();
    let sibling = root.create_child_container().unwrap();

    root.resolve("root_svc").unwrap();
    child.resolve("root_svc").unwrap();
    root.resolve("per_level").unwrap();
    child.resolve("per_level").unwrap();
    grandchild.resolve("per_level").unwrap();
    sibling.resolve("per_level").unwrap();

    root.dispose();

    assert!(child.is_disposed());
    assert!(grandchild.is_disposed());
    assert!(sibling.is_disposed());

    let log = log.lock();
    // Singleton built once (at the root), per-level instance once per container
    assert_eq!(log.iter().filter(|n| **n == "root_svc").count(), 1);
    assert_eq!(log.iter().filter(|n| **n == "per_level").count(), 4);
}

#[test]
fn test_child_dispose_leaves_ancestor_instances() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let root = Container::new();
    root.register("shared", tracked("shared", &log)).unwrap();
    root.register("per_level", tracked("per_level", &log))
        .unwrap()
        .singleton_per_container();

    let child = root.create_child_container().unwrap();
    child.resolve("shared").unwrap();
    child.resolve("per_level").unwrap();

    child.dispose();
    assert_eq!(*log.lock(), vec!["per_level"]);

    // The root and its cached singleton are untouched
    assert!(!root.is_disposed());
    assert!(root.resolve("shared").is_ok());
    assert!(matches!(child.resolve("shared"), Err(DiError::ContainerDisposed)));
}

#[test]
fn test_dropping_child_handle_does_not_dispose() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let root = Container::new();
    root.register("per_level", tracked("per_level", &log))
        .unwrap()
        .singleton_per_container();

    let held = root
        .create_child_container()
        .unwrap()
        .resolve_as::<Tracked>("per_level")
        .unwrap();

    // The instance is still in use; only the parent's cascade disposes it
    assert!(log.lock().is_empty());
    assert_eq!(root.child_count(), 1);
    assert_eq!(held.name, "per_level");

    root.dispose();
    assert_eq!(*log.lock(), vec!["per_level"]);
}

#[test]
fn test_disposed_child_detaches_from_parent() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let root = Container::new();
    root.register("per_level", tracked("per_level", &log))
        .unwrap()
        .singleton_per_container();

    let child = root.create_child_container().unwrap();
    child.resolve("per_level").unwrap();
    child.dispose();
    assert_eq!(root.child_count(), 0);
    assert_eq!(log.lock().len(), 1);

    // Already-disposed children are not disposed again by the cascade
    root.dispose();
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_dropping_undisposed_root_runs_no_hooks() {
    let log = Arc::new(Mutex::new(Vec::new()));
    {
        let root = Container::new();
        root.register("svc", tracked("svc", &log)).unwrap();
        root.resolve("svc").unwrap();
    }
    assert!(log.lock().is_empty());
}

#[test]
fn test_reregistration_disposes_evicted_instance_with_container() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = Container::new();
    container.register("svc", tracked("old", &log)).unwrap();
    container.resolve("svc").unwrap();

    container.register("svc", tracked("new", &log)).unwrap();
    container.resolve("svc").unwrap();
    assert!(log.lock().is_empty());

    container.dispose();
    assert_eq!(*log.lock(), vec!["new", "old"]);
}

#[test]
fn test_lifecycle_handle_after_dispose() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = Container::new();
    let handle = container.register("svc", tracked("svc", &log)).unwrap();
    container.resolve("svc").unwrap();
    assert!(handle.instance().is_some());

    container.dispose();
    assert!(handle.instance().is_none());
}
