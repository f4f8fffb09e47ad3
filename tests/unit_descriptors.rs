/// Unit tests for RegistrationDescriptor snapshots

use layered_di::{Container, DependencyKey, Instance, Lifetime, Recipe, RecipeKind, RegistrationDescriptor};

#[derive(Clone)]
struct Db;

#[test]
fn test_descriptors_sorted_by_name() {
    let container = Container::new();
    container.register("zeta", Recipe::blueprint(Db)).unwrap();
    container.register("alpha", Recipe::blueprint(Db)).unwrap();
    container.register_instance("mid", 1u8).unwrap();

    let names: Vec<_> = container.descriptors().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_descriptor_fields() {
    let container = Container::new();
    container
        .register_with(
            "svc",
            Recipe::constructor(|_| Ok(Instance::new(()))),
            [DependencyKey::from("a"), DependencyKey::auto_factory("b")],
        )
        .unwrap()
        .singleton_per_container();
    container.register_instance("a", 1u8).unwrap();

    let descriptors = container.descriptors();
    let svc = descriptors.iter().find(|d| d.name == "svc").unwrap();
    assert_eq!(
        *svc,
        RegistrationDescriptor {
            name: "svc".into(),
            lifetime: Lifetime::SingletonPerContainer,
            dependency_count: 2,
            recipe_kind: RecipeKind::Constructible,
            owned: true,
        }
    );
    assert!(!svc.is_external());

    let a = descriptors.iter().find(|d| d.name == "a").unwrap();
    assert!(a.is_external());
    assert_eq!(a.dependency_count, 0);
}

#[test]
fn test_descriptors_include_ancestors_and_shadowing() {
    let root = Container::new();
    root.register("db", Recipe::blueprint(Db)).unwrap();
    root.register("cache", Recipe::blueprint(Db)).unwrap();

    let child = root.create_child_container().unwrap();
    child
        .register("db", Recipe::constructor(|_| Ok(Instance::new(Db))))
        .unwrap();

    let descriptors = child.descriptors();
    assert_eq!(descriptors.len(), 2);

    let db = descriptors.iter().find(|d| d.name == "db").unwrap();
    assert!(db.owned);
    assert_eq!(db.recipe_kind, RecipeKind::Constructible);

    let cache = descriptors.iter().find(|d| d.name == "cache").unwrap();
    assert!(!cache.owned);
    assert_eq!(cache.recipe_kind, RecipeKind::Blueprint);

    // The root only sees its own entries
    assert!(root.descriptors().iter().all(|d| d.owned));
}

#[test]
fn test_descriptor_reflects_lifetime_changes() {
    let container = Container::new();
    let handle = container.register("db", Recipe::blueprint(Db)).unwrap();
    assert_eq!(container.descriptors()[0].lifetime, Lifetime::Singleton);

    handle.singleton_per_container();
    assert_eq!(container.descriptors()[0].lifetime, Lifetime::SingletonPerContainer);

    handle.singleton();
    assert_eq!(container.descriptors()[0].lifetime, Lifetime::Singleton);
}
