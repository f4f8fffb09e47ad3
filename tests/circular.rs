use layered_di::{Container, ContainerOptions, DependencyKey, DiError, Instance, Recipe};

fn unit() -> Recipe {
    Recipe::constructor(|_| Ok(Instance::new(())))
}

#[test]
fn test_self_circular_dependency() {
    let container = Container::new();
    container.register_with("a", unit(), ["a"]).unwrap();

    match container.resolve("a") {
        Err(DiError::CircularDependency(path)) => assert_eq!(path, vec!["a", "a"]),
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[test]
fn test_two_level_circular() {
    let container = Container::new();
    container.register_with("a", unit(), ["b"]).unwrap();
    container.register_with("b", unit(), ["a"]).unwrap();

    match container.resolve("a") {
        Err(DiError::CircularDependency(path)) => assert_eq!(path, vec!["a", "b", "a"]),
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[test]
fn test_three_level_circular() {
    let container = Container::new();
    container.register_with("x", unit(), ["y"]).unwrap();
    container.register_with("y", unit(), ["z"]).unwrap();
    container.register_with("z", unit(), ["x"]).unwrap();

    match container.resolve("y") {
        Err(DiError::CircularDependency(path)) => assert_eq!(path, vec!["y", "z", "x", "y"]),
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[test]
fn test_stack_is_released_after_failure() {
    let container = Container::new();
    container.register_with("a", unit(), ["b"]).unwrap();
    container.register_with("b", unit(), ["a"]).unwrap();

    assert!(container.resolve("a").is_err());

    // Breaking the cycle makes both resolvable; no stale entries remain
    container.register("b", unit()).unwrap();
    assert!(container.resolve("a").is_ok());
    assert!(container.resolve("b").is_ok());
}

#[test]
fn test_cycle_through_factory_key() {
    let container = Container::new();
    container
        .register_with("a", unit(), [DependencyKey::factory(|c: &Container| c.resolve("b"))])
        .unwrap();
    container.register_with("b", unit(), ["a"]).unwrap();

    assert!(matches!(container.resolve("a"), Err(DiError::CircularDependency(_))));
}

#[test]
fn test_auto_factory_breaks_cycle() {
    struct Parent {
        child: std::sync::Arc<layered_di::AutoFactory>,
    }

    let container = Container::new();
    container
        .register_with(
            "parent",
            Recipe::constructor(|args| Ok(Instance::new(Parent { child: args.auto_factory(0)? }))),
            [DependencyKey::auto_factory("child")],
        )
        .unwrap();
    container.register_with("child", unit(), ["parent"]).unwrap();

    // Deferred acquisition: the cycle only closes once the factory is called
    let parent = container.resolve_as::<Parent>("parent").unwrap();
    assert!(parent.child.call().is_ok());
}

#[test]
fn test_diamond_is_not_circular() {
    let container = Container::new();
    container.register("base", unit()).unwrap();
    container.register_with("left", unit(), ["base"]).unwrap();
    container.register_with("right", unit(), ["base"]).unwrap();
    container.register_with("top", unit(), ["left", "right"]).unwrap();

    assert!(container.resolve("top").is_ok());
}

#[test]
fn test_depth_limit() {
    let container = Container::with_options(ContainerOptions::default().with_max_depth(3));
    container.register("d0", unit()).unwrap();
    for i in 1..6 {
        container
            .register_with(format!("d{}", i), unit(), [format!("d{}", i - 1)])
            .unwrap();
    }

    // d5 -> d4 -> d3 fills the stack; entering d2 exceeds it
    assert!(matches!(container.resolve("d5"), Err(DiError::DepthExceeded(3))));
    assert!(container.resolve("d2").is_ok());
}
