//! # layered-di
//!
//! Hierarchical dependency injection container with named registrations,
//! explicit dependency lists, per-registration lifetime policies and
//! cascading disposal.
//!
//! ## Features
//!
//! - **Named registrations**: recipes are stored under string names and
//!   declare their dependencies explicitly
//! - **Three lifetimes**: `Singleton`, `SingletonPerContainer` and `External`
//! - **Child containers**: children read through to their parent and shadow
//!   registrations locally without touching the parent
//! - **Resolver plugins**: structured dependency keys are handed to pluggable
//!   resolvers; `factory` and `autoFactory` ship by default
//! - **Circular dependency detection**: cycles fail with the full path
//!   instead of recursing
//! - **Disposal cascade**: disposing a container disposes its instances and
//!   every descendant container
//!
//! ## Quick Start
//!
//! ```rust
//! use layered_di::{Container, DependencyKey, Instance, Recipe};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//! container.register_instance("db_url", "postgres://localhost".to_string()).unwrap();
//! container.register_with(
//!     "database",
//!     Recipe::constructor(|args| {
//!         Ok(Instance::new(Database { url: args.get::<String>(0)?.to_string() }))
//!     }),
//!     ["db_url"],
//! ).unwrap();
//! container.register_with(
//!     "users",
//!     Recipe::constructor(|args| Ok(Instance::new(UserService { db: args.get::<Database>(0)? }))),
//!     [DependencyKey::from("database")],
//! ).unwrap();
//!
//! let users = container.resolve_as::<UserService>("users").unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//! ```
//!
//! ## Lifetimes Across Child Containers
//!
//! ```rust
//! use layered_di::{Container, Recipe};
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! struct Pool;
//! #[derive(Clone)]
//! struct RequestState;
//!
//! let root = Container::new();
//! root.register("pool", Recipe::blueprint(Pool)).unwrap();
//! root.register("state", Recipe::blueprint(RequestState))
//!     .unwrap()
//!     .singleton_per_container();
//!
//! let request_a = root.create_child_container().unwrap();
//! let request_b = root.create_child_container().unwrap();
//!
//! // Singleton: built once, by the container that owns the registration
//! let pool_a = request_a.resolve_as::<Pool>("pool").unwrap();
//! let pool_b = request_b.resolve_as::<Pool>("pool").unwrap();
//! assert!(Arc::ptr_eq(&pool_a, &pool_b));
//!
//! // SingletonPerContainer: one per container level
//! let state_a = request_a.resolve_as::<RequestState>("state").unwrap();
//! let state_b = request_b.resolve_as::<RequestState>("state").unwrap();
//! assert!(!Arc::ptr_eq(&state_a, &state_b));
//! assert!(Arc::ptr_eq(&state_a, &request_a.resolve_as::<RequestState>("state").unwrap()));
//! ```

// Module declarations
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod instance;
pub mod key;
pub mod lifetime;
pub mod recipe;
pub mod resolvers;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use config::ContainerOptions;
pub use container::Container;
pub use descriptors::RegistrationDescriptor;
pub use error::{DiError, DiResult};
pub use instance::Instance;
pub use key::{DependencyKey, StructuredKey, AUTO_FACTORY_KIND, FACTORY_KIND};
pub use lifetime::Lifetime;
pub use recipe::{Args, Blueprint, Recipe, RecipeKind};
pub use registration::LifecycleHandle;
pub use resolvers::{AutoFactory, AutoFactoryResolver, FactoryResolver};
pub use traits::{DependencyResolver, Dispose};
