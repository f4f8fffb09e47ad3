//! Construction recipes and the arguments they receive.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::resolvers::AutoFactory;
use crate::traits::Dispose;

type Constructor = Arc<dyn Fn(&Args) -> DiResult<Instance> + Send + Sync>;

/// How a registration builds its instances.
///
/// # Examples
///
/// ```rust
/// use layered_di::{Container, Instance, Recipe};
///
/// #[derive(Clone, Default)]
/// struct Greeter { greeting: String }
///
/// let container = Container::new();
/// container.register_instance("greeting", "hello".to_string()).unwrap();
///
/// // Blueprint: derive a fresh copy of the template, then initialize it
/// container.register_with(
///     "greeter",
///     Recipe::blueprint_with(Greeter::default(), |greeter: &mut Greeter, args| {
///         greeter.greeting = args.get::<String>(0)?.as_ref().clone();
///         Ok(None)
///     }),
///     ["greeting"],
/// ).unwrap();
///
/// // Constructible: build from the arguments directly
/// container.register_with(
///     "shout",
///     Recipe::constructor(|args| {
///         let greeter = args.get::<Greeter>(0)?;
///         Ok(Instance::new(greeter.greeting.to_uppercase()))
///     }),
///     ["greeter"],
/// ).unwrap();
///
/// assert_eq!(*container.resolve_as::<String>("shout").unwrap(), "HELLO");
/// ```
#[derive(Clone)]
pub enum Recipe {
    /// Constructor-like callable invoked with the dependencies as arguments
    Constructible(Constructor),
    /// Template cloned per build, with an optional initializer
    Blueprint(Blueprint),
}

impl Recipe {
    pub fn constructor<F>(ctor: F) -> Self
    where
        F: Fn(&Args) -> DiResult<Instance> + Send + Sync + 'static,
    {
        Recipe::Constructible(Arc::new(ctor))
    }

    pub fn blueprint<T>(template: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Recipe::Blueprint(Blueprint::new(template, Instance::new::<T>))
    }

    /// Blueprint whose derived objects are disposed with their container.
    pub fn disposable_blueprint<T>(template: T) -> Self
    where
        T: Dispose + Clone,
    {
        Recipe::Blueprint(Blueprint::new(template, Instance::disposable::<T>))
    }

    /// Blueprint with an initializer.
    ///
    /// The initializer receives the freshly derived object and the resolved
    /// dependencies. Returning `Some(instance)` replaces the derived object as
    /// the final instance; `None` keeps the derived object.
    pub fn blueprint_with<T, F>(template: T, init: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&mut T, &Args) -> DiResult<Option<Instance>> + Send + Sync + 'static,
    {
        Recipe::Blueprint(Blueprint::with_initializer(template, Instance::new::<T>, Arc::new(init)))
    }

    pub fn disposable_blueprint_with<T, F>(template: T, init: F) -> Self
    where
        T: Dispose + Clone,
        F: Fn(&mut T, &Args) -> DiResult<Option<Instance>> + Send + Sync + 'static,
    {
        Recipe::Blueprint(Blueprint::with_initializer(template, Instance::disposable::<T>, Arc::new(init)))
    }

    pub(crate) fn kind(&self) -> RecipeKind {
        match self {
            Recipe::Constructible(_) => RecipeKind::Constructible,
            Recipe::Blueprint(_) => RecipeKind::Blueprint,
        }
    }

    pub(crate) fn instantiate(&self, args: &Args) -> DiResult<Instance> {
        match self {
            Recipe::Constructible(ctor) => ctor(args),
            Recipe::Blueprint(blueprint) => blueprint.derive.build(args),
        }
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipe::Constructible(_) => f.write_str("Recipe::Constructible"),
            Recipe::Blueprint(blueprint) => write!(f, "Recipe::Blueprint({})", blueprint.derive.template_name()),
        }
    }
}

/// Shape of a recipe, for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeKind {
    Constructible,
    Blueprint,
}

/// Template-based recipe.
#[derive(Clone)]
pub struct Blueprint {
    derive: Arc<dyn Derive>,
}

impl Blueprint {
    fn new<T>(template: T, wrap: fn(T) -> Instance) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self {
            derive: Arc::new(TypedBlueprint { template, wrap, initializer: None }),
        }
    }

    fn with_initializer<T>(template: T, wrap: fn(T) -> Instance, init: Initializer<T>) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self {
            derive: Arc::new(TypedBlueprint { template, wrap, initializer: Some(init) }),
        }
    }

    /// Whether the blueprint runs an initializer after deriving.
    pub fn has_initializer(&self) -> bool {
        self.derive.has_initializer()
    }
}

type Initializer<T> = Arc<dyn Fn(&mut T, &Args) -> DiResult<Option<Instance>> + Send + Sync>;

trait Derive: Send + Sync {
    fn build(&self, args: &Args) -> DiResult<Instance>;
    fn template_name(&self) -> &'static str;
    fn has_initializer(&self) -> bool;
}

struct TypedBlueprint<T> {
    template: T,
    wrap: fn(T) -> Instance,
    initializer: Option<Initializer<T>>,
}

impl<T: Clone + Send + Sync + 'static> Derive for TypedBlueprint<T> {
    fn build(&self, args: &Args) -> DiResult<Instance> {
        let mut derived = self.template.clone();
        if let Some(init) = &self.initializer {
            if let Some(replacement) = init(&mut derived, args)? {
                return Ok(replacement);
            }
        }
        Ok((self.wrap)(derived))
    }

    fn template_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn has_initializer(&self) -> bool {
        self.initializer.is_some()
    }
}

/// Resolved dependency values, in declaration order.
#[derive(Clone, Default)]
pub struct Args {
    owner: String,
    values: SmallVec<[Instance; 4]>,
}

impl Args {
    pub(crate) fn new(owner: &str, values: SmallVec<[Instance; 4]>) -> Self {
        Self { owner: owner.to_string(), values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name of the registration being built.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The untyped argument at `index`.
    pub fn instance(&self, index: usize) -> DiResult<&Instance> {
        self.values.get(index).ok_or_else(|| DiError::MissingArgument {
            name: self.owner.clone(),
            index,
        })
    }

    /// The argument at `index`, downcast to `T`.
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<T>> {
        self.instance(index)?.downcast::<T>()
    }

    /// The deferred factory produced for an `autoFactory` key.
    pub fn auto_factory(&self, index: usize) -> DiResult<Arc<AutoFactory>> {
        self.get::<AutoFactory>(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.values.iter()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("owner", &self.owner)
            .field("values", &self.values)
            .finish()
    }
}
