//! Type-keyed service registry
//!
//! ## Resolution order
//!
//! ```text
//! lookup(key)
//!   │
//!   ├─ 1. own table, exact key ─────────────→ value / loader()
//!   │
//!   ├─ 2. key is an interface:
//!   │     own table, any key satisfying it ──→ upcast(value / loader())
//!   │
//!   ├─ 3. parent.lookup(key)
//!   │
//!   └─ 4. None
//! ```
//!
//! ## Caveat: interface fallback order
//!
//! Step 2 walks the table in `HashMap` order. When several stored types
//! satisfy the same interface, which one is returned is unspecified and may
//! change between runs. Register the value under the interface itself
//! (`register_as`) when a specific implementation must win.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::RegistryConfig;
use crate::implements;
use crate::instance::{Instance, Loader, StoredValue};
use crate::type_key::TypeKey;

/// Stores values keyed by their type and resolves them on demand
///
/// A registry borrows its parent: the parent outlives every child wired to it
/// and cannot be mutated while children hold it. Children may shadow any of
/// the parent's bindings.
///
/// # Example
///
/// ```ignore
/// let mut app = Registry::new();
/// app.register(Database::connect()?);
///
/// let mut request = Registry::new();
/// request.set_parent(Some(&app));
/// request.register(Session::new());
///
/// let count = request.invoke(|db: Arc<Database>, session: Arc<Session>| {
///     db.count_for(&session)
/// })?;
/// ```
pub struct Registry<'p> {
    services: HashMap<TypeKey, StoredValue>,
    pub(crate) args: Vec<Instance>,
    parent: Option<&'p Registry<'p>>,
}

impl<'p> Registry<'p> {
    /// Create an empty registry with no parent
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
            args: Vec::new(),
            parent: None,
        }
    }

    /// Create an empty registry pre-sized from configuration
    pub fn with_config(config: &RegistryConfig) -> Self {
        Self {
            services: HashMap::with_capacity(config.initial_capacity),
            args: Vec::with_capacity(config.scratch_capacity),
            parent: None,
        }
    }

    /// Store `value` under its own type
    pub fn register<T: Send + Sync + 'static>(&mut self, value: T) {
        self.register_arc(Arc::new(value));
    }

    /// Store an already shared value under `T`
    pub fn register_arc<T: ?Sized + Send + Sync + 'static>(&mut self, value: Arc<T>) {
        self.set_service(TypeKey::of::<T>(), StoredValue::Value(Instance::new(value)));
    }

    /// Store `value` under the interface `I` instead of its concrete type
    ///
    /// ```ignore
    /// registry.register_as::<dyn Greeter>(Arc::new(English));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics when `I` is not declared with `interface!`.
    pub fn register_as<I: ?Sized + Send + Sync + 'static>(&mut self, value: Arc<I>) {
        self.set_service(
            TypeKey::interface::<I>(),
            StoredValue::Value(Instance::new(value)),
        );
    }

    /// Store a loader under `T`; every resolution calls it again
    pub fn register_loader<T, F>(&mut self, loader: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.set_service(TypeKey::of::<T>(), StoredValue::Loader(Loader::new(loader)));
    }

    /// Store a loader under the interface `I`
    ///
    /// # Panics
    ///
    /// Panics when `I` is not declared with `interface!`.
    pub fn register_loader_as<I, F>(&mut self, loader: F)
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<I> + Send + Sync + 'static,
    {
        self.set_service(
            TypeKey::interface::<I>(),
            StoredValue::Loader(Loader::new(loader)),
        );
    }

    /// Register every element of a tuple under its own type
    ///
    /// Equivalent to calling [`Registry::register`] once per element; each
    /// element derives its key separately, so hot paths re-registering the
    /// same types should keep precomputed keys and use
    /// [`Registry::set_service`].
    pub fn register_many<S: Services>(&mut self, services: S) {
        services.register_into(self);
    }

    /// Bind `key` to `value`, replacing any previous binding for that key
    ///
    /// Prefer the `register*` methods; nothing checks that the value actually
    /// has the type `key` names.
    pub fn set_service(&mut self, key: TypeKey, value: StoredValue) {
        debug!(
            key = key.name(),
            loader = value.is_loader(),
            "Registering service"
        );
        self.services.insert(key, value);
    }

    /// Install, replace or (with `None`) remove the parent registry
    pub fn set_parent(&mut self, parent: Option<&'p Registry<'p>>) {
        debug!(attached = parent.is_some(), "Setting parent registry");
        self.parent = parent;
    }

    /// The parent registry, if any
    pub fn parent(&self) -> Option<&'p Registry<'p>> {
        self.parent
    }

    /// Drop every own binding and the argument buffer; the parent is untouched
    pub fn reset(&mut self) {
        if self.services.is_empty() && self.args.is_empty() {
            return;
        }
        debug!(services = self.services.len(), "Resetting registry");
        self.services.clear();
        self.args.clear();
    }

    /// Number of bindings visible through this registry
    ///
    /// Own bindings plus the parent's count. A key bound in both child and
    /// parent is counted twice.
    pub fn count(&self) -> usize {
        self.services.len() + self.parent.map_or(0, |parent| parent.count())
    }

    /// Resolve `key` through this registry and its parents
    ///
    /// Loaders are called on every hit. `None` means no registry in the chain
    /// has a binding for `key`; it is not an error.
    pub fn lookup(&self, key: &TypeKey) -> Option<Instance> {
        if let Some(stored) = self.services.get(key) {
            trace!(key = key.name(), "Resolved from own table");
            return Some(stored.resolve());
        }

        if key.is_interface() {
            if let Some(instance) = self.lookup_implementation(key) {
                return Some(instance);
            }
        }

        let parent = self.parent?;
        trace!(key = key.name(), "Delegating lookup to parent registry");
        parent.lookup(key)
    }

    /// Typed [`Registry::lookup`] for the binding stored under `T`
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.lookup(&TypeKey::of::<T>())?.into_arc::<T>().ok()
    }

    fn lookup_implementation(&self, interface: &TypeKey) -> Option<Instance> {
        self.services
            .iter()
            .filter(|(stored_key, _)| stored_key.satisfies(interface))
            .find_map(|(stored_key, stored)| {
                trace!(
                    key = interface.name(),
                    implementation = stored_key.name(),
                    "Resolved through interface fallback"
                );
                implements::upcast(stored.resolve(), stored_key.id(), interface.id())
            })
    }
}

impl Default for Registry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// A batch of values accepted by [`Registry::register_many`]
///
/// Implemented for tuples of one to twelve `Send + Sync + 'static` values.
pub trait Services {
    /// Register every element under its own type
    fn register_into(self, registry: &mut Registry<'_>);
}

macro_rules! impl_services {
    ($($value:ident),+) => {
        impl<$($value: Send + Sync + 'static),+> Services for ($($value,)+) {
            #[allow(non_snake_case)]
            fn register_into(self, registry: &mut Registry<'_>) {
                let ($($value,)+) = self;
                $(registry.register($value);)+
            }
        }
    };
}

impl_services!(A);
impl_services!(A, B);
impl_services!(A, B, C);
impl_services!(A, B, C, D);
impl_services!(A, B, C, D, E);
impl_services!(A, B, C, D, E, F);
impl_services!(A, B, C, D, E, F, G);
impl_services!(A, B, C, D, E, F, G, H);
impl_services!(A, B, C, D, E, F, G, H, I);
impl_services!(A, B, C, D, E, F, G, H, I, J);
impl_services!(A, B, C, D, E, F, G, H, I, J, K);
impl_services!(A, B, C, D, E, F, G, H, I, J, K, L);
