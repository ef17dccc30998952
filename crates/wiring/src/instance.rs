//! Stored and resolved values
//!
//! Every value lives behind an `Arc<T>`, type-erased through a `downcast-rs`
//! trait object so that resolving a binding is a reference-count bump and the
//! typed side can recover `Arc<T>` (including `Arc<dyn Trait>`).

use std::fmt;
use std::sync::Arc;

use downcast_rs::{DowncastSync, impl_downcast};

trait Service: DowncastSync {
    fn clone_service(&self) -> Box<dyn Service>;
}
impl_downcast!(sync Service);

impl<T: ?Sized + Send + Sync + 'static> Service for Arc<T> {
    fn clone_service(&self) -> Box<dyn Service> {
        Box::new(Arc::clone(self))
    }
}

/// A resolved, type-erased value
pub struct Instance {
    inner: Box<dyn Service>,
    type_name: &'static str,
}

impl Instance {
    /// Erase a shared value
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Recover the shared value, or get the instance back when it holds another type
    pub fn into_arc<T: ?Sized + Send + Sync + 'static>(self) -> Result<Arc<T>, Self> {
        let type_name = self.type_name;
        match self.inner.downcast::<Arc<T>>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self { inner, type_name }),
        }
    }

    /// Borrow the shared value if it has type `T`
    pub fn downcast_ref<T: ?Sized + Send + Sync + 'static>(&self) -> Option<&Arc<T>> {
        self.inner.downcast_ref::<Arc<T>>()
    }

    /// Whether the instance holds an `Arc<T>`
    pub fn is<T: ?Sized + Send + Sync + 'static>(&self) -> bool {
        self.inner.is::<Arc<T>>()
    }

    /// Name of the type behind the `Arc`
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl Clone for Instance {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_service(),
            type_name: self.type_name,
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Zero-argument factory invoked on every resolution
///
/// Results are never memoized: two lookups call the loader twice.
pub struct Loader {
    load: Box<dyn Fn() -> Instance + Send + Sync>,
}

impl Loader {
    /// Wrap a factory producing shared values of type `T`
    pub fn new<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        Self {
            load: Box::new(move || Instance::new(factory())),
        }
    }

    /// Run the factory
    pub fn load(&self) -> Instance {
        (self.load)()
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}

/// What a registry table holds for one key
#[derive(Debug)]
pub enum StoredValue {
    /// A value returned as is (cloned `Arc`)
    Value(Instance),
    /// A factory called on each resolution
    Loader(Loader),
}

impl StoredValue {
    /// Produce the value this entry resolves to, running the loader if there is one
    pub fn resolve(&self) -> Instance {
        match self {
            Self::Value(instance) => instance.clone(),
            Self::Loader(loader) => loader.load(),
        }
    }

    /// Whether the entry is a loader
    pub fn is_loader(&self) -> bool {
        matches!(self, Self::Loader(_))
    }
}
