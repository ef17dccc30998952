//! Function invocation with automatic argument binding
//!
//! A function's parameter list is turned into a list of [`TypeKey`]s at
//! compile time through [`Injectable`]. Invoking it resolves every key, in
//! declared order, into the registry's scratch buffer and only calls the
//! function once all of them resolved.
//!
//! ```text
//! invoke(|db: Arc<Db>, log: Arc<dyn Logger>| ...)
//!          │
//!          ▼
//! parameters() = [Db, dyn Logger]
//!          │  lookup each, left to right
//!          ▼
//! args = [Instance(Arc<Db>), Instance(Arc<dyn Logger>)]   ── miss → MissingDependency
//!          │  downcast each
//!          ▼
//! f(Arc<Db>, Arc<dyn Logger>)
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::registry::Registry;
use crate::type_key::TypeKey;

/// A parameter type the invoker knows how to supply
pub trait Dependency: Sized + 'static {
    /// Key the parameter is resolved under
    fn type_key() -> TypeKey;

    /// Extract the parameter from a resolved instance
    fn from_instance(instance: Instance) -> Option<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Dependency for Arc<T> {
    fn type_key() -> TypeKey {
        TypeKey::of::<T>()
    }

    fn from_instance(instance: Instance) -> Option<Self> {
        instance.into_arc::<T>().ok()
    }
}

/// Functions whose every parameter is a [`Dependency`]
///
/// Implemented for `FnOnce` closures and fn items of zero to twelve
/// parameters. `Args` is the parameter tuple and only disambiguates arities.
pub trait Injectable<Args>: Sized {
    /// Return type of the function
    type Output;

    /// Keys of the parameters in declared order
    fn parameters() -> Vec<TypeKey>;

    /// Call the function with arguments taken, in order, from `args`
    ///
    /// `args` is drained. Fails with [`Error::TypeMismatch`] before calling
    /// when an argument does not have its parameter's type.
    fn call_with(self, args: &mut Vec<Instance>) -> Result<Self::Output>;
}

macro_rules! impl_injectable {
    ($($param:ident),*) => {
        impl<Func, Out, $($param,)*> Injectable<($($param,)*)> for Func
        where
            Func: FnOnce($($param),*) -> Out,
            $($param: Dependency,)*
        {
            type Output = Out;

            fn parameters() -> Vec<TypeKey> {
                vec![$($param::type_key()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn call_with(self, args: &mut Vec<Instance>) -> Result<Out> {
                let mut resolved = args.drain(..).enumerate();
                $(
                    let $param = {
                        let Some((index, instance)) = resolved.next() else {
                            return Err(Error::invalid_argument(
                                "Unable to invoke: fewer arguments than parameters",
                            ));
                        };
                        $param::from_instance(instance)
                            .ok_or_else(|| Error::type_mismatch(index, &$param::type_key()))?
                    };
                )*
                Ok(self($($param),*))
            }
        }
    };
}

impl_injectable!();
impl_injectable!(A);
impl_injectable!(A, B);
impl_injectable!(A, B, C);
impl_injectable!(A, B, C, D);
impl_injectable!(A, B, C, D, E);
impl_injectable!(A, B, C, D, E, F);
impl_injectable!(A, B, C, D, E, F, G);
impl_injectable!(A, B, C, D, E, F, G, H);
impl_injectable!(A, B, C, D, E, F, G, H, I);
impl_injectable!(A, B, C, D, E, F, G, H, I, J);
impl_injectable!(A, B, C, D, E, F, G, H, I, J, K);
impl_injectable!(A, B, C, D, E, F, G, H, I, J, K, L);

/// A boxed return value of a type-erased function
pub type ReturnValue = Box<dyn Any + Send>;

type ErasedCall = dyn Fn(&mut Vec<Instance>) -> Result<Vec<ReturnValue>> + Send + Sync;

/// A type-erased injectable function
///
/// Lets hosts keep heterogeneous handlers in one collection and hand them to
/// [`Registry::invoke_value`] or [`Registry::invoke_function`].
///
/// The output vector holds at most one value. A function returning `()`
/// produces an empty vector; any other return type produces exactly one
/// element. Several results come back as one boxed tuple, downcast it as
/// the whole tuple type:
///
/// ```ignore
/// let function = Function::new(|n: Arc<u32>| (*n, n.to_string()));
/// let outputs = registry.invoke_function(&function)?;
/// let (number, text) = outputs[0].downcast_ref::<(u32, String)>().unwrap();
/// ```
pub struct Function {
    name: &'static str,
    parameters: Vec<TypeKey>,
    call: Box<ErasedCall>,
}

impl Function {
    /// Erase an injectable function
    pub fn new<F, Args>(function: F) -> Self
    where
        F: Injectable<Args> + Clone + Send + Sync + 'static,
        F::Output: Send + 'static,
    {
        Self {
            name: type_name::<F>(),
            parameters: F::parameters(),
            call: Box::new(move |args| {
                let output = function.clone().call_with(args)?;
                if TypeId::of::<F::Output>() == TypeId::of::<()>() {
                    Ok(Vec::new())
                } else {
                    Ok(vec![Box::new(output) as ReturnValue])
                }
            }),
        }
    }

    /// Keys of the parameters in declared order
    pub fn parameters(&self) -> &[TypeKey] {
        &self.parameters
    }

    /// Type name of the wrapped function
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl Registry<'_> {
    /// Call `function` with every parameter resolved from this registry
    ///
    /// # Errors
    ///
    /// [`Error::MissingDependency`] for the first parameter, left to right,
    /// that no registry in the chain can resolve. The function is not called.
    pub fn invoke<F, Args>(&mut self, function: F) -> Result<F::Output>
    where
        F: Injectable<Args>,
    {
        self.resolve_arguments(&F::parameters())?;
        function.call_with(&mut self.args)
    }

    /// Call a type-erased function held in an arbitrary value
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `target` is not a [`Function`], and
    /// the errors of [`Registry::invoke`] otherwise.
    pub fn invoke_value<V: Any>(&mut self, target: &V) -> Result<Vec<ReturnValue>> {
        let Some(function) = (target as &dyn Any).downcast_ref::<Function>() else {
            return Err(Error::invalid_argument(format!(
                "Unable to invoke: {} is not a function",
                type_name::<V>()
            )));
        };
        self.invoke_function(function)
    }

    /// Call a type-erased function
    pub fn invoke_function(&mut self, function: &Function) -> Result<Vec<ReturnValue>> {
        self.resolve_arguments(&function.parameters)?;
        (function.call)(&mut self.args)
    }

    fn resolve_arguments(&mut self, parameters: &[TypeKey]) -> Result<()> {
        self.args.clear();
        self.args.reserve(parameters.len());
        for (index, key) in parameters.iter().enumerate() {
            let Some(instance) = self.lookup(key) else {
                self.args.clear();
                debug!(index, key = key.name(), "Unresolved parameter");
                return Err(Error::missing_dependency(index, key));
            };
            self.args.push(instance);
        }
        Ok(())
    }
}
