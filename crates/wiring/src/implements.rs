//! Implementation table
//!
//! Records which stored types may stand in for which interfaces, and how to
//! turn the stored `Arc<Concrete>` into an `Arc<dyn Interface>`. Entries come
//! from [`implements!`](crate::implements) and are gathered with `linkme`.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::instance::Instance;

/// Converts an instance of the concrete type into an instance of the interface
///
/// Returns `None` when the instance does not hold the expected concrete type.
pub type Caster = fn(Instance) -> Option<Instance>;

/// One `implements!` declaration
pub struct Implementation {
    /// Type id of the stored type
    pub concrete: fn() -> TypeId,
    /// Type id of the interface it satisfies
    pub interface: fn() -> TypeId,
    /// Upcast from the stored type to the interface
    pub cast: Caster,
}

/// All `implements!` declarations linked into the binary
#[linkme::distributed_slice]
pub static IMPLEMENTATIONS: [Implementation] = [..];

static IMPLEMENTATION_INDEX: LazyLock<HashMap<(TypeId, TypeId), Caster>> = LazyLock::new(|| {
    IMPLEMENTATIONS
        .iter()
        .map(|entry| (((entry.concrete)(), (entry.interface)()), entry.cast))
        .collect()
});

/// Whether `concrete` was declared to implement `interface`
pub(crate) fn is_declared(concrete: TypeId, interface: TypeId) -> bool {
    IMPLEMENTATION_INDEX.contains_key(&(concrete, interface))
}

/// Upcast `instance`, stored under `concrete`, to `interface`
pub(crate) fn upcast(instance: Instance, concrete: TypeId, interface: TypeId) -> Option<Instance> {
    let cast = IMPLEMENTATION_INDEX.get(&(concrete, interface))?;
    cast(instance)
}

/// Declare that a stored type satisfies one or more interfaces
///
/// The concrete type must implement each trait; the coercion to
/// `Arc<dyn Trait>` is checked at compile time.
///
/// ```ignore
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// wiring::implements!(English => dyn Greeter);
/// ```
#[macro_export]
macro_rules! implements {
    ($concrete:ty => $($iface:ty),+ $(,)?) => {
        $(
            const _: () = {
                #[$crate::linkme::distributed_slice($crate::implements::IMPLEMENTATIONS)]
                #[linkme(crate = $crate::linkme)]
                static IMPLEMENTATION: $crate::implements::Implementation =
                    $crate::implements::Implementation {
                        concrete: ::std::any::TypeId::of::<$concrete>,
                        interface: ::std::any::TypeId::of::<$iface>,
                        cast: |instance| {
                            instance
                                .into_arc::<$concrete>()
                                .ok()
                                .map(|value| {
                                    $crate::Instance::new(value as ::std::sync::Arc<$iface>)
                                })
                        },
                    };
            };
        )+
    };
}
