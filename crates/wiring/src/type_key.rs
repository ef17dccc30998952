//! Type keys
//!
//! A [`TypeKey`] identifies the binding slot a value is stored under: either a
//! concrete type or an interface (a trait object type such as `dyn Greeter`).
//!
//! Rust cannot tell at runtime whether a `TypeId` belongs to a trait object, so
//! interfaces are declared once with [`interface!`](crate::interface). The
//! declarations are collected at link time into [`INTERFACES`] and indexed on
//! first use.
//!
//! ```text
//! interface!(dyn Greeter)          TypeKey::of::<dyn Greeter>()
//!          │                                 │
//!          ▼                                 ▼
//! ┌──────────────────┐   LazyLock   ┌──────────────────────┐
//! │ INTERFACES slice │ ───────────→ │ HashSet<TypeId>      │ → TypeKind::Interface
//! └──────────────────┘              └──────────────────────┘
//! ```

use std::any::{TypeId, type_name};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::LazyLock;

use crate::implements;

/// Interface declarations, one `TypeId::of::<dyn Trait>` per [`interface!`](crate::interface)
#[linkme::distributed_slice]
pub static INTERFACES: [fn() -> TypeId] = [..];

static DECLARED_INTERFACES: LazyLock<HashSet<TypeId>> =
    LazyLock::new(|| INTERFACES.iter().map(|type_id| type_id()).collect());

/// Whether a key names a concrete type or an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Any type not declared with `interface!`
    Concrete,
    /// A trait object type declared with `interface!`
    Interface,
}

/// Identifier of a binding slot
///
/// Equality and hashing only consider the underlying [`TypeId`]; the name and
/// kind are derived from it.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
}

impl TypeKey {
    /// Key of `T` as written, without asserting anything about its kind
    pub fn of<T: ?Sized + 'static>() -> Self {
        let id = TypeId::of::<T>();
        let kind = if DECLARED_INTERFACES.contains(&id) {
            TypeKind::Interface
        } else {
            TypeKind::Concrete
        };
        Self {
            id,
            name: type_name::<T>(),
            kind,
        }
    }

    /// Key of the interface `I`
    ///
    /// # Panics
    ///
    /// Panics when `I` was not declared with `interface!`. Passing a concrete
    /// type here is a programming error, not a runtime condition.
    pub fn interface<I: ?Sized + 'static>() -> Self {
        let key = Self::of::<I>();
        assert!(
            key.is_interface(),
            "{} needs to be an interface declared with `interface!(dyn Trait)`",
            key.name
        );
        key
    }

    /// Key of the interface behind one level of indirection
    ///
    /// `interface_behind::<Arc<dyn Greeter>>()` and
    /// `interface_behind::<&'static dyn Greeter>()` both yield the key of
    /// `dyn Greeter`.
    ///
    /// # Panics
    ///
    /// Same as [`TypeKey::interface`], for the dereferenced type.
    pub fn interface_behind<P>() -> Self
    where
        P: Deref,
        P::Target: 'static,
    {
        Self::interface::<P::Target>()
    }

    /// The underlying type id
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, for diagnostics only
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Kind of the key
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the key names a declared interface
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Whether a value stored under this key can stand in for `interface`
    ///
    /// True when an `implements!` declaration links the two types.
    pub fn satisfies(&self, interface: &TypeKey) -> bool {
        interface.is_interface() && implements::is_declared(self.id, interface.id)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeKey")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declare trait object types as interfaces
///
/// Lookups for a declared interface fall back to any stored value whose type
/// was linked to it with [`implements!`](crate::implements).
///
/// ```ignore
/// pub trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// wiring::interface!(dyn Greeter);
/// ```
#[macro_export]
macro_rules! interface {
    ($($iface:ty),+ $(,)?) => {
        $(
            const _: () = {
                #[$crate::linkme::distributed_slice($crate::type_key::INTERFACES)]
                #[linkme(crate = $crate::linkme)]
                static DECLARATION: fn() -> ::std::any::TypeId = ::std::any::TypeId::of::<$iface>;
            };
        )+
    };
}
