//! # wiring
//!
//! Runtime service registry and argument-binding invoker.
//!
//! - **Registry**: values keyed by their type or by an interface they
//!   implement, lazy loaders, parent delegation for scoped registries
//! - **Invoker**: calls a function with every parameter resolved from the
//!   registry chain, failing before the call when one is missing
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Registry (process-wide singletons)                      │
//! │     ▲ parent                                             │
//! │  Registry (per request / session)  ◄── register*()       │
//! │     │                                                    │
//! │     ├── lookup(TypeKey) ── own table → interface         │
//! │     │                      fallback → parent             │
//! │     │                                                    │
//! │     └── invoke(fn) ── parameters() → lookup each → call  │
//! └──────────────────────────────────────────────────────────┘
//!
//! interface!(dyn Trait)          → INTERFACES      (linkme)
//! implements!(Type => dyn Trait) → IMPLEMENTATIONS (linkme)
//! ```
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use wiring::{Registry, implements, interface};
//!
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//! interface!(dyn Greeter);
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".into()
//!     }
//! }
//! implements!(English => dyn Greeter);
//!
//! fn main() -> wiring::Result<()> {
//!     let mut registry = Registry::new();
//!     registry.register(English);
//!
//!     let greeting = registry.invoke(|greeter: Arc<dyn Greeter>| greeter.greet())?;
//!     assert_eq!(greeting, "hello");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod implements;
pub mod instance;
pub mod invoke;
pub mod logging;
pub mod registry;
pub mod type_key;

pub use config::{ConfigLoader, LoggingConfig, RegistryConfig, WiringConfig};
pub use error::{Error, Result};
pub use instance::{Instance, Loader, StoredValue};
pub use invoke::{Dependency, Function, Injectable, ReturnValue};
pub use registry::{Registry, Services};
pub use type_key::{TypeKey, TypeKind};

#[doc(hidden)]
pub use linkme;
