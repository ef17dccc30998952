//! Shared test types and interface declarations

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

wiring::interface!(dyn Greeter);

/// Interface without methods, satisfied by nothing through fallback
pub trait Special: Send + Sync {}

wiring::interface!(dyn Special);

impl Special for String {}

#[derive(Debug, Clone, PartialEq)]
pub struct English {
    pub name: String,
}

impl English {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Greeter for English {
    fn greet(&self) -> String {
        format!("hello {}", self.name)
    }
}

wiring::implements!(English => dyn Greeter);

#[derive(Debug, Clone, PartialEq)]
pub struct French;

impl Greeter for French {
    fn greet(&self) -> String {
        "bonjour".to_string()
    }
}

wiring::implements!(French => dyn Greeter);

/// Value produced by counting loaders
#[derive(Debug, PartialEq)]
pub struct Ticket(pub usize);

/// Loader that hands out `Ticket(n)` where `n` is the number of previous calls
pub fn ticket_loader(calls: &Arc<AtomicUsize>) -> impl Fn() -> Arc<Ticket> + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    move || Arc::new(Ticket(calls.fetch_add(1, Ordering::SeqCst)))
}
