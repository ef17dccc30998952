//! Tests for interface registration and interface fallback

use std::sync::Arc;

use wiring::{Registry, TypeKey, TypeKind};

use crate::fixtures::{English, French, Greeter, Special};

#[test]
fn test_interface_keys_are_marked() {
    assert_eq!(TypeKey::of::<dyn Greeter>().kind(), TypeKind::Interface);
    assert_eq!(TypeKey::of::<English>().kind(), TypeKind::Concrete);
    assert_eq!(
        TypeKey::interface_behind::<Arc<dyn Greeter>>(),
        TypeKey::interface::<dyn Greeter>()
    );
}

#[test]
fn test_satisfaction_follows_declarations() {
    let greeter = TypeKey::of::<dyn Greeter>();

    assert!(TypeKey::of::<English>().satisfies(&greeter));
    assert!(TypeKey::of::<French>().satisfies(&greeter));
    assert!(!TypeKey::of::<String>().satisfies(&greeter));
    assert!(!TypeKey::of::<English>().satisfies(&TypeKey::of::<String>()));
}

#[test]
fn test_register_as_binds_interface_key_only() {
    let mut registry = Registry::new();
    registry.register_as::<dyn Greeter>(Arc::new(English::new("interface")));

    let greeter = registry.get::<dyn Greeter>().expect("bound under dyn Greeter");
    assert_eq!(greeter.greet(), "hello interface");
    assert!(registry.get::<English>().is_none());
}

#[test]
fn test_same_concrete_type_under_two_keys() {
    let mut registry = Registry::new();
    registry.register(String::from("something"));
    registry.register_as::<dyn Special>(Arc::new(String::from("another thing")));

    assert_eq!(registry.count(), 2);
    assert_eq!(
        registry.get::<String>().as_deref().map(String::as_str),
        Some("something")
    );
    assert!(registry.get::<dyn Special>().is_some());
}

#[test]
fn test_fallback_resolves_implementation() {
    let mut registry = Registry::new();
    registry.register(English::new("fallback"));

    let greeter = registry
        .lookup(&TypeKey::of::<dyn Greeter>())
        .expect("English satisfies Greeter")
        .into_arc::<dyn Greeter>()
        .expect("fallback upcasts to Arc<dyn Greeter>");

    assert_eq!(greeter.greet(), "hello fallback");
}

#[test]
fn test_fallback_shares_the_stored_value() {
    let mut registry = Registry::new();
    let english = Arc::new(English::new("shared"));
    registry.register_arc(Arc::clone(&english));

    let _greeter = registry.get::<dyn Greeter>().expect("fallback");

    assert_eq!(Arc::strong_count(&english), 3);
}

#[test]
fn test_exact_interface_binding_beats_fallback() {
    let mut registry = Registry::new();
    registry.register(English::new("concrete"));
    registry.register_as::<dyn Greeter>(Arc::new(French));

    let greeter = registry.get::<dyn Greeter>().expect("bound");
    assert_eq!(greeter.greet(), "bonjour");
}

#[test]
fn test_fallback_picks_one_of_several_implementations() {
    let mut registry = Registry::new();
    registry.register(English::new("either"));
    registry.register(French);

    let greeting = registry.get::<dyn Greeter>().expect("bound").greet();
    assert!(
        greeting == "hello either" || greeting == "bonjour",
        "unexpected greeting {greeting}"
    );
}

#[test]
fn test_fallback_does_not_apply_to_concrete_keys() {
    let mut registry = Registry::new();
    registry.register_as::<dyn Greeter>(Arc::new(French));

    assert!(registry.get::<French>().is_none());
}

#[test]
fn test_interface_without_implementation_is_none() {
    let mut registry = Registry::new();
    registry.register(English::new("no special"));

    assert!(registry.get::<dyn Special>().is_none());
}

#[test]
#[should_panic(expected = "needs to be an interface")]
fn test_register_as_concrete_type_panics() {
    let mut registry = Registry::new();
    registry.register_as::<English>(Arc::new(English::new("oops")));
}

#[test]
#[should_panic(expected = "needs to be an interface")]
fn test_register_loader_as_concrete_type_panics() {
    let mut registry = Registry::new();
    registry.register_loader_as::<String, _>(|| Arc::new(String::new()));
}

#[test]
#[should_panic(expected = "needs to be an interface")]
fn test_register_as_undeclared_trait_panics() {
    trait Undeclared: Send + Sync {}
    impl Undeclared for French {}

    let mut registry = Registry::new();
    registry.register_as::<dyn Undeclared>(Arc::new(French));
}
