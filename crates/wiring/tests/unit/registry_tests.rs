//! Tests for own-table registration and lookup

use std::sync::Arc;

use wiring::{Registry, StoredValue, TypeKey};

use crate::fixtures::English;

#[test]
fn test_new_registry_is_empty() {
    let registry = Registry::new();
    assert_eq!(registry.count(), 0);
    assert!(registry.parent().is_none());
}

#[test]
fn test_lookup_by_exact_type_returns_registered_value() {
    let mut registry = Registry::new();
    registry.register(String::from("something"));

    let found = registry
        .lookup(&TypeKey::of::<String>())
        .expect("String should be registered");
    let value = found.into_arc::<String>().expect("instance should hold a String");

    assert_eq!(value.as_str(), "something");
}

#[test]
fn test_lookup_unregistered_type_is_none() {
    let mut registry = Registry::new();
    registry.register(String::from("something"));

    assert!(registry.lookup(&TypeKey::of::<i32>()).is_none());
    assert!(registry.get::<i32>().is_none());
}

#[test]
fn test_register_arc_preserves_identity() {
    let mut registry = Registry::new();
    let english = Arc::new(English::new("world"));
    registry.register_arc(Arc::clone(&english));

    let first = registry.get::<English>().expect("registered");
    let second = registry.get::<English>().expect("registered");

    assert!(Arc::ptr_eq(&english, &first));
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_register_arc_accepts_unsized_values() {
    let mut registry = Registry::new();
    registry.register_arc::<str>(Arc::from("slice"));

    assert_eq!(registry.get::<str>().as_deref(), Some("slice"));
}

#[test]
fn test_last_registration_wins() {
    let mut registry = Registry::new();
    registry.register(English::new("first"));
    registry.register(English::new("second"));

    assert_eq!(registry.count(), 1);
    assert_eq!(registry.get::<English>().expect("registered").name, "second");
}

#[test]
fn test_register_many_registers_each_element() {
    let mut registry = Registry::new();
    registry.register_many((String::from("text"), 42_u32, 1.5_f64, English::new("many")));

    assert_eq!(registry.count(), 4);
    assert_eq!(registry.get::<String>().as_deref().map(String::as_str), Some("text"));
    assert_eq!(registry.get::<u32>().as_deref(), Some(&42));
    assert_eq!(registry.get::<f64>().as_deref(), Some(&1.5));
    assert_eq!(registry.get::<English>().expect("registered").name, "many");
}

#[test]
fn test_set_service_binds_raw_key() {
    let mut registry = Registry::new();
    let key = TypeKey::of::<u64>();
    registry.set_service(key, StoredValue::Value(wiring::Instance::new(Arc::new(7_u64))));

    assert_eq!(registry.get::<u64>().as_deref(), Some(&7));
}

#[test]
fn test_reset_removes_own_bindings() {
    let mut registry = Registry::new();
    registry.register(String::from("something"));
    registry.register(1_i32);

    registry.reset();

    assert_eq!(registry.count(), 0);
    assert!(registry.get::<String>().is_none());

    registry.register(2_i32);
    assert_eq!(registry.get::<i32>().as_deref(), Some(&2));
}

#[test]
fn test_reset_on_empty_registry_is_noop() {
    let mut registry = Registry::new();
    registry.reset();
    assert_eq!(registry.count(), 0);
}

#[test]
fn test_debug_lists_bound_keys() {
    let mut registry = Registry::new();
    registry.register(English::new("debug"));

    let debug = format!("{registry:?}");
    assert!(debug.contains("English"), "unexpected debug output: {debug}");
    assert!(debug.contains("has_parent: false"));
}
