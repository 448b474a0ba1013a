//! Type Registry Tests
//!
//! Tests for:
//! - Namespace discovery: qualified names, depth bound, non-type keys
//! - Lazy registration of undiscovered constructors
//! - Name stability and identity-keyed lookups

use stagehand::host::{ClassRef, HostAdapter, ObjectRef, SyntheticHost};
use stagehand::registry::TypeRegistry;

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn discover_qualifies_library_types() {
    let host = SyntheticHost::new();
    let registry = TypeRegistry::new();
    let library = host.library().unwrap();

    let added = registry.discover(&library, "PIXI", 2);

    assert_eq!(added, 12);
    assert_eq!(&*registry.name_of(&host.classes().sprite), "PIXI.Sprite");
    assert_eq!(&*registry.name_of(&host.classes().graphics), "PIXI.Graphics");
    assert_eq!(&*registry.name_of(&host.classes().container), "PIXI.Container");
}

#[test]
fn discover_skips_lowercase_and_primitive_entries() {
    let class = ClassRef::new("helper");
    let namespace = ObjectRef::new()
        .with("VERSION", "6.5.8")
        .with("helper", &class)
        .with("utils", ObjectRef::new().with("Inner", ClassRef::new("Inner")));

    let registry = TypeRegistry::new();
    assert_eq!(registry.discover(&namespace, "PIXI", 2), 0);
    assert!(registry.is_empty());
}

#[test]
fn discover_descends_nested_namespaces() {
    let spine = ClassRef::new("Spine");
    let namespace = ObjectRef::new().with("Extras", ObjectRef::new().with("Spine", &spine));

    let registry = TypeRegistry::new();
    registry.discover(&namespace, "PIXI", 1);

    assert_eq!(&*registry.name_of(&spine), "PIXI.Extras.Spine");
}

#[test]
fn discover_respects_depth_bound() {
    let spine = ClassRef::new("Spine");
    let namespace = ObjectRef::new().with("Extras", ObjectRef::new().with("Spine", &spine));

    let registry = TypeRegistry::new();
    registry.discover(&namespace, "PIXI", 0);

    assert!(registry.lookup(&spine).is_none());
    // Falls back to the constructor's own name.
    assert_eq!(&*registry.name_of(&spine), "Spine");
}

#[test]
fn discover_terminates_on_cyclic_namespace() {
    let sprite = ClassRef::new("Sprite");
    let namespace = ObjectRef::new().with("Sprite", &sprite);
    namespace.set("Self", namespace.clone());

    let registry = TypeRegistry::new();
    registry.discover(&namespace, "PIXI", 16);

    assert_eq!(&*registry.name_of(&sprite), "PIXI.Sprite");
}

#[test]
fn discover_keeps_first_alias() {
    let sprite = ClassRef::new("Sprite");
    let namespace = ObjectRef::new()
        .with("Sprite", &sprite)
        .with("LegacySprite", &sprite);

    let registry = TypeRegistry::new();
    assert_eq!(registry.discover(&namespace, "PIXI", 2), 1);
    assert_eq!(&*registry.name_of(&sprite), "PIXI.Sprite");
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn same_named_classes_in_different_namespaces_stay_distinct() {
    let a = ClassRef::new("Sprite");
    let b = ClassRef::new("Sprite");
    let namespace = ObjectRef::new()
        .with("Legacy", ObjectRef::new().with("Sprite", &a))
        .with("Modern", ObjectRef::new().with("Sprite", &b));

    let registry = TypeRegistry::new();
    registry.discover(&namespace, "PIXI", 1);

    assert_eq!(&*registry.name_of(&a), "PIXI.Legacy.Sprite");
    assert_eq!(&*registry.name_of(&b), "PIXI.Modern.Sprite");
}

#[test]
fn class_of_is_stable_across_calls() {
    let host = SyntheticHost::new();
    let registry = TypeRegistry::new();
    registry.discover(&host.library().unwrap(), "PIXI", 2);

    let node = host.classes().sprite("hero", "hero.png");
    let first = registry.class_of(&node);
    for _ in 0..10 {
        assert_eq!(registry.class_of(&node), first);
    }
    assert_eq!(&*first, "PIXI.Sprite");
}

#[test]
fn lazy_name_is_not_replaced_by_later_discovery() {
    let host = SyntheticHost::new();
    let registry = TypeRegistry::new();

    let node = host.classes().sprite("hero", "hero.png");
    assert_eq!(&*registry.class_of(&node), "Sprite");

    registry.discover(&host.library().unwrap(), "PIXI", 2);
    assert_eq!(&*registry.class_of(&node), "Sprite");
}

#[test]
fn plain_objects_have_unknown_type() {
    let registry = TypeRegistry::new();
    let node = ObjectRef::new().with("x", 1.0);
    assert_eq!(&*registry.class_of(&node), TypeRegistry::UNKNOWN);
    assert!(registry.is_empty());
}

#[test]
fn lookup_does_not_register() {
    let registry = TypeRegistry::new();
    let class = ClassRef::new("Mesh");
    assert!(registry.lookup(&class).is_none());
    assert!(registry.is_empty());

    let _ = registry.name_of(&class);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup(&class).as_deref(), Some("Mesh"));
}
