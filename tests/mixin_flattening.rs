use std::cell::Cell;

use helperkit::mixin::{class_parents, class_uses_recursive, trait_uses_recursive, ClassRegistry, MixinSet, ReflectionProvider};

fn set(names: &[&str]) -> MixinSet {
    names.iter().map(|n| n.to_string()).collect()
}

fn hierarchy() -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    registry
        .declare("Model", None, &["Attributes", "Events"])
        .declare("User", Some("Model"), &["SoftDelete"])
        .declare("Admin", Some("User"), &[])
        .declare("Attributes", None, &["Casts"])
        .declare("SoftDelete", None, &["Events"])
        .declare("Events", None, &[])
        .declare("Casts", None, &[]);
    registry
}

#[test]
fn collects_across_ancestors_and_nesting() {
    let registry = hierarchy();
    assert_eq!(
        class_uses_recursive(&registry, "Admin"),
        set(&["Attributes", "Casts", "Events", "SoftDelete"])
    );
    assert_eq!(class_uses_recursive(&registry, "Model"), set(&["Attributes", "Casts", "Events"]));
}

#[test]
fn parents_nearest_first() {
    let registry = hierarchy();
    assert_eq!(class_parents(&registry, "Admin"), vec!["User", "Model"]);
    assert!(class_parents(&registry, "Model").is_empty());
}

#[test]
fn trait_uses_excludes_the_trait_itself() {
    let registry = hierarchy();
    assert_eq!(trait_uses_recursive(&registry, "Attributes"), set(&["Casts"]));
    assert!(trait_uses_recursive(&registry, "Casts").is_empty());
}

#[test]
fn cyclic_mixins_terminate() {
    let mut registry = ClassRegistry::new();
    registry
        .declare("A", None, &["B"])
        .declare("B", None, &["A"])
        .declare("Host", None, &["A"]);
    assert_eq!(class_uses_recursive(&registry, "Host"), set(&["A", "B"]));
    assert_eq!(trait_uses_recursive(&registry, "A"), set(&["A", "B"]));
}

#[test]
fn self_using_mixin_terminates() {
    let mut registry = ClassRegistry::new();
    registry.declare("Loop", None, &["Loop"]).declare("Host", None, &["Loop"]);
    assert_eq!(class_uses_recursive(&registry, "Host"), set(&["Loop"]));
}

#[test]
fn cyclic_ancestry_terminates() {
    let mut registry = ClassRegistry::new();
    registry
        .declare("Left", Some("Right"), &["L"])
        .declare("Right", Some("Left"), &["R"]);
    assert_eq!(class_parents(&registry, "Left"), vec!["Right"]);
    assert_eq!(class_uses_recursive(&registry, "Left"), set(&["L", "R"]));
}

#[test]
fn no_mixins_anywhere() {
    let mut registry = ClassRegistry::new();
    registry.declare("Child", Some("Parent"), &[]).declare("Parent", None, &[]);
    assert!(class_uses_recursive(&registry, "Child").is_empty());
    assert!(class_uses_recursive(&registry, "Unknown").is_empty());
}

#[test]
fn leading_backslash_is_ignored() {
    let registry = hierarchy();
    assert_eq!(class_uses_recursive(&registry, "\\User"), class_uses_recursive(&registry, "User"));
}

#[test]
fn registry_from_json() {
    let registry = ClassRegistry::from_json(
        r#"{
            "app\\model\\User": {"parent": "\\think\\Model", "uses": ["\\think\\model\\SoftDelete"]},
            "think\\Model": {"uses": ["think\\model\\concern\\Attribute"]}
        }"#,
    )
    .unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(
        class_uses_recursive(&registry, "app\\model\\User"),
        set(&["think\\model\\SoftDelete", "think\\model\\concern\\Attribute"])
    );
    assert!(ClassRegistry::from_json("[1, 2]").is_err());
}

/// Counts how often each class is asked for its mixins.
struct Counting {
    inner: ClassRegistry,
    calls: Cell<usize>,
}

impl ReflectionProvider for Counting {
    fn parent(&self, class: &str) -> Option<String> {
        self.inner.parent(class)
    }
    fn uses(&self, class: &str) -> Vec<String> {
        self.calls.set(self.calls.get() + 1);
        self.inner.uses(class)
    }
}

#[test]
fn each_mixin_is_expanded_once() {
    let mut inner = ClassRegistry::new();
    inner
        .declare("Host", None, &["A", "B", "C"])
        .declare("A", None, &["Shared"])
        .declare("B", None, &["Shared"])
        .declare("C", None, &["Shared", "A"])
        .declare("Shared", None, &[]);
    let counting = Counting { inner, calls: Cell::new(0) };
    assert_eq!(class_uses_recursive(&counting, "Host"), set(&["A", "B", "C", "Shared"]));
    // Host plus each of the four mixins
    assert_eq!(counting.calls.get(), 5);
}
