//! Recursive mixin (trait) discovery over a class graph.
//!
//! The graph comes from a [`ReflectionProvider`]: every class has at most one
//! parent, and classes as well as mixins declare the mixins they use
//! directly. Mixins may use each other in cycles, so every walk keeps a
//! visited set and descends into each mixin once.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

pub type MixinSet = BTreeSet<String>;

pub trait ReflectionProvider {
    /// Immediate parent of `class`, if any.
    fn parent(&self, class: &str) -> Option<String>;
    /// Mixins `class` (or mixin) declares directly, in declaration order.
    fn uses(&self, class: &str) -> Vec<String>;
}

/// Ancestors of `class`, nearest first. A parent chain that loops back on
/// itself is cut at the first repeated class.
pub fn class_parents<R: ReflectionProvider + ?Sized>(reflection: &R, class: &str) -> Vec<String> {
    let mut seen = HashSet::from([normalize(class).to_owned()]);
    let mut parents = Vec::new();
    let mut current = normalize(class).to_owned();
    while let Some(parent) = reflection.parent(&current) {
        let parent = normalize(&parent).to_owned();
        if !seen.insert(parent.clone()) {
            warn!(class = %class, repeated = %parent, "cyclic class ancestry cut short");
            break;
        }
        parents.push(parent.clone());
        current = parent;
    }
    parents
}

/// Every mixin reachable from the mixins `mixin` declares. `mixin` itself is
/// only part of the result when it uses itself through a cycle.
pub fn trait_uses_recursive<R: ReflectionProvider + ?Sized>(reflection: &R, mixin: &str) -> MixinSet {
    let mut found = MixinSet::new();
    collect_uses(reflection, normalize(mixin), &mut found);
    found
}

/// Every mixin used by `class` or one of its ancestors, directly or through
/// other mixins.
pub fn class_uses_recursive<R: ReflectionProvider + ?Sized>(reflection: &R, class: &str) -> MixinSet {
    let mut found = MixinSet::new();
    let start = normalize(class).to_owned();
    for class in std::iter::once(start).chain(class_parents(reflection, class)) {
        collect_uses(reflection, &class, &mut found);
    }
    debug!(class = %class, mixins = found.len(), "mixins flattened");
    found
}

fn collect_uses<R: ReflectionProvider + ?Sized>(reflection: &R, start: &str, found: &mut MixinSet) {
    let mut pending: Vec<String> = reflection.uses(start);
    while let Some(mixin) = pending.pop() {
        let mixin = normalize(&mixin).to_owned();
        if found.insert(mixin.clone()) {
            pending.extend(reflection.uses(&mixin));
        }
    }
}

fn normalize(name: &str) -> &str {
    name.trim_start_matches('\\')
}

// ------------- ClassRegistry -------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub uses: Vec<String>,
}

/// In-memory [`ReflectionProvider`]. Unknown classes have neither a parent
/// nor mixins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassEntry>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    /// Reads `{"Class": {"parent": "Base", "uses": ["Mixin"]}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let registry: ClassRegistry = serde_json::from_str(json)?;
        Ok(registry.normalized())
    }
    /// Declares a class or mixin, replacing an earlier declaration.
    pub fn declare(&mut self, class: &str, parent: Option<&str>, uses: &[&str]) -> &mut Self {
        self.classes.insert(
            normalize(class).to_owned(),
            ClassEntry {
                parent: parent.map(|p| normalize(p).to_owned()),
                uses: uses.iter().map(|u| normalize(u).to_owned()).collect(),
            },
        );
        self
    }
    pub fn entry(&self, class: &str) -> Option<&ClassEntry> {
        self.classes.get(normalize(class))
    }
    pub fn len(&self) -> usize {
        self.classes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn normalized(self) -> Self {
        let mut registry = ClassRegistry::new();
        for (class, entry) in &self.classes {
            let uses: Vec<&str> = entry.uses.iter().map(String::as_str).collect();
            registry.declare(class, entry.parent.as_deref(), &uses);
        }
        registry
    }
}

impl ReflectionProvider for ClassRegistry {
    fn parent(&self, class: &str) -> Option<String> {
        self.entry(class).and_then(|entry| entry.parent.clone())
    }
    fn uses(&self, class: &str) -> Vec<String> {
        self.entry(class).map(|entry| entry.uses.clone()).unwrap_or_default()
    }
}
