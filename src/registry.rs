//! Type Registry
//!
//! Host nodes are polymorphic and their concrete class is not known
//! statically. The registry gives every constructor one canonical, dotted
//! type name (`PIXI.Sprite`) and keeps it for its whole lifetime.
//!
//! # Population
//!
//! - **Eagerly** via [`TypeRegistry::discover`], a bounded walk over the
//!   host library namespace.
//! - **Lazily** via [`TypeRegistry::class_of`]: a constructor that was never
//!   discovered is named after its own unqualified name on first sight.
//!
//! Lookups are keyed by constructor identity, never by name, so two
//! same-named classes in different namespaces never collide.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::host::{ClassId, ClassRef, ObjectId, ObjectRef, Value};

/// Constructor → canonical type name cache.
#[derive(Debug)]
pub struct TypeRegistry {
    names: RwLock<FxHashMap<ClassId, Arc<str>>>,
    unknown: Arc<str>,
}

impl TypeRegistry {
    /// Type name reported for objects that have no constructor.
    pub const UNKNOWN: &'static str = "";

    #[must_use]
    pub fn new() -> Self {
        Self {
            names: RwLock::new(FxHashMap::default()),
            unknown: Arc::from(Self::UNKNOWN),
        }
    }

    /// Pre-populates the registry from a namespace object.
    ///
    /// Every entry whose key starts with an uppercase letter is considered:
    /// constructors are registered as `root_name.Key`, nested namespace
    /// objects are descended into while `max_depth` allows. Everything else
    /// is skipped. A constructor exported under several names keeps the first
    /// one seen. Returns the number of new mappings.
    pub fn discover(&self, root: &ObjectRef, root_name: &str, max_depth: usize) -> usize {
        let mut visited: FxHashSet<ObjectId> = FxHashSet::default();
        let mut names = self.names.write();
        let before = names.len();

        // (namespace, dotted prefix, remaining depth)
        let mut stack: Vec<(ObjectRef, String, usize)> = vec![(root.clone(), root_name.to_owned(), max_depth)];

        while let Some((namespace, prefix, depth)) = stack.pop() {
            if !visited.insert(namespace.id()) {
                continue;
            }

            let mut nested = Vec::new();
            for (key, value) in namespace.entries() {
                if !looks_like_type(&key) {
                    continue;
                }
                let qualified = qualify(&prefix, &key);
                match value {
                    Value::Class(class) => {
                        names.entry(class.id()).or_insert_with(|| Arc::from(qualified));
                    }
                    Value::Object(inner) if depth > 0 => {
                        nested.push((inner, qualified, depth - 1));
                    }
                    _ => {}
                }
            }
            // Keep namespace insertion order when popping.
            stack.extend(nested.into_iter().rev());
        }

        let added = names.len() - before;
        log::debug!("Discovered {added} host types under '{root_name}'");
        added
    }

    /// Returns the canonical type name of `node`.
    ///
    /// Objects without a constructor yield [`UNKNOWN`](Self::UNKNOWN).
    #[must_use]
    pub fn class_of(&self, node: &ObjectRef) -> Arc<str> {
        match node.class() {
            Some(class) => self.name_of(class),
            None => Arc::clone(&self.unknown),
        }
    }

    /// Returns the canonical name of `class`, registering its own name on a
    /// cache miss.
    #[must_use]
    pub fn name_of(&self, class: &ClassRef) -> Arc<str> {
        if let Some(name) = self.names.read().get(&class.id()) {
            return Arc::clone(name);
        }
        let mut names = self.names.write();
        let name = names
            .entry(class.id())
            .or_insert_with(|| Arc::from(class.name()));
        Arc::clone(name)
    }

    /// Cached name of `class`, without registering it.
    #[must_use]
    pub fn lookup(&self, class: &ClassRef) -> Option<Arc<str>> {
        self.names.read().get(&class.id()).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn looks_like_type(key: &str) -> bool {
    key.chars().next().is_some_and(char::is_uppercase)
}

fn qualify(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}
