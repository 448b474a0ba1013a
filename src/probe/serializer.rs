//! Graph Serializer
//!
//! Dumps an arbitrary host object graph to JSON. The graph may be cyclic
//! (`parent` links, caches that point back at the stage), so the traversal
//! keeps a set of object identities it has already emitted:
//!
//! - an object or list reached a second time is dropped: its key is omitted
//!   from the enclosing object, or it becomes `null` inside a list
//! - functions and constructors are dropped the same way
//! - keys listed in [`RedactKeys`] are skipped wherever they occur
//! - values nested deeper than the configured maximum depth are dropped
//!
//! Identities are marked in pre-order, at the moment a value is first about
//! to be written, so the first occurrence along a depth-first walk in
//! insertion order is the one that is kept. Output is byte-identical for an
//! unchanged graph.

use std::cell::{Cell, RefCell};

use rustc_hash::FxHashSet;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::errors::Result;
use crate::host::{ObjectId, ObjectRef, Value};

/// Set of property names excluded from a graph dump.
#[derive(Debug, Clone, Default)]
pub struct RedactKeys(FxHashSet<String>);

impl RedactKeys {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.0.insert(key.into());
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RedactKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GraphSerializer {
    max_depth: usize,
}

impl GraphSerializer {
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    #[must_use]
    pub fn new() -> Self {
        Self::with_max_depth(Self::DEFAULT_MAX_DEPTH)
    }

    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Serializes `root` to a JSON string.
    ///
    /// A root that is a function or constructor serializes as `null`.
    pub fn serialize(&self, root: &Value, redact: &RedactKeys) -> Result<String> {
        let traversal = Traversal {
            seen: RefCell::new(FxHashSet::default()),
            redact,
            max_depth: self.max_depth,
            truncated: Cell::new(false),
        };

        let json = if traversal.admit(root, 0) {
            serde_json::to_string(&Guarded {
                value: root,
                traversal: &traversal,
                depth: 0,
            })?
        } else {
            "null".to_owned()
        };

        if traversal.truncated.get() {
            log::warn!(
                "Graph dump exceeded depth {}; deeper values were omitted",
                self.max_depth
            );
        }
        Ok(json)
    }

    /// Convenience for serializing an object root.
    pub fn serialize_object(&self, root: &ObjectRef, redact: &RedactKeys) -> Result<String> {
        self.serialize(&Value::Object(root.clone()), redact)
    }
}

impl Default for GraphSerializer {
    fn default() -> Self {
        Self::new()
    }
}

struct Traversal<'r> {
    seen: RefCell<FxHashSet<ObjectId>>,
    redact: &'r RedactKeys,
    max_depth: usize,
    truncated: Cell<bool>,
}

impl Traversal<'_> {
    /// Decides whether `value` is written, marking references as seen.
    fn admit(&self, value: &Value, depth: usize) -> bool {
        match value {
            Value::Class(_) | Value::Function(_) => false,
            Value::Object(_) | Value::List(_) => {
                if depth > self.max_depth {
                    self.truncated.set(true);
                    return false;
                }
                value
                    .identity()
                    .is_some_and(|id| self.seen.borrow_mut().insert(id))
            }
            _ => true,
        }
    }
}

struct Guarded<'a, 'r> {
    value: &'a Value,
    traversal: &'a Traversal<'r>,
    depth: usize,
}

impl<'r> Guarded<'_, 'r> {
    fn child<'b>(&'b self, value: &'b Value) -> Guarded<'b, 'r> {
        Guarded {
            value,
            traversal: self.traversal,
            depth: self.depth + 1,
        }
    }
}

impl Serialize for Guarded<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value {
            Value::Null | Value::Class(_) | Value::Function(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serialize_number(*n, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(list) => {
                let items = list.items();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in &items {
                    if self.traversal.admit(item, self.depth + 1) {
                        seq.serialize_element(&self.child(item))?;
                    } else {
                        seq.serialize_element(&())?;
                    }
                }
                seq.end()
            }
            Value::Object(object) => {
                let entries = object.entries();
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in &entries {
                    if self.traversal.redact.contains(key)
                        || !self.traversal.admit(value, self.depth + 1)
                    {
                        continue;
                    }
                    map.serialize_entry(&**key, &self.child(value))?;
                }
                map.end()
            }
        }
    }
}

/// An `f64` written with the dump's number rule, for other JSON outputs that
/// must format numbers the same way.
pub(crate) struct JsonNumber(pub f64);

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_number(self.0, serializer)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn serialize_json_number<S: Serializer>(
    n: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serialize_number(*n, serializer)
}

pub(crate) fn serialize_json_numbers<S: Serializer, const N: usize>(
    values: &[f64; N],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(N))?;
    for n in values {
        seq.serialize_element(&JsonNumber(*n))?;
    }
    seq.end()
}

/// Integral values are written without a fraction (`3`, not `3.0`).
/// Non-finite values become `null`.
fn serialize_number<S: Serializer>(n: f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if !n.is_finite() {
        serializer.serialize_unit()
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}
