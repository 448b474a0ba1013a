//! State Snapshotter
//!
//! Flattens heterogeneous nodes into plain records. Each configured
//! [`PropertyPath`] becomes one record key (the dotted path); the value is
//! read by following the path through the node. A missing step omits the key
//! instead of failing, and values that are not primitives are omitted too, so
//! a [`SnapshotRecord`] never contains references and needs no cycle
//! handling to serialize.
//!
//! The special single-segment path `type` is answered by the
//! [`TypeRegistry`] rather than by a property read.
//!
//! Numbers serialize with the same rule as the graph dump: integral values
//! without a fraction, non-finite values as `null`.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{ProbeError, Result};
use crate::host::{ObjectRef, Value};
use crate::probe::serializer::{serialize_json_number, serialize_json_numbers};
use crate::registry::TypeRegistry;

// ============================================================================
// PropertyPath
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PathKind {
    Property,
    TypeName,
}

/// An ordered list of property names, e.g. `texture.baseTexture.resource.url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    key: String,
    segments: Vec<String>,
    kind: PathKind,
}

impl PropertyPath {
    /// Key reserved for the registry-resolved type name.
    pub const TYPE_KEY: &'static str = "type";

    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(ProbeError::InvalidPropertyPath(segments.join(".")));
        }
        let key = segments.join(".");
        let kind = if key == Self::TYPE_KEY {
            PathKind::TypeName
        } else {
            PathKind::Property
        };
        Ok(Self {
            key,
            segments,
            kind,
        })
    }

    /// Record key: the segments joined by `.`.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[inline]
    #[must_use]
    pub fn is_type(&self) -> bool {
        self.kind == PathKind::TypeName
    }
}

/// Parses a dotted path. Optional-chaining marks (`texture?.frame`) are
/// accepted and dropped.
impl FromStr for PropertyPath {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(ProbeError::InvalidPropertyPath(s.to_owned()));
        }
        Self::from_segments(s.split('.').map(|seg| seg.trim().trim_end_matches('?')))
            .map_err(|_| ProbeError::InvalidPropertyPath(s.to_owned()))
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A primitive record value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Null,
    Bool(bool),
    Number(#[serde(serialize_with = "serialize_json_number")] f64),
    String(String),
}

impl Primitive {
    /// Converts a host value; `None` for anything that is not a primitive.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(*n)),
            Value::String(s) => Some(Self::String(s.to_string())),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// One node's flattened properties, in path order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotRecord(IndexMap<String, Primitive>);

impl SnapshotRecord {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Primitive> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Primitive)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn insert(&mut self, key: &str, value: Primitive) {
        self.0.insert(key.to_owned(), value);
    }
}

/// Point-in-time scene state as handed to an external driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Renderer resolution (device pixel ratio).
    #[serde(serialize_with = "serialize_json_number")]
    pub resolution: f64,
    /// Canvas `[width, height]` in pixels.
    #[serde(serialize_with = "serialize_json_numbers")]
    pub size: [f64; 2],
    /// One record per tracked node, in tracked order.
    pub scene: Vec<SnapshotRecord>,
}

// ============================================================================
// StateSnapshotter
// ============================================================================

pub struct StateSnapshotter<'a> {
    registry: &'a TypeRegistry,
    paths: &'a [PropertyPath],
}

impl<'a> StateSnapshotter<'a> {
    #[must_use]
    pub fn new(registry: &'a TypeRegistry, paths: &'a [PropertyPath]) -> Self {
        Self { registry, paths }
    }

    /// Flattens one node.
    #[must_use]
    pub fn record(&self, node: &ObjectRef) -> SnapshotRecord {
        let mut record = SnapshotRecord::default();
        for path in self.paths {
            let value = if path.is_type() {
                Some(Primitive::String(self.registry.class_of(node).to_string()))
            } else {
                node.resolve(path.segments())
                    .as_ref()
                    .and_then(Primitive::from_value)
            };
            if let Some(value) = value {
                record.insert(path.key(), value);
            }
        }
        record
    }

    /// Flattens every tracked node. The result has the same length and order
    /// as `tracked`.
    #[must_use]
    pub fn snapshot(&self, tracked: &[ObjectRef]) -> Vec<SnapshotRecord> {
        tracked.iter().map(|node| self.record(node)).collect()
    }
}
