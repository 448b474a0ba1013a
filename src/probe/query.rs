//! Tracked-list queries.
//!
//! Selectors narrow a frame's tracked list the way an automation driver
//! addresses on-canvas objects: by type, texture resource, text or
//! visibility. Selectors compose with AND and keep tracked order.
//!
//! ```rust,ignore
//! let buttons = probe
//!     .query()
//!     .of_type("PIXI.Sprite")
//!     .with_resource("assets/play.png")
//!     .nodes();
//! ```

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::host::{ObjectId, ObjectRef};
use crate::probe::hook::Frame;
use crate::probe::snapshot::{PropertyPath, SnapshotRecord, StateSnapshotter};
use crate::registry::TypeRegistry;

const RESOURCE_PATH: [&str; 4] = ["texture", "baseTexture", "resource", "url"];
const ASSET_PATH: [&str; 4] = ["_texture", "baseTexture", "resource", "url"];

/// A single predicate over tracked nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Registry type name equals the given name.
    Type(String),
    /// `texture.baseTexture.resource.url` equals the given URL.
    Resource(String),
    /// `text` equals the given string.
    Text(String),
    /// `visible` is exactly the given flag.
    Visible(bool),
}

impl Selector {
    #[must_use]
    pub fn matches(&self, node: &ObjectRef, registry: &TypeRegistry) -> bool {
        match self {
            Self::Type(name) => *registry.class_of(node) == **name,
            Self::Resource(url) => node
                .resolve(&RESOURCE_PATH)
                .is_some_and(|v| v.as_str() == Some(url.as_str())),
            Self::Text(text) => node
                .get("text")
                .is_some_and(|v| v.as_str() == Some(text.as_str())),
            Self::Visible(flag) => node.get_bool("visible") == Some(*flag),
        }
    }
}

/// A query pinned to one published frame.
pub struct TrackedQuery<'a> {
    frame: Arc<Frame>,
    registry: &'a TypeRegistry,
    selectors: Vec<Selector>,
}

impl<'a> TrackedQuery<'a> {
    #[must_use]
    pub fn new(frame: Arc<Frame>, registry: &'a TypeRegistry) -> Self {
        Self {
            frame,
            registry,
            selectors: Vec::new(),
        }
    }

    #[must_use]
    pub fn select(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    #[must_use]
    pub fn of_type(self, type_name: impl Into<String>) -> Self {
        self.select(Selector::Type(type_name.into()))
    }

    #[must_use]
    pub fn with_resource(self, url: impl Into<String>) -> Self {
        self.select(Selector::Resource(url.into()))
    }

    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.select(Selector::Text(text.into()))
    }

    #[must_use]
    pub fn visible(self, flag: bool) -> Self {
        self.select(Selector::Visible(flag))
    }

    /// Matching nodes, in tracked order.
    #[must_use]
    pub fn nodes(&self) -> Vec<ObjectRef> {
        self.frame
            .tracked
            .iter()
            .filter(|node| self.selectors.iter().all(|s| s.matches(node, self.registry)))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.nodes().len()
    }

    /// Projects matching nodes through `paths`.
    #[must_use]
    pub fn records(&self, paths: &[PropertyPath]) -> Vec<SnapshotRecord> {
        StateSnapshotter::new(self.registry, paths).snapshot(&self.nodes())
    }
}

/// Collects the nodes under `root` that carry a loaded texture resource
/// (`_texture.baseTexture.resource.url`). A matching node is not descended
/// into. Pre-order.
#[must_use]
pub fn find_with_asset(root: &ObjectRef) -> Vec<ObjectRef> {
    let mut found = Vec::new();
    let mut visited: FxHashSet<ObjectId> = FxHashSet::default();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if !visited.insert(node.id()) {
            continue;
        }
        if node.resolve(&ASSET_PATH).is_some() {
            found.push(node);
            continue;
        }
        if let Some(children) = node.children() {
            stack.extend(children.into_iter().rev());
        }
    }

    found
}
