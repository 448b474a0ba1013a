//! Scene Walker
//!
//! Produces the tracked list of one frame: a depth-first, pre-order walk of
//! the stage that keeps every node the [`VisibilityFilter`] accepts.
//!
//! Children are visited whether or not their parent passed the filter; a
//! hidden container may still hold visible leaves. The walk uses an explicit
//! stack instead of recursion so deep display lists cannot overflow, and a
//! per-call visited set so a graph that is (unexpectedly) cyclic through
//! `children` still terminates.

use rustc_hash::FxHashSet;

use crate::host::{ObjectId, ObjectRef};
use crate::probe::filter::VisibilityFilter;
use crate::registry::TypeRegistry;

pub struct SceneWalker<'a> {
    registry: &'a TypeRegistry,
    filter: &'a VisibilityFilter,
}

impl<'a> SceneWalker<'a> {
    #[must_use]
    pub fn new(registry: &'a TypeRegistry, filter: &'a VisibilityFilter) -> Self {
        Self { registry, filter }
    }

    /// Walks `root` and returns the tracked nodes in pre-order.
    #[must_use]
    pub fn walk(&self, root: &ObjectRef) -> Vec<ObjectRef> {
        let mut tracked = Vec::new();
        let mut visited: FxHashSet<ObjectId> = FxHashSet::default();
        let mut stack: Vec<ObjectRef> = Vec::with_capacity(64);
        stack.push(root.clone());

        while let Some(node) = stack.pop() {
            if !visited.insert(node.id()) {
                continue;
            }

            let type_name = self.registry.class_of(&node);
            if self.filter.is_tracked(&node, &type_name) {
                tracked.push(node.clone());
            }

            if let Some(children) = node.children() {
                // Reversed so the first child is popped first.
                stack.extend(children.into_iter().rev());
            }
        }

        tracked
    }
}
