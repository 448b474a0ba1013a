//! Visibility Filter
//!
//! Decides which nodes are individually inspectable. Structural containers
//! and vector-drawing surfaces are scaffolding and never tracked; every
//! other node must be live: `visible`, `renderable` and, under
//! [`AlphaPolicy::RequirePositive`], `worldAlpha > 0`.
//!
//! Flags are read strictly: a missing or non-boolean `visible` /
//! `renderable` fails the check, and a missing `worldAlpha` fails the alpha
//! check.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::host::ObjectRef;

/// How `worldAlpha` participates in the liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaPolicy {
    /// Require `worldAlpha > 0`. Nodes without `worldAlpha` are excluded.
    #[default]
    RequirePositive,
    /// Do not look at `worldAlpha`.
    Ignore,
}

/// Type exclusion list intersected with a liveness check.
#[derive(Debug, Clone)]
pub struct VisibilityFilter {
    excluded: FxHashSet<String>,
    alpha_policy: AlphaPolicy,
}

impl VisibilityFilter {
    #[must_use]
    pub fn new<I, S>(excluded_types: I, alpha_policy: AlphaPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded_types.into_iter().map(Into::into).collect(),
            alpha_policy,
        }
    }

    #[inline]
    #[must_use]
    pub fn alpha_policy(&self) -> AlphaPolicy {
        self.alpha_policy
    }

    #[inline]
    #[must_use]
    pub fn is_excluded_type(&self, type_name: &str) -> bool {
        self.excluded.contains(type_name)
    }

    /// Returns `true` when `node`, classified as `type_name`, should be
    /// tracked.
    #[must_use]
    pub fn is_tracked(&self, node: &ObjectRef, type_name: &str) -> bool {
        if self.is_excluded_type(type_name) {
            return false;
        }
        if node.get_bool("visible") != Some(true) || node.get_bool("renderable") != Some(true) {
            return false;
        }
        match self.alpha_policy {
            AlphaPolicy::Ignore => true,
            AlphaPolicy::RequirePositive => node.get_f64("worldAlpha").is_some_and(|a| a > 0.0),
        }
    }
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self::new(["PIXI.Container", "PIXI.Graphics"], AlphaPolicy::default())
    }
}
