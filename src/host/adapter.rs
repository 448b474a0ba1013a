//! Render Interception Contract
//!
//! The probe does not patch a host directly. A host adapter exposes the
//! renderer's per-frame entry point as a replaceable function value, and
//! the probe swaps in a wrapper that calls through to the original.

use std::sync::Arc;

use super::value::{ObjectRef, Value};

/// Arguments of one render call.
#[derive(Debug, Clone, Copy)]
pub struct RenderCall<'a> {
    /// The renderer instance the entry point was invoked on.
    pub renderer: &'a ObjectRef,
    /// Root of the scene graph being drawn.
    pub stage: &'a ObjectRef,
    /// Any further arguments, passed through untouched.
    pub args: &'a [Value],
}

/// A render entry point. The return value is the host's own and must be
/// handed back to the caller unchanged.
pub type RenderFn = Arc<dyn Fn(&RenderCall<'_>) -> Value + Send + Sync>;

/// Capability a host exposes so that its render loop can be instrumented.
pub trait HostAdapter {
    /// The host library's namespace object, or `None` while the library has
    /// not been loaded.
    fn library(&self) -> Option<ObjectRef>;

    /// The render entry point currently in effect.
    fn render_entry_point(&self) -> Option<RenderFn>;

    /// Replaces the render entry point. Subsequent frames go through
    /// `render`.
    fn set_render_entry_point(&self, render: RenderFn);
}
