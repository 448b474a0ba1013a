//! Scene Probe
//!
//! Per-frame instrumentation of a host renderer, and the command surface an
//! external driver talks to.
//!
//! # Pipeline
//!
//! ```text
//! host render call
//!   └─ RenderHook ── frozen? → skip
//!        ├─ SceneWalker ── TypeRegistry + VisibilityFilter → tracked list
//!        ├─ original render
//!        ├─ StateSnapshotter → records
//!        └─ publish Frame (one ArcSwap store)
//! ```
//!
//! # Taking a consistent sample
//!
//! ```rust,ignore
//! probe.freeze();
//! host.render(&stage);            // next frame observes the flag
//! let png = capture(probe.canvas_handle());
//! let json = serde_json::to_string(&probe.snapshot())?;
//! probe.unfreeze();
//! ```

pub mod filter;
pub mod hit_test;
pub mod hook;
pub mod query;
pub mod serializer;
pub mod snapshot;
pub mod walker;

use std::sync::Arc;

use glam::DVec2;

pub use filter::{AlphaPolicy, VisibilityFilter};
pub use hit_test::{ScreenRect, canvas_position, screen_rect};
pub use hook::{Frame, HookStatus, RenderHook, RenderHookState};
pub use query::{Selector, TrackedQuery, find_with_asset};
pub use serializer::{GraphSerializer, RedactKeys};
pub use snapshot::{PropertyPath, Primitive, SceneSnapshot, SnapshotRecord, StateSnapshotter};
pub use walker::SceneWalker;

use crate::errors::Result;
use crate::host::{HostAdapter, ObjectRef, Value};
use crate::registry::TypeRegistry;
use crate::settings::ProbeSettings;

/// Command surface of the instrumentation.
///
/// Cheap to share: all mutable state lives in the inner [`RenderHook`],
/// which the installed wrapper also holds.
pub struct Probe {
    hook: Arc<RenderHook>,
    settings: ProbeSettings,
    serializer: GraphSerializer,
}

impl Probe {
    /// Validates `settings` and builds an uninstalled probe.
    pub fn new(settings: ProbeSettings) -> Result<Self> {
        let paths = settings.property_paths()?;
        let hook = RenderHook::new(TypeRegistry::new(), settings.visibility_filter(), paths);
        Ok(Self {
            hook: Arc::new(hook),
            serializer: settings.graph_serializer(),
            settings,
        })
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        self.hook.registry()
    }

    #[inline]
    #[must_use]
    pub fn hook(&self) -> &Arc<RenderHook> {
        &self.hook
    }

    // ========================================================================
    // Installation
    // ========================================================================

    /// Intercepts `host`'s render entry point. Idempotent.
    pub fn install(&self, host: &dyn HostAdapter) -> Result<()> {
        self.hook
            .install(host, &self.settings.namespace, self.settings.discovery_depth)
    }

    #[must_use]
    pub fn status(&self) -> HookStatus {
        self.hook.state().status()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.hook.state().is_installed()
    }

    // ========================================================================
    // Freeze
    // ========================================================================

    /// Takes effect at the next frame boundary.
    pub fn freeze(&self) {
        log::debug!("Freeze requested");
        self.hook.state().freeze();
    }

    pub fn unfreeze(&self) {
        log::debug!("Unfreeze requested");
        self.hook.state().unfreeze();
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.hook.state().is_frozen()
    }

    // ========================================================================
    // Published state
    // ========================================================================

    /// The last published frame. Tracked list and records always belong to
    /// the same frame.
    #[must_use]
    pub fn frame(&self) -> Arc<Frame> {
        self.hook.state().current()
    }

    #[must_use]
    pub fn tracked_list(&self) -> Vec<ObjectRef> {
        self.frame().tracked.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        self.frame().to_snapshot()
    }

    /// The canvas of the last drawn frame, for image capture.
    #[must_use]
    pub fn canvas_handle(&self) -> Option<ObjectRef> {
        self.frame().canvas.clone()
    }

    /// Dumps the stage of the last drawn frame. `{}` before the first frame.
    pub fn serialize_graph(&self, redact: &RedactKeys) -> Result<String> {
        match &self.frame().stage {
            Some(stage) => self.serializer.serialize_object(stage, redact),
            None => Ok("{}".to_owned()),
        }
    }

    /// Dumps an arbitrary value with the configured depth limit.
    pub fn serialize_value(&self, root: &Value, redact: &RedactKeys) -> Result<String> {
        self.serializer.serialize(root, redact)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Starts a query over the current frame's tracked list.
    #[must_use]
    pub fn query(&self) -> TrackedQuery<'_> {
        TrackedQuery::new(self.frame(), self.registry())
    }

    /// Tracked nodes under `point` (page pixels), given the page-to-canvas
    /// `css_scale`.
    #[must_use]
    pub fn hit_test(&self, point: DVec2, css_scale: DVec2) -> Vec<ObjectRef> {
        hit_test::hit_test(&self.frame().tracked, point, css_scale)
    }
}
