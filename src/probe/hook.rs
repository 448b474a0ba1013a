//! Render Hook
//!
//! Wraps the host's per-frame render entry point. Each frame the wrapper:
//!
//! 1. returns immediately while frozen (the host draws nothing and all
//!    published state stays as of the last drawn frame)
//! 2. walks the stage to build this frame's tracked list
//! 3. calls the original entry point and keeps its return value
//! 4. flattens the tracked list into records and reads resolution, canvas
//!    size and canvas handle off the renderer
//! 5. publishes tracked list and records together as one [`Frame`]
//!
//! # Publication
//!
//! The current frame lives behind an `ArcSwap`. Publishing is a single
//! pointer swap and readers pin an `Arc<Frame>`, so a reader can never pair
//! the tracked list of one frame with the records of another.
//!
//! # Freeze latency
//!
//! [`RenderHookState::freeze`] only sets a flag, read at the top of the next
//! frame. A frame that is already past that check still publishes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::errors::{ProbeError, Result};
use crate::host::{HostAdapter, ObjectRef, RenderCall, RenderFn, Value};
use crate::probe::filter::VisibilityFilter;
use crate::probe::snapshot::{PropertyPath, SceneSnapshot, SnapshotRecord, StateSnapshotter};
use crate::probe::walker::SceneWalker;
use crate::registry::TypeRegistry;

/// Installation state of a [`RenderHook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    Uninstalled,
    Installed,
}

// ============================================================================
// Frame
// ============================================================================

/// State published by one drawn frame.
///
/// Canvas metadata is read once, right after the host drew, so it always
/// describes the same frame as the records.
#[derive(Debug)]
pub struct Frame {
    /// Number of frames drawn through the hook; `0` before the first one.
    pub index: u64,
    pub stage: Option<ObjectRef>,
    pub renderer: Option<ObjectRef>,
    /// Renderer resolution, `1` when unknown.
    pub resolution: f64,
    /// Canvas `[width, height]`; zero when unknown.
    pub size: [f64; 2],
    /// The canvas the renderer drew into.
    pub canvas: Option<ObjectRef>,
    pub tracked: Vec<ObjectRef>,
    /// One record per entry of `tracked`, same order.
    pub records: Vec<SnapshotRecord>,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            index: 0,
            stage: None,
            renderer: None,
            resolution: 1.0,
            size: [0.0, 0.0],
            canvas: None,
            tracked: Vec::new(),
            records: Vec::new(),
        }
    }
}

impl Frame {
    #[must_use]
    pub fn to_snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            resolution: self.resolution,
            size: self.size,
            scene: self.records.clone(),
        }
    }
}

/// Reads `(resolution, size, canvas)` off a renderer.
fn canvas_metadata(renderer: &ObjectRef) -> (f64, [f64; 2], Option<ObjectRef>) {
    let resolution = renderer.get_f64("resolution").unwrap_or(1.0);
    let canvas = renderer.get_object("view");
    let size = canvas.as_ref().map_or([0.0, 0.0], |view| {
        [
            view.get_f64("width").unwrap_or(0.0),
            view.get_f64("height").unwrap_or(0.0),
        ]
    });
    (resolution, size, canvas)
}

// ============================================================================
// RenderHookState
// ============================================================================

/// The only mutable state shared with external readers.
pub struct RenderHookState {
    status: Mutex<HookStatus>,
    frozen: AtomicBool,
    current: ArcSwap<Frame>,
}

impl RenderHookState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: Mutex::new(HookStatus::Uninstalled),
            frozen: AtomicBool::new(false),
            current: ArcSwap::from_pointee(Frame::default()),
        }
    }

    #[must_use]
    pub fn status(&self) -> HookStatus {
        *self.status.lock()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.status() == HookStatus::Installed
    }

    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Stops frames from being drawn, starting with the next frame.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    pub fn unfreeze(&self) {
        self.frozen.store(false, Ordering::Release);
    }

    /// The most recently published frame.
    #[must_use]
    pub fn current(&self) -> Arc<Frame> {
        self.current.load_full()
    }

    fn publish(&self, frame: Frame) {
        self.current.store(Arc::new(frame));
    }
}

impl Default for RenderHookState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RenderHook
// ============================================================================

/// Per-frame tracking pipeline plus its install logic.
pub struct RenderHook {
    registry: TypeRegistry,
    filter: VisibilityFilter,
    paths: Vec<PropertyPath>,
    state: RenderHookState,
}

impl RenderHook {
    #[must_use]
    pub fn new(registry: TypeRegistry, filter: VisibilityFilter, paths: Vec<PropertyPath>) -> Self {
        Self {
            registry,
            filter,
            paths,
            state: RenderHookState::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn filter(&self) -> &VisibilityFilter {
        &self.filter
    }

    #[inline]
    #[must_use]
    pub fn paths(&self) -> &[PropertyPath] {
        &self.paths
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &RenderHookState {
        &self.state
    }

    /// Wraps the host's render entry point.
    ///
    /// Idempotent: a second call logs a warning and returns `Ok`. When the
    /// host library or its entry point is missing, the hook stays
    /// [`HookStatus::Uninstalled`] and the call may be retried later.
    pub fn install(self: &Arc<Self>, host: &dyn HostAdapter, namespace: &str, discovery_depth: usize) -> Result<()> {
        let mut status = self.state.status.lock();
        if *status == HookStatus::Installed {
            log::warn!("Render hook already installed");
            return Ok(());
        }

        let Some(library) = host.library() else {
            log::error!("{namespace} not found in host global scope");
            return Err(ProbeError::HostLibraryNotFound {
                root: namespace.to_owned(),
            });
        };
        let Some(original) = host.render_entry_point() else {
            log::error!("{namespace} exposes no render entry point");
            return Err(ProbeError::RenderEntryPointNotFound {
                root: namespace.to_owned(),
            });
        };

        self.registry.discover(&library, namespace, discovery_depth);

        let hook = Arc::clone(self);
        host.set_render_entry_point(Arc::new(move |call: &RenderCall<'_>| {
            hook.on_frame(call, &original)
        }));

        *status = HookStatus::Installed;
        log::debug!("Render hook installed on {namespace}");
        Ok(())
    }

    /// Body of the wrapped entry point.
    pub fn on_frame(&self, call: &RenderCall<'_>, original: &RenderFn) -> Value {
        if self.state.is_frozen() {
            log::trace!("Frame skipped: renderer frozen");
            return Value::Null;
        }

        let tracked = SceneWalker::new(&self.registry, &self.filter).walk(call.stage);
        let result = original(call);
        let records = StateSnapshotter::new(&self.registry, &self.paths).snapshot(&tracked);
        let (resolution, size, canvas) = canvas_metadata(call.renderer);

        let index = self.state.current.load().index + 1;
        self.state.publish(Frame {
            index,
            stage: Some(call.stage.clone()),
            renderer: Some(call.renderer.clone()),
            resolution,
            size,
            canvas,
            tracked,
            records,
        });
        result
    }
}
