//! Stagehand
//!
//! Instrumentation for a running 2D scene-graph renderer. Once installed on
//! the host's render entry point, it tracks every frame which display nodes
//! are actually visible, classifies their runtime type, and publishes flat
//! per-node records that an external driver can read together with a canvas
//! capture.
//!
//! ```rust,ignore
//! use stagehand::{Probe, ProbeSettings, SyntheticHost};
//!
//! let host = SyntheticHost::new();
//! let probe = Probe::new(ProbeSettings::default())?;
//! probe.install(&host)?;
//!
//! host.render(&stage);
//! let snapshot = probe.snapshot();
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod errors;
pub mod host;
pub mod probe;
pub mod registry;
pub mod settings;

pub use errors::{ProbeError, Result};
pub use host::{ClassRef, HostAdapter, ListRef, ObjectRef, RenderCall, RenderFn, SyntheticHost, Value};
pub use probe::{
    AlphaPolicy, Frame, GraphSerializer, HookStatus, Probe, PropertyPath, RedactKeys, SceneSnapshot,
    SnapshotRecord, VisibilityFilter,
};
pub use registry::TypeRegistry;
pub use settings::ProbeSettings;
