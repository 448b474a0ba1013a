//! Synthetic Host
//!
//! An in-process stand-in for a 2D display-list library, shaped after the
//! PixiJS object model (`Container`, `Sprite`, `Graphics`, `Text`, ...).
//! Used by the integration tests and the demo app to drive frames without a
//! browser.
//!
//! ```rust,ignore
//! let host = SyntheticHost::new();
//! let stage = host.classes().container();
//! stage.add_child(&host.classes().sprite("hero", "hero.png"));
//!
//! probe.install(&host)?;
//! host.render(&stage);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::adapter::{HostAdapter, RenderCall, RenderFn};
use super::value::{ClassRef, ListRef, ObjectRef, Value};

/// Constructors exported by the synthetic library.
#[derive(Debug, Clone)]
pub struct HostClasses {
    pub container: ClassRef,
    pub sprite: ClassRef,
    pub animated_sprite: ClassRef,
    pub tiling_sprite: ClassRef,
    pub graphics: ClassRef,
    pub text: ClassRef,
    pub bitmap_text: ClassRef,
    pub renderer: ClassRef,
    pub texture: ClassRef,
    pub base_texture: ClassRef,
    pub rectangle: ClassRef,
    pub observable_point: ClassRef,
}

impl HostClasses {
    #[must_use]
    pub fn new() -> Self {
        Self {
            container: ClassRef::new("Container"),
            sprite: ClassRef::new("Sprite"),
            animated_sprite: ClassRef::new("AnimatedSprite"),
            tiling_sprite: ClassRef::new("TilingSprite"),
            graphics: ClassRef::new("Graphics"),
            text: ClassRef::new("Text"),
            bitmap_text: ClassRef::new("BitmapText"),
            renderer: ClassRef::new("Renderer"),
            texture: ClassRef::new("Texture"),
            base_texture: ClassRef::new("BaseTexture"),
            rectangle: ClassRef::new("Rectangle"),
            observable_point: ClassRef::new("ObservablePoint"),
        }
    }

    /// The library namespace: every constructor plus a few entries that are
    /// not types (a version string, a lowercase utility namespace).
    #[must_use]
    pub fn namespace(&self) -> ObjectRef {
        ObjectRef::new()
            .with("VERSION", "6.5.8")
            .with("Container", &self.container)
            .with("Sprite", &self.sprite)
            .with("AnimatedSprite", &self.animated_sprite)
            .with("TilingSprite", &self.tiling_sprite)
            .with("Graphics", &self.graphics)
            .with("Text", &self.text)
            .with("BitmapText", &self.bitmap_text)
            .with("Renderer", &self.renderer)
            .with("Texture", &self.texture)
            .with("BaseTexture", &self.base_texture)
            .with("Rectangle", &self.rectangle)
            .with("ObservablePoint", &self.observable_point)
            .with(
                "utils",
                ObjectRef::new().with("TextureCache", ObjectRef::new()),
            )
    }

    /// An empty, visible container.
    #[must_use]
    pub fn container(&self) -> ObjectRef {
        display_object(&self.container, self.point(1.0, 1.0))
    }

    /// A visible 64x64 sprite textured from `url`.
    #[must_use]
    pub fn sprite(&self, name: &str, url: &str) -> ObjectRef {
        let texture = self.texture(url, 64.0, 64.0);
        display_object(&self.sprite, self.point(1.0, 1.0))
            .with("name", name)
            .with("width", 64.0)
            .with("height", 64.0)
            .with("anchor", self.point(0.0, 0.0))
            .with("_texture", texture.clone())
            .with("texture", texture)
    }

    /// A visible text node.
    #[must_use]
    pub fn text(&self, name: &str, text: &str) -> ObjectRef {
        display_object(&self.text, self.point(1.0, 1.0))
            .with("name", name)
            .with("text", text)
            .with("_font", "normal 26px Arial")
            .with("width", 120.0)
            .with("height", 30.0)
            .with("anchor", self.point(0.0, 0.0))
    }

    /// A visible vector-drawing node.
    #[must_use]
    pub fn graphics(&self) -> ObjectRef {
        display_object(&self.graphics, self.point(1.0, 1.0))
            .with("width", 10.0)
            .with("height", 10.0)
    }

    #[must_use]
    pub fn texture(&self, url: &str, width: f64, height: f64) -> ObjectRef {
        let resource = ObjectRef::new().with("url", url);
        let base = ObjectRef::instance(&self.base_texture)
            .with("resource", resource)
            .with("valid", true);
        let frame = ObjectRef::instance(&self.rectangle)
            .with("x", 0.0)
            .with("y", 0.0)
            .with("width", width)
            .with("height", height);
        ObjectRef::instance(&self.texture)
            .with("baseTexture", base)
            .with("frame", frame)
    }

    #[must_use]
    pub fn point(&self, x: f64, y: f64) -> ObjectRef {
        ObjectRef::instance(&self.observable_point)
            .with("x", x)
            .with("y", y)
    }
}

impl Default for HostClasses {
    fn default() -> Self {
        Self::new()
    }
}

fn display_object(class: &ClassRef, scale: ObjectRef) -> ObjectRef {
    ObjectRef::instance(class)
        .with("visible", true)
        .with("renderable", true)
        .with("alpha", 1.0)
        .with("worldAlpha", 1.0)
        .with("x", 0.0)
        .with("y", 0.0)
        .with("zIndex", 0.0)
        .with("rotation", 0.0)
        .with("angle", 0.0)
        .with("scale", scale)
        .with("children", ListRef::new())
}

/// Fake host whose render entry point can be intercepted.
pub struct SyntheticHost {
    classes: HostClasses,
    library: RwLock<Option<ObjectRef>>,
    renderer: ObjectRef,
    entry: RwLock<Option<RenderFn>>,
    draws: Arc<AtomicU64>,
}

impl SyntheticHost {
    /// Creates a host with its library loaded and an 800x600 canvas.
    #[must_use]
    pub fn new() -> Self {
        let host = Self::unloaded();
        host.load_library();
        host
    }

    /// Creates a host whose library global is not present yet.
    #[must_use]
    pub fn unloaded() -> Self {
        let classes = HostClasses::new();
        let view = ObjectRef::instance(&ClassRef::new("HTMLCanvasElement"))
            .with("width", 800.0)
            .with("height", 600.0);
        let renderer = ObjectRef::instance(&classes.renderer)
            .with("resolution", 1.0)
            .with("view", view);

        let draws = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&draws);
        let original: RenderFn = Arc::new(move |call: &RenderCall<'_>| {
            let drawn = counter.fetch_add(1, Ordering::SeqCst) + 1;
            call.renderer.set("_lastObjectRendered", call.stage);
            Value::Number(drawn as f64)
        });

        Self {
            classes,
            library: RwLock::new(None),
            renderer,
            entry: RwLock::new(Some(original)),
            draws,
        }
    }

    /// Makes the library namespace visible to adapters.
    pub fn load_library(&self) {
        *self.library.write() = Some(self.classes.namespace());
    }

    #[must_use]
    pub fn classes(&self) -> &HostClasses {
        &self.classes
    }

    #[must_use]
    pub fn renderer(&self) -> &ObjectRef {
        &self.renderer
    }

    /// Number of frames the original entry point actually drew.
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draws.load(Ordering::SeqCst)
    }

    /// Drives one frame, as the host's ticker would.
    pub fn render(&self, stage: &ObjectRef) -> Value {
        self.render_with(stage, &[])
    }

    pub fn render_with(&self, stage: &ObjectRef, args: &[Value]) -> Value {
        // Not held across the call: a wrapper may replace the entry point.
        let entry = self.entry.read().clone();
        match entry {
            Some(render) => render(&RenderCall {
                renderer: &self.renderer,
                stage,
                args,
            }),
            None => Value::Null,
        }
    }
}

impl Default for SyntheticHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostAdapter for SyntheticHost {
    fn library(&self) -> Option<ObjectRef> {
        self.library.read().clone()
    }

    fn render_entry_point(&self) -> Option<RenderFn> {
        self.entry.read().clone()
    }

    fn set_render_entry_point(&self, render: RenderFn) {
        *self.entry.write() = Some(render);
    }
}
