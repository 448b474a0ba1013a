//! Screen-space hit-testing over a tracked list.
//!
//! A node's canvas position is the sum of the local `x`/`y` of the node and
//! every ancestor reachable through `parent`. Scale and rotation of the
//! ancestors are not applied. Its box is
//!
//! ```text
//! min  = (position - anchor * size) * css_scale
//! size = (width, height) * css_scale
//! ```
//!
//! where `css_scale` maps canvas pixels to the page pixels a driver clicks
//! in. Edges are inclusive.

use glam::DVec2;
use rustc_hash::FxHashSet;

use crate::host::{ObjectId, ObjectRef};

/// Axis-aligned box in page pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: DVec2,
    pub size: DVec2,
}

impl ScreenRect {
    #[inline]
    #[must_use]
    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> DVec2 {
        self.min + self.size * 0.5
    }

    #[must_use]
    pub fn contains(&self, point: DVec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

/// Sum of local positions from `node` up to its root.
#[must_use]
pub fn canvas_position(node: &ObjectRef) -> DVec2 {
    let mut position = DVec2::ZERO;
    let mut visited: FxHashSet<ObjectId> = FxHashSet::default();
    let mut current = Some(node.clone());

    while let Some(object) = current {
        if !visited.insert(object.id()) {
            log::warn!("Parent chain of {node:?} is cyclic");
            break;
        }
        position += DVec2::new(
            object.get_f64("x").unwrap_or(0.0),
            object.get_f64("y").unwrap_or(0.0),
        );
        current = object.get_object("parent");
    }

    position
}

/// Page-space box of `node`; `None` when it has no numeric size.
#[must_use]
pub fn screen_rect(node: &ObjectRef, css_scale: DVec2) -> Option<ScreenRect> {
    let size = DVec2::new(node.get_f64("width")?, node.get_f64("height")?);
    let anchor = node.get_object("anchor").map_or(DVec2::ZERO, |a| {
        DVec2::new(a.get_f64("x").unwrap_or(0.0), a.get_f64("y").unwrap_or(0.0))
    });
    let origin = canvas_position(node) - anchor * size;

    Some(ScreenRect {
        min: origin * css_scale,
        size: size * css_scale,
    })
}

/// Tracked nodes whose box contains `point`, in tracked order.
#[must_use]
pub fn hit_test(tracked: &[ObjectRef], point: DVec2, css_scale: DVec2) -> Vec<ObjectRef> {
    tracked
        .iter()
        .filter(|node| screen_rect(node, css_scale).is_some_and(|rect| rect.contains(point)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_are_inclusive() {
        let rect = ScreenRect {
            min: DVec2::new(10.0, 10.0),
            size: DVec2::new(5.0, 5.0),
        };
        assert!(rect.contains(DVec2::new(10.0, 10.0)));
        assert!(rect.contains(DVec2::new(15.0, 15.0)));
        assert!(!rect.contains(DVec2::new(15.1, 12.0)));
        assert_eq!(rect.center(), DVec2::new(12.5, 12.5));
    }

    #[test]
    fn cyclic_parent_chain_terminates() {
        let a = ObjectRef::new().with("x", 1.0).with("y", 2.0);
        let b = ObjectRef::new().with("x", 3.0).with("y", 4.0);
        a.set("parent", b.clone());
        b.set("parent", a.clone());
        assert_eq!(canvas_position(&a), DVec2::new(4.0, 6.0));
    }

    #[test]
    fn anchor_shifts_the_box() {
        let anchor = ObjectRef::new().with("x", 0.5).with("y", 0.5);
        let node = ObjectRef::new()
            .with("x", 100.0)
            .with("y", 100.0)
            .with("width", 20.0)
            .with("height", 10.0)
            .with("anchor", anchor);
        let rect = screen_rect(&node, DVec2::ONE).unwrap();
        assert_eq!(rect.min, DVec2::new(90.0, 95.0));
        assert_eq!(rect.size, DVec2::new(20.0, 10.0));
    }
}
