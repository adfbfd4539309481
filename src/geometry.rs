//! Coordinate types shared by every component.
//!
//! Two coordinate spaces exist: the *global* layout space every output is
//! placed in, and the *output-local* space of a single output whose origin is
//! that output's top-left corner.  View geometry is always output-local to the
//! view's owning output; input positions arrive in global space.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in either coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`, saturating at the `i32`
    /// range.
    pub fn delta_from(self, other: Point) -> (i32, i32) {
        (self.x.saturating_sub(other.x), self.y.saturating_sub(other.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle.  `width`/`height` may be non-positive, in
/// which case the rectangle is [degenerate](Rect::is_degenerate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size anchored at the origin.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x < self.x.saturating_add(self.width)
            && p.y < self.y.saturating_add(self.height)
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Overlapping region, or `None` when the rectangles only touch or miss.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.x.saturating_add(self.width).min(other.x.saturating_add(other.width));
        let y2 = self.y.saturating_add(self.height).min(other.y.saturating_add(other.height));
        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1)))
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

bitflags! {
    /// Edges of a view.  Used both as the resize edge mask and as the tiled
    /// state of a view (all four edges = maximized).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Edges: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

impl Edges {
    /// Cursor name used while resizing along these edges.
    pub fn cursor_name(self) -> &'static str {
        let vertical = self & (Edges::TOP | Edges::BOTTOM);
        let horizontal = self & (Edges::LEFT | Edges::RIGHT);
        match (vertical, horizontal) {
            (v, h) if v == Edges::TOP && h == Edges::LEFT => "nw-resize",
            (v, h) if v == Edges::TOP && h == Edges::RIGHT => "ne-resize",
            (v, h) if v == Edges::BOTTOM && h == Edges::LEFT => "sw-resize",
            (v, h) if v == Edges::BOTTOM && h == Edges::RIGHT => "se-resize",
            (v, _) if v == Edges::TOP => "n-resize",
            (v, _) if v == Edges::BOTTOM => "s-resize",
            (_, h) if h == Edges::LEFT => "w-resize",
            (_, h) if h == Edges::RIGHT => "e-resize",
            _ => "default",
        }
    }
}

/// Identity of a display output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputId(pub u32);

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "output#{}", self.0)
    }
}

/// Generation-checked handle to a view.
///
/// The compositor stores views in an arena; a handle stays valid only while
/// the slot at `index` still carries the same `generation`.  Once the view is
/// destroyed and the slot is reused, lookups through an old handle fail
/// instead of reaching the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}.{}", self.index, self.generation)
    }
}

/// Convert a global point into the local space of an output whose layout
/// geometry is `output`.
pub fn to_local(global: Point, output: &Rect) -> Point {
    Point::new(global.x.saturating_sub(output.x), global.y.saturating_sub(output.y))
}

/// Convert an output-local point back into global space.
pub fn to_global(local: Point, output: &Rect) -> Point {
    Point::new(local.x.saturating_add(output.x), local.y.saturating_add(output.y))
}

/// Re-express a rectangle that is local to `from` in the local space of `to`.
pub fn relocate(rect: &Rect, from: &Rect, to: &Rect) -> Rect {
    rect.translate(from.x - to.x, from.y - to.y)
}

/// Resize edges chosen by the quadrant of the view the grab started in.
///
/// `grab` and `view` are in the same coordinate space.
pub fn quadrant_edges(view: &Rect, grab: Point) -> Edges {
    let (local_x, local_y) = grab.delta_from(view.origin());

    let mut edges = Edges::empty();
    if local_x < view.width / 2 {
        edges |= Edges::LEFT;
    } else {
        edges |= Edges::RIGHT;
    }
    if local_y < view.height / 2 {
        edges |= Edges::TOP;
    } else {
        edges |= Edges::BOTTOM;
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_global_round_trip() {
        let output = Rect::new(1920, 0, 2560, 1440);
        let p = Point::new(2000, 50);
        let local = to_local(p, &output);
        assert_eq!(local, Point::new(80, 50));
        assert_eq!(to_global(local, &output), p);
    }

    #[test]
    fn relocate_preserves_global_position() {
        let left = Rect::new(0, 0, 1920, 1080);
        let right = Rect::new(1920, 0, 1920, 1080);
        let view = Rect::new(1800, 100, 400, 300);
        let moved = relocate(&view, &left, &right);
        assert_eq!(moved, Rect::new(-120, 100, 400, 300));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(100, 0, 100, 100);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(99, 99, 10, 10)));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 5)));
    }

    #[test]
    fn quadrant_edges_pick_nearest_corner() {
        let view = Rect::new(100, 100, 200, 100);
        assert_eq!(
            quadrant_edges(&view, Point::new(110, 110)),
            Edges::LEFT | Edges::TOP
        );
        assert_eq!(
            quadrant_edges(&view, Point::new(290, 190)),
            Edges::RIGHT | Edges::BOTTOM
        );
        // The exact midpoint belongs to the right/bottom half.
        assert_eq!(
            quadrant_edges(&view, Point::new(200, 150)),
            Edges::RIGHT | Edges::BOTTOM
        );
    }

    #[test]
    fn far_off_coordinates_saturate() {
        let output = Rect::new(1920, 0, 1280, 1024);
        assert_eq!(to_local(Point::new(i32::MIN, 5), &output), Point::new(i32::MIN, 5));
        assert_eq!(
            Point::new(i32::MIN, i32::MAX).delta_from(Point::new(200, -200)),
            (i32::MIN, i32::MAX)
        );
        let far = Rect::new(i32::MAX - 10, 0, 400, 300);
        assert!(far.contains(Point::new(i32::MAX - 1, 10)));
        assert_eq!(far.translate(100, 0).x, i32::MAX);
        assert_eq!(
            far.intersection(&Rect::new(i32::MAX - 5, 0, 100, 100)),
            Some(Rect::new(i32::MAX - 5, 0, 5, 100))
        );
    }

    #[test]
    fn cursor_names() {
        assert_eq!((Edges::TOP | Edges::LEFT).cursor_name(), "nw-resize");
        assert_eq!(Edges::RIGHT.cursor_name(), "e-resize");
        assert_eq!(Edges::empty().cursor_name(), "default");
    }
}
