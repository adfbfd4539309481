//! Snap zone detection.
//!
//! Slots are numbered like a numeric keypad laid over the workarea:
//!
//! ```text
//! 7 8 9
//! 4 5 6
//! 1 2 3
//! ```
//!
//! After the base computation two remaps apply: the dead center `5` means
//! "no snap" and becomes `0`, and top-center `8` means "maximize", which the
//! layout engine knows as `5`.  Layout engines depend on these exact ids.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete snap target, `0` (none) through `9`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SnapSlot(u8);

impl SnapSlot {
    pub const NONE: SnapSlot = SnapSlot(0);
    pub const BOTTOM_LEFT: SnapSlot = SnapSlot(1);
    pub const BOTTOM: SnapSlot = SnapSlot(2);
    pub const BOTTOM_RIGHT: SnapSlot = SnapSlot(3);
    pub const LEFT: SnapSlot = SnapSlot(4);
    pub const MAXIMIZE: SnapSlot = SnapSlot(5);
    pub const RIGHT: SnapSlot = SnapSlot(6);
    pub const TOP_LEFT: SnapSlot = SnapSlot(7);
    pub const TOP_RIGHT: SnapSlot = SnapSlot(9);

    /// Build a slot from its numeric id; `None` for ids above 9.
    pub fn new(id: u8) -> Option<Self> {
        (id <= 9).then_some(SnapSlot(id))
    }

    pub fn id(self) -> u8 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for SnapSlot {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        SnapSlot::new(id).ok_or_else(|| format!("snap slot out of range: {}", id))
    }
}

impl From<SnapSlot> for u8 {
    fn from(slot: SnapSlot) -> u8 {
        slot.0
    }
}

impl fmt::Display for SnapSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// Snap zones of one output, in that output's local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapZones {
    /// Visible bounds of the output; coordinates outside never snap.
    pub visible: Rect,
    /// Usable area, excluding panels and other reserved regions.
    pub workarea: Rect,
    /// Width of the edge band in pixels.
    pub threshold: i32,
}

impl SnapZones {
    pub fn new(visible: Rect, workarea: Rect, threshold: i32) -> Self {
        Self {
            visible,
            workarea,
            threshold,
        }
    }

    /// The slot for a coordinate.
    pub fn slot_at(&self, p: Point) -> SnapSlot {
        if !self.visible.contains(p) {
            return SnapSlot::NONE;
        }

        let area = &self.workarea;
        let threshold = self.threshold;
        let is_left = p.x - area.x <= threshold;
        let is_right = area.x + area.width - p.x <= threshold;
        let is_top = p.y - area.y < threshold;
        let is_bottom = area.y + area.height - p.y < threshold;

        let row = if is_top {
            6
        } else if !is_bottom {
            3
        } else {
            0
        };
        let col = if is_right {
            2
        } else if !is_left {
            1
        } else {
            0
        };

        match 1 + row + col {
            5 => SnapSlot::NONE,
            8 => SnapSlot::MAXIMIZE,
            id => SnapSlot(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zones() -> SnapZones {
        let area = Rect::new(0, 0, 1000, 800);
        SnapZones::new(area, area, 2)
    }

    #[test]
    fn mid_left_edge() {
        assert_eq!(zones().slot_at(Point::new(1, 400)), SnapSlot::LEFT);
        assert_eq!(zones().slot_at(Point::new(1, 400)).id(), 4);
    }

    #[test]
    fn top_right_corner() {
        assert_eq!(zones().slot_at(Point::new(999, 1)).id(), 9);
    }

    #[test]
    fn dead_center_is_no_snap() {
        assert_eq!(zones().slot_at(Point::new(500, 400)), SnapSlot::NONE);
    }

    #[test]
    fn top_center_means_maximize() {
        assert_eq!(zones().slot_at(Point::new(500, 0)).id(), 5);
    }

    #[test]
    fn bottom_row() {
        let z = zones();
        assert_eq!(z.slot_at(Point::new(0, 799)).id(), 1);
        assert_eq!(z.slot_at(Point::new(500, 799)).id(), 2);
        assert_eq!(z.slot_at(Point::new(999, 799)).id(), 3);
    }

    #[test]
    fn left_band_is_inclusive_top_band_is_not() {
        let z = zones();
        // x - area.x == threshold still counts as left
        assert_eq!(z.slot_at(Point::new(2, 400)).id(), 4);
        // y - area.y == threshold does not count as top
        assert_eq!(z.slot_at(Point::new(500, 2)), SnapSlot::NONE);
    }

    #[test]
    fn outside_visible_bounds_never_snaps() {
        let z = zones();
        assert_eq!(z.slot_at(Point::new(-1, 400)), SnapSlot::NONE);
        assert_eq!(z.slot_at(Point::new(1000, 1)), SnapSlot::NONE);
    }

    #[test]
    fn workarea_offset_by_panel() {
        // 30px panel at the top: the top band starts below it.
        let z = SnapZones::new(Rect::new(0, 0, 1000, 800), Rect::new(0, 30, 1000, 770), 2);
        assert_eq!(z.slot_at(Point::new(500, 31)).id(), 5);
        assert_eq!(z.slot_at(Point::new(500, 10)).id(), 5);
        assert_eq!(z.slot_at(Point::new(500, 40)), SnapSlot::NONE);
    }

    #[test]
    fn slot_ids_above_nine_are_rejected() {
        assert!(SnapSlot::new(9).is_some());
        assert!(SnapSlot::new(10).is_none());
    }

    proptest! {
        #[test]
        fn translation_invariant(
            x in -50i32..1050,
            y in -50i32..850,
            dx in -5000i32..5000,
            dy in -5000i32..5000,
            threshold in 0i32..40,
        ) {
            let area = Rect::new(0, 0, 1000, 800);
            let base = SnapZones::new(area, area, threshold);
            let shifted = SnapZones::new(area.translate(dx, dy), area.translate(dx, dy), threshold);
            prop_assert_eq!(
                base.slot_at(Point::new(x, y)),
                shifted.slot_at(Point::new(x + dx, y + dy))
            );
        }

        #[test]
        fn never_returns_eight(x in 0i32..1000, y in 0i32..800, threshold in 0i32..500) {
            let area = Rect::new(0, 0, 1000, 800);
            let slot = SnapZones::new(area, area, threshold).slot_at(Point::new(x, y));
            prop_assert_ne!(slot.id(), 8);
            prop_assert!(slot.id() <= 9);
        }
    }
}
