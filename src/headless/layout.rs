//! Numpad grid layout used by the headless backend.
//!
//! Slot ids follow the numeric keypad: the column is `(id - 1) % 3`
//! (left, full width, right) and the row is `(id - 1) / 3` (bottom half,
//! full height, top half).  Slot 5 is the whole workarea.

use crate::geometry::{Edges, Rect};
use crate::snap::SnapSlot;

/// Rectangle `slot` occupies inside `workarea`.  Degenerate for slot 0.
pub fn slot_geometry(workarea: Rect, slot: SnapSlot) -> Rect {
    let Some((col, row)) = cell(slot) else {
        return Rect::default();
    };
    let half_w = workarea.width / 2;
    let half_h = workarea.height / 2;
    let (x, width) = match col {
        0 => (workarea.x, half_w),
        1 => (workarea.x, workarea.width),
        _ => (workarea.x + half_w, workarea.width - half_w),
    };
    let (y, height) = match row {
        0 => (workarea.y + half_h, workarea.height - half_h),
        1 => (workarea.y, workarea.height),
        _ => (workarea.y, half_h),
    };
    Rect::new(x, y, width, height)
}

/// Tiled edges of a view placed in `slot`.
pub fn slot_edges(slot: SnapSlot) -> Edges {
    let Some((col, row)) = cell(slot) else {
        return Edges::empty();
    };
    let horizontal = match col {
        0 => Edges::LEFT,
        1 => Edges::LEFT | Edges::RIGHT,
        _ => Edges::RIGHT,
    };
    let vertical = match row {
        0 => Edges::BOTTOM,
        1 => Edges::TOP | Edges::BOTTOM,
        _ => Edges::TOP,
    };
    horizontal | vertical
}

fn cell(slot: SnapSlot) -> Option<(u8, u8)> {
    match slot.id() {
        0 => None,
        id => Some(((id - 1) % 3, (id - 1) / 3)),
    }
}
