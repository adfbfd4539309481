//! The snap preview overlay: a translucent rectangle showing where the view
//! will land if the grab is released now.

use crate::animation::{Easing, RectTransition, Transition};
use crate::geometry::{OutputId, Point, Rect};
use crate::snap::SnapSlot;

/// Opacity at or below which a closing overlay counts as invisible.
pub const ALPHA_FLOOR: f64 = 0.01;

/// Ephemeral overlay for a nonzero [`SnapSlot`].
///
/// A new overlay grows out of the input position (a 1×1 box, fully
/// transparent) toward the slot rectangle.  Every later target change
/// animates from the currently shown state.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPreview {
    output: OutputId,
    slot: SnapSlot,
    geometry: RectTransition,
    alpha: Transition,
    closing: bool,
}

impl SnapPreview {
    /// Create an overlay on `output` growing from `origin` toward `target`.
    pub fn open(
        output: OutputId,
        slot: SnapSlot,
        origin: Point,
        target: Rect,
        duration_ms: u64,
    ) -> Self {
        let mut preview = Self {
            output,
            slot,
            geometry: RectTransition::settled(Rect::new(origin.x, origin.y, 1, 1), duration_ms),
            alpha: Transition::settled(0.0, duration_ms).with_easing(Easing::EASE_OUT),
            closing: false,
        };
        preview.retarget(slot, target);
        preview
    }

    /// Animate toward a new slot rectangle.
    pub fn retarget(&mut self, slot: SnapSlot, target: Rect) {
        self.slot = slot;
        self.closing = false;
        self.geometry.retarget(target);
        self.alpha.retarget(1.0);
    }

    /// Start fading out.  The overlay is [finished](Self::is_finished) once
    /// the fade completes.
    pub fn close(&mut self) {
        if !self.closing {
            self.closing = true;
            self.alpha.retarget(0.0);
        }
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.geometry.advance(elapsed_ms);
        self.alpha.advance(elapsed_ms);
    }

    pub fn is_finished(&self) -> bool {
        self.closing && !self.alpha.is_running() && self.alpha.value() <= ALPHA_FLOOR
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn output(&self) -> OutputId {
        self.output
    }

    pub fn slot(&self) -> SnapSlot {
        self.slot
    }

    pub fn geometry(&self) -> Rect {
        self.geometry.value()
    }

    pub fn target_geometry(&self) -> Rect {
        self.geometry.target()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUT: OutputId = OutputId(0);

    #[test]
    fn grows_from_cursor() {
        let mut p = SnapPreview::open(OUT, SnapSlot::LEFT, Point::new(2, 400), Rect::new(0, 0, 500, 800), 100);
        assert_eq!(p.geometry(), Rect::new(2, 400, 1, 1));
        assert_eq!(p.alpha(), 0.0);
        p.advance(100);
        assert_eq!(p.geometry(), Rect::new(0, 0, 500, 800));
        assert_eq!(p.alpha(), 1.0);
    }

    #[test]
    fn retarget_restarts_from_shown_state() {
        let mut p = SnapPreview::open(OUT, SnapSlot::LEFT, Point::new(0, 0), Rect::new(0, 0, 500, 800), 100);
        p.advance(40);
        let shown = p.geometry();
        p.retarget(SnapSlot::MAXIMIZE, Rect::new(0, 0, 1000, 800));
        assert_eq!(p.geometry(), shown);
        assert_eq!(p.target_geometry(), Rect::new(0, 0, 1000, 800));
        assert_eq!(p.slot(), SnapSlot::MAXIMIZE);
    }

    #[test]
    fn close_finishes_after_fade() {
        let mut p = SnapPreview::open(OUT, SnapSlot::RIGHT, Point::new(999, 400), Rect::new(500, 0, 500, 800), 100);
        p.advance(100);
        p.close();
        assert!(!p.is_finished());
        p.advance(50);
        assert!(!p.is_finished());
        p.advance(50);
        assert!(p.is_finished());
    }

    #[test]
    fn close_before_fully_shown() {
        let mut p = SnapPreview::open(OUT, SnapSlot::RIGHT, Point::new(999, 400), Rect::new(500, 0, 500, 800), 100);
        p.advance(10);
        p.close();
        p.advance(100);
        assert!(p.is_finished());
    }
}
