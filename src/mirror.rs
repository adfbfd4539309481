//! Mirror views: read-only proxies of a dragged view on outputs it overlaps
//! but does not own.
//!
//! While a view is dragged across an output boundary, the part hanging over
//! the neighbouring output must still be drawn there.  The owning output's
//! controller keeps one [`MirrorView`] per overlapped output in a
//! [`MirrorRegistry`].  Mirrors are created during motion but only torn
//! down when the session ends, so brief boundary crossings do not flicker.

use crate::animation::Transition;
use crate::geometry::{relocate, OutputId, Rect, ViewId};
use crate::preview::ALPHA_FLOOR;
use crate::traits::OutputInfo;
use log::debug;
use std::collections::BTreeMap;

/// A proxy drawing `base` on `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorView {
    base: ViewId,
    output: OutputId,
    /// Added to the base view's owner-local coordinates to get coordinates
    /// local to `output`.
    offset: (i32, i32),
    alpha: Transition,
    closing: bool,
}

impl MirrorView {
    /// A fully visible mirror of `base` on `output`, for a base view owned
    /// by `owner`.
    pub fn new(base: ViewId, owner: &OutputInfo, output: &OutputInfo, fade_out_ms: u64) -> Self {
        Self {
            base,
            output: output.id,
            offset: (
                owner.geometry.x - output.geometry.x,
                owner.geometry.y - output.geometry.y,
            ),
            alpha: Transition::settled(1.0, fade_out_ms),
            closing: false,
        }
    }

    pub fn base(&self) -> ViewId {
        self.base
    }

    pub fn output(&self) -> OutputId {
        self.output
    }

    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    /// Where the mirror draws, given the base view's current geometry.
    pub fn geometry(&self, base_geometry: Rect) -> Rect {
        base_geometry.translate(self.offset.0, self.offset.1)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha.value()
    }

    pub fn close(&mut self) {
        if !self.closing {
            self.closing = true;
            self.alpha.retarget(0.0);
        }
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.alpha.advance(elapsed_ms);
    }

    pub fn is_finished(&self) -> bool {
        self.closing && !self.alpha.is_running() && self.alpha.value() <= ALPHA_FLOOR
    }
}

/// Per-output mirror slots of one controller.  At most one mirror per
/// output; never one on the owning output.
#[derive(Debug, Default)]
pub struct MirrorRegistry {
    slots: BTreeMap<OutputId, MirrorView>,
}

impl MirrorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, output: OutputId) -> Option<&MirrorView> {
        self.slots.get(&output)
    }

    pub fn contains(&self, output: OutputId) -> bool {
        self.slots.contains_key(&output)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Make sure every output other than `owner` whose visible area
    /// intersects `bbox` (owner-local) has a mirror of `base`.
    ///
    /// Returns the outputs that received a new mirror.  Mirrors on outputs
    /// that are no longer intersected are kept.
    pub fn reconcile(
        &mut self,
        base: ViewId,
        owner: &OutputInfo,
        outputs: &[OutputInfo],
        bbox: Rect,
        fade_out_ms: u64,
    ) -> Vec<OutputId> {
        let mut created = Vec::new();
        for output in outputs {
            if output.id == owner.id || self.slots.contains_key(&output.id) {
                continue;
            }
            let there = relocate(&bbox, &owner.geometry, &output.geometry);
            if there.intersects(&output.local_bounds()) {
                debug!("mirroring {} on {}", base, output.name);
                self.slots
                    .insert(output.id, MirrorView::new(base, owner, output, fade_out_ms));
                created.push(output.id);
            }
        }
        created
    }

    /// Remove every mirror and start its closing fade.  The caller keeps
    /// the returned mirrors alive until they finish.
    pub fn close_all(&mut self) -> Vec<MirrorView> {
        let mut closing: Vec<MirrorView> = std::mem::take(&mut self.slots).into_values().collect();
        for m in &mut closing {
            m.close();
        }
        closing
    }

    /// Remove every mirror without any animation.
    pub fn discard_all(&mut self) {
        self.slots.clear();
    }

    /// The base view was unmapped by its client: remove its mirrors and
    /// start their closing fade.
    pub fn base_unmapped(&mut self, base: ViewId) -> Vec<MirrorView> {
        let outputs: Vec<OutputId> = self
            .slots
            .iter()
            .filter(|(_, m)| m.base == base)
            .map(|(id, _)| *id)
            .collect();
        outputs
            .into_iter()
            .filter_map(|id| self.slots.remove(&id))
            .map(|mut m| {
                m.close();
                m
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs() -> Vec<OutputInfo> {
        vec![
            OutputInfo {
                id: OutputId(0),
                name: "DP-1".into(),
                geometry: Rect::new(0, 0, 1920, 1080),
                workarea: Rect::new(0, 0, 1920, 1080),
            },
            OutputInfo {
                id: OutputId(1),
                name: "HDMI-A-1".into(),
                geometry: Rect::new(1920, 0, 1280, 1024),
                workarea: Rect::new(0, 0, 1280, 1024),
            },
            OutputInfo {
                id: OutputId(2),
                name: "DP-2".into(),
                geometry: Rect::new(0, 1080, 1920, 1080),
                workarea: Rect::new(0, 0, 1920, 1080),
            },
        ]
    }

    const VIEW: ViewId = ViewId { index: 1, generation: 0 };

    #[test]
    fn mirror_created_on_overlapped_output_only() {
        let outs = outputs();
        let mut reg = MirrorRegistry::new();
        // Hangs 100px over the right edge of DP-1.
        let created = reg.reconcile(VIEW, &outs[0], &outs, Rect::new(1820, 100, 200, 200), 100);
        assert_eq!(created, vec![OutputId(1)]);
        assert!(!reg.contains(OutputId(0)));
        assert!(!reg.contains(OutputId(2)));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let outs = outputs();
        let mut reg = MirrorRegistry::new();
        let bbox = Rect::new(1820, 1000, 200, 200);
        let first = reg.reconcile(VIEW, &outs[0], &outs, bbox, 100);
        assert_eq!(first, vec![OutputId(1), OutputId(2)]);
        let second = reg.reconcile(VIEW, &outs[0], &outs, bbox, 100);
        assert!(second.is_empty());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn mirrors_are_not_removed_by_motion() {
        let outs = outputs();
        let mut reg = MirrorRegistry::new();
        reg.reconcile(VIEW, &outs[0], &outs, Rect::new(1820, 100, 200, 200), 100);
        reg.reconcile(VIEW, &outs[0], &outs, Rect::new(100, 100, 200, 200), 100);
        assert!(reg.contains(OutputId(1)));
    }

    #[test]
    fn mirror_geometry_is_in_mirror_output_space() {
        let outs = outputs();
        let m = MirrorView::new(VIEW, &outs[0], &outs[1], 100);
        assert_eq!(m.offset(), (-1920, 0));
        assert_eq!(m.geometry(Rect::new(1820, 100, 200, 200)), Rect::new(-100, 100, 200, 200));
    }

    #[test]
    fn close_all_fades_and_empties() {
        let outs = outputs();
        let mut reg = MirrorRegistry::new();
        reg.reconcile(VIEW, &outs[0], &outs, Rect::new(1820, 1000, 200, 200), 100);
        let mut closing = reg.close_all();
        assert!(reg.is_empty());
        assert_eq!(closing.len(), 2);
        assert!(closing.iter().all(|m| m.is_closing() && !m.is_finished()));
        for m in &mut closing {
            m.advance(100);
        }
        assert!(closing.iter().all(|m| m.is_finished()));
    }

    #[test]
    fn zero_fade_finishes_immediately() {
        let outs = outputs();
        let mut m = MirrorView::new(VIEW, &outs[0], &outs[1], 0);
        m.close();
        assert!(m.is_finished());
    }

    #[test]
    fn base_unmapped_removes_only_its_mirrors() {
        let outs = outputs();
        let other = ViewId { index: 2, generation: 0 };
        let mut reg = MirrorRegistry::new();
        reg.reconcile(VIEW, &outs[0], &outs, Rect::new(1820, 100, 200, 200), 100);
        let removed = reg.base_unmapped(other);
        assert!(removed.is_empty());
        let removed = reg.base_unmapped(VIEW);
        assert_eq!(removed.len(), 1);
        assert!(removed[0].is_closing());
        assert!(reg.is_empty());
    }
}
