//! In-memory compositor.
//!
//! [`HeadlessDesktop`] keeps outputs, views, input state and the grab token
//! in a shared scene and implements [`Compositor`] and [`LayoutEngine`] on
//! top of it.  The `snapgrab` binary drives it from scripted input events,
//! and the controller tests use it as their fake topology.
//!
//! Views live in a generation-checked arena: destroying a view bumps the
//! generation of its slot, so a stale [`ViewId`] never resolves to a view
//! that later reuses the slot.

#[cfg(test)]
mod animator;
mod layout;

#[cfg(test)]
pub use animator::{AnimationCall, AnimationError, RecordingAnimator};
pub use layout::{slot_edges, slot_geometry};

use crate::config::{HeadlessConfig, HeadlessOutput};
use crate::event::InputEvent;
use crate::geometry::{to_local, Edges, OutputId, Point, Rect, ViewId};
use crate::signals::Signal;
use crate::snap::SnapSlot;
use crate::traits::{Compositor, Layer, LayoutEngine, OutputInfo, ViewInfo, ViewRole};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// Errors of the headless backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeadlessError {
    #[error("{0} does not exist")]
    ViewGone(ViewId),
    #[error("{0} does not exist")]
    UnknownOutput(OutputId),
}

#[derive(Debug, Clone)]
struct HeadlessView {
    output: OutputId,
    geometry: Rect,
    /// Floating geometry to return to when un-tiled or un-fullscreened.
    restore: Option<Rect>,
    mapped: bool,
    role: ViewRole,
    layer: Layer,
    tiled_edges: Edges,
    fullscreen: bool,
    moving: bool,
    resizing: Option<Edges>,
    movable: bool,
    resizable: bool,
}

#[derive(Debug, Default)]
struct ViewSlot {
    generation: u32,
    view: Option<HeadlessView>,
}

#[derive(Debug, Default)]
struct Scene {
    outputs: Vec<OutputInfo>,
    next_output: u32,
    views: Vec<ViewSlot>,
    /// Bottom to top.
    stacking: Vec<ViewId>,
    focused: Option<ViewId>,
    cursor: Point,
    touches: BTreeMap<i32, Point>,
    grab: Option<(OutputId, String)>,
    redraw_always: BTreeSet<OutputId>,
    cursor_name: String,
    disabled_slots: BTreeSet<SnapSlot>,
    snapped: Vec<(ViewId, SnapSlot)>,
}

impl Scene {
    fn get(&self, id: ViewId) -> Option<&HeadlessView> {
        self.views
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.view.as_ref())
    }

    fn get_mut(&mut self, id: ViewId) -> Result<&mut HeadlessView, HeadlessError> {
        self.views
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.view.as_mut())
            .ok_or(HeadlessError::ViewGone(id))
    }

    fn output(&self, id: OutputId) -> Option<&OutputInfo> {
        self.outputs.iter().find(|o| o.id == id)
    }
}

/// Shared handle onto a headless scene.  Clones see the same scene.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDesktop {
    scene: Rc<RefCell<Scene>>,
}

impl HeadlessDesktop {
    /// Build a desktop with the configured outputs, numbered in order.
    pub fn new(config: &HeadlessConfig) -> Self {
        let desktop = Self::default();
        desktop.scene.borrow_mut().cursor_name = "default".into();
        for output in &config.outputs {
            desktop.add_output(output);
        }
        desktop
    }

    /// Plug in an output.  Ids are never reused.
    pub fn add_output(&self, output: &HeadlessOutput) -> OutputId {
        let mut scene = self.scene.borrow_mut();
        let id = OutputId(scene.next_output);
        scene.next_output += 1;
        scene.outputs.push(OutputInfo {
            id,
            name: output.name.clone(),
            geometry: output.geometry(),
            workarea: Rect::new(
                0,
                output.reserved_top,
                output.width,
                output.height.saturating_sub(output.reserved_top),
            ),
        });
        info!("added {} as {} at {}", output.name, id, output.geometry());
        id
    }

    /// Unplug an output.  Its views keep their local geometry and move to
    /// the first remaining output; a `DetachView` is returned for each.
    pub fn remove_output(&self, id: OutputId) -> Vec<Signal> {
        let mut scene = self.scene.borrow_mut();
        let Some(pos) = scene.outputs.iter().position(|o| o.id == id) else {
            return Vec::new();
        };
        let removed = scene.outputs.remove(pos);
        scene.redraw_always.remove(&id);
        let fallback = scene.outputs.first().map(|o| o.id);
        info!("removed {} ({})", id, removed.name);

        let mut signals = Vec::new();
        for (index, slot) in scene.views.iter_mut().enumerate() {
            let view_id = ViewId {
                index: index as u32,
                generation: slot.generation,
            };
            let Some(view) = slot.view.as_mut().filter(|v| v.output == id) else {
                continue;
            };
            match fallback {
                Some(to) => view.output = to,
                None => warn!("{} has no output left", view_id),
            }
            signals.push(Signal::DetachView {
                output: id,
                view: view_id,
            });
        }
        signals
    }

    /// Create and map a floating toplevel on `output` at `geometry`
    /// (output-local), on top of the stack.
    pub fn map_view(&self, output: OutputId, geometry: Rect) -> Result<ViewId, HeadlessError> {
        let mut scene = self.scene.borrow_mut();
        if scene.output(output).is_none() {
            return Err(HeadlessError::UnknownOutput(output));
        }
        let view = HeadlessView {
            output,
            geometry,
            restore: None,
            mapped: true,
            role: ViewRole::Toplevel,
            layer: Layer::Workspace,
            tiled_edges: Edges::empty(),
            fullscreen: false,
            moving: false,
            resizing: None,
            movable: true,
            resizable: true,
        };
        let index = match scene.views.iter().position(|s| s.view.is_none()) {
            Some(index) => index,
            None => {
                scene.views.push(ViewSlot::default());
                scene.views.len() - 1
            }
        };
        let slot = &mut scene.views[index];
        slot.view = Some(view);
        let id = ViewId {
            index: index as u32,
            generation: slot.generation,
        };
        scene.stacking.push(id);
        info!("mapped {} on {} at {}", id, output, geometry);
        Ok(id)
    }

    /// Unmap a view.  Returns the signals the rest of the system must see.
    pub fn unmap_view(&self, id: ViewId) -> Vec<Signal> {
        let mut scene = self.scene.borrow_mut();
        let Ok(view) = scene.get_mut(id) else {
            return Vec::new();
        };
        if !view.mapped {
            return Vec::new();
        }
        view.mapped = false;
        let output = view.output;
        if scene.focused == Some(id) {
            scene.focused = None;
        }
        debug!("unmapped {}", id);
        vec![
            Signal::ViewUnmapped { view: id },
            Signal::ViewDisappeared { output, view: id },
        ]
    }

    /// Destroy a view and retire its id.
    pub fn destroy_view(&self, id: ViewId) -> Vec<Signal> {
        let mut scene = self.scene.borrow_mut();
        let Some(slot) = scene
            .views
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
        else {
            return Vec::new();
        };
        let Some(view) = slot.view.take() else {
            return Vec::new();
        };
        slot.generation = slot.generation.wrapping_add(1);
        scene.stacking.retain(|v| *v != id);
        if scene.focused == Some(id) {
            scene.focused = None;
        }
        debug!("destroyed {}", id);
        let mut signals = Vec::new();
        if view.mapped {
            signals.push(Signal::ViewUnmapped { view: id });
        }
        signals.push(Signal::ViewDisappeared {
            output: view.output,
            view: id,
        });
        signals
    }

    /// Update the scene for an input event before it is dispatched.
    /// Returns the signals caused by view lifecycle events.
    pub fn apply(&self, event: &InputEvent) -> Vec<Signal> {
        match *event {
            InputEvent::Motion { x, y } => {
                self.scene.borrow_mut().cursor = Point::new(x, y);
            }
            InputEvent::TouchDown { id, x, y, .. } | InputEvent::TouchMotion { id, x, y } => {
                self.scene.borrow_mut().touches.insert(id, Point::new(x, y));
            }
            InputEvent::TouchUp { id } => {
                self.scene.borrow_mut().touches.remove(&id);
            }
            InputEvent::MapView {
                output,
                x,
                y,
                width,
                height,
            } => {
                if let Err(e) = self.map_view(output, Rect::new(x, y, width, height)) {
                    warn!("cannot map view: {}", e);
                }
            }
            InputEvent::UnmapView { view } => return self.unmap_view(view),
            InputEvent::DestroyView { view } => return self.destroy_view(view),
            InputEvent::AddOutput(ref output) => {
                self.add_output(output);
            }
            InputEvent::RemoveOutput { output } => return self.remove_output(output),
            _ => {}
        }
        Vec::new()
    }
}

/// Scene setup and inspection for the controller tests.
#[cfg(test)]
impl HeadlessDesktop {
    pub fn set_cursor_position(&self, global: Point) {
        self.scene.borrow_mut().cursor = global;
    }

    pub fn set_role(&self, id: ViewId, role: ViewRole) -> Result<(), HeadlessError> {
        self.scene.borrow_mut().get_mut(id)?.role = role;
        Ok(())
    }

    pub fn set_layer(&self, id: ViewId, layer: Layer) -> Result<(), HeadlessError> {
        self.scene.borrow_mut().get_mut(id)?.layer = layer;
        Ok(())
    }

    /// Workspace policy for one view.
    pub fn set_policy(&self, id: ViewId, movable: bool, resizable: bool) -> Result<(), HeadlessError> {
        let mut scene = self.scene.borrow_mut();
        let view = scene.get_mut(id)?;
        view.movable = movable;
        view.resizable = resizable;
        Ok(())
    }

    /// Make the layout report a degenerate rectangle for `slot`.
    pub fn disable_slot(&self, slot: SnapSlot) {
        self.scene.borrow_mut().disabled_slots.insert(slot);
    }

    /// Take the grab token as if another plugin held it.
    pub fn hold_grab(&self, output: OutputId, owner: &str) {
        self.scene.borrow_mut().grab = Some((output, owner.to_string()));
    }

    pub fn grab_owner(&self) -> Option<String> {
        self.scene.borrow().grab.as_ref().map(|(_, owner)| owner.clone())
    }

    pub fn redraws_always(&self, output: OutputId) -> bool {
        self.scene.borrow().redraw_always.contains(&output)
    }

    pub fn cursor_name(&self) -> String {
        self.scene.borrow().cursor_name.clone()
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.scene.borrow().focused
    }

    pub fn is_moving(&self, id: ViewId) -> bool {
        self.scene.borrow().get(id).is_some_and(|v| v.moving)
    }

    /// Edges of an ongoing resize, `None` when not resizing.
    pub fn resizing_edges(&self, id: ViewId) -> Option<Edges> {
        self.scene.borrow().get(id).and_then(|v| v.resizing)
    }

    /// Every snap performed so far, oldest first.
    pub fn snapped(&self) -> Vec<(ViewId, SnapSlot)> {
        self.scene.borrow().snapped.clone()
    }
}

impl Compositor for HeadlessDesktop {
    type Error = HeadlessError;

    fn outputs(&self) -> Vec<OutputInfo> {
        self.scene.borrow().outputs.clone()
    }

    fn output(&self, id: OutputId) -> Option<OutputInfo> {
        self.scene.borrow().output(id).cloned()
    }

    fn output_at(&self, global: Point) -> Option<OutputId> {
        self.scene
            .borrow()
            .outputs
            .iter()
            .find(|o| o.geometry.contains(global))
            .map(|o| o.id)
    }

    fn view(&self, id: ViewId) -> Option<ViewInfo> {
        let scene = self.scene.borrow();
        scene.get(id).map(|v| ViewInfo {
            id,
            output: v.output,
            geometry: v.geometry,
            bounding_box: v.geometry,
            mapped: v.mapped,
            role: v.role,
            layer: v.layer,
            tiled_edges: v.tiled_edges,
            fullscreen: v.fullscreen,
        })
    }

    fn view_at(&self, global: Point) -> Option<ViewId> {
        let scene = self.scene.borrow();
        scene.stacking.iter().rev().copied().find(|id| {
            scene.get(*id).is_some_and(|v| {
                v.mapped
                    && scene
                        .output(v.output)
                        .is_some_and(|o| v.geometry.contains(to_local(global, &o.geometry)))
            })
        })
    }

    fn cursor_position(&self) -> Point {
        self.scene.borrow().cursor
    }

    fn touch_position(&self, id: i32) -> Option<Point> {
        self.scene.borrow().touches.get(&id).copied()
    }

    fn view_movable(&self, id: ViewId) -> bool {
        self.scene.borrow().get(id).is_some_and(|v| v.movable)
    }

    fn view_resizable(&self, id: ViewId) -> bool {
        self.scene.borrow().get(id).is_some_and(|v| v.resizable)
    }

    fn move_view(&self, id: ViewId, x: i32, y: i32) -> Result<(), HeadlessError> {
        let mut scene = self.scene.borrow_mut();
        let view = scene.get_mut(id)?;
        view.geometry.x = x;
        view.geometry.y = y;
        Ok(())
    }

    fn resize_view(&self, id: ViewId, width: i32, height: i32) -> Result<(), HeadlessError> {
        let mut scene = self.scene.borrow_mut();
        let view = scene.get_mut(id)?;
        let edges = view.resizing.unwrap_or_default();
        // Keep the edges opposite the grabbed ones in place.
        if edges.contains(Edges::LEFT) {
            view.geometry.x = view.geometry.x.saturating_add(view.geometry.width.saturating_sub(width));
        }
        if edges.contains(Edges::TOP) {
            view.geometry.y = view.geometry.y.saturating_add(view.geometry.height.saturating_sub(height));
        }
        view.geometry.width = width;
        view.geometry.height = height;
        Ok(())
    }

    fn set_tiled(&self, id: ViewId, edges: Edges) -> Result<(), HeadlessError> {
        let mut scene = self.scene.borrow_mut();
        let view = scene.get_mut(id)?;
        if edges.is_empty() {
            if !view.fullscreen {
                if let Some(restore) = view.restore.take() {
                    view.geometry = restore;
                }
            }
        } else if view.restore.is_none() {
            view.restore = Some(view.geometry);
        }
        view.tiled_edges = edges;
        Ok(())
    }

    fn set_fullscreen(&self, id: ViewId, fullscreen: bool) -> Result<(), HeadlessError> {
        let mut scene = self.scene.borrow_mut();
        let bounds = {
            let output = scene.get(id).map(|v| v.output).ok_or(HeadlessError::ViewGone(id))?;
            scene
                .output(output)
                .map(|o| o.local_bounds())
                .ok_or(HeadlessError::UnknownOutput(output))?
        };
        let view = scene.get_mut(id)?;
        if fullscreen == view.fullscreen {
            return Ok(());
        }
        view.fullscreen = fullscreen;
        if fullscreen {
            if view.restore.is_none() {
                view.restore = Some(view.geometry);
            }
            view.geometry = bounds;
        } else if view.tiled_edges.is_empty() {
            if let Some(restore) = view.restore.take() {
                view.geometry = restore;
            }
        }
        Ok(())
    }

    fn set_moving(&self, id: ViewId, moving: bool) -> Result<(), HeadlessError> {
        self.scene.borrow_mut().get_mut(id)?.moving = moving;
        Ok(())
    }

    fn set_resizing(&self, id: ViewId, resizing: bool, edges: Edges) -> Result<(), HeadlessError> {
        self.scene.borrow_mut().get_mut(id)?.resizing = resizing.then_some(edges);
        Ok(())
    }

    fn focus_view(&self, id: ViewId) -> Result<(), HeadlessError> {
        let mut scene = self.scene.borrow_mut();
        scene.get_mut(id)?;
        scene.stacking.retain(|v| *v != id);
        scene.stacking.push(id);
        scene.focused = Some(id);
        Ok(())
    }

    fn move_view_to_output(&self, id: ViewId, output: OutputId) -> Result<(), HeadlessError> {
        let mut scene = self.scene.borrow_mut();
        if scene.output(output).is_none() {
            return Err(HeadlessError::UnknownOutput(output));
        }
        scene.get_mut(id)?.output = output;
        Ok(())
    }

    fn activate_grab(&self, output: OutputId, owner: &str) -> bool {
        let mut scene = self.scene.borrow_mut();
        if scene.grab.is_some() {
            return false;
        }
        scene.grab = Some((output, owner.to_string()));
        true
    }

    fn deactivate_grab(&self, output: OutputId, owner: &str) {
        let mut scene = self.scene.borrow_mut();
        let held = scene
            .grab
            .as_ref()
            .is_some_and(|(o, name)| *o == output && name == owner);
        if held {
            scene.grab = None;
        }
    }

    fn set_redraw_always(&self, output: OutputId, always: bool) {
        let mut scene = self.scene.borrow_mut();
        if always {
            scene.redraw_always.insert(output);
        } else {
            scene.redraw_always.remove(&output);
        }
    }

    fn set_cursor(&self, name: &str) {
        self.scene.borrow_mut().cursor_name = name.to_string();
    }
}

impl LayoutEngine for HeadlessDesktop {
    fn snap_geometry(&self, output: OutputId, slot: SnapSlot) -> Rect {
        let scene = self.scene.borrow();
        if scene.disabled_slots.contains(&slot) {
            return Rect::default();
        }
        match scene.output(output) {
            Some(o) => slot_geometry(o.workarea, slot),
            None => Rect::default(),
        }
    }

    fn snap_view(&self, output: OutputId, id: ViewId, slot: SnapSlot) {
        let target = self.snap_geometry(output, slot);
        if target.is_degenerate() {
            return;
        }
        let mut scene = self.scene.borrow_mut();
        let Ok(view) = scene.get_mut(id) else {
            debug!("cannot snap {}: gone", id);
            return;
        };
        if view.output != output {
            warn!("cannot snap {}: not on {}", id, output);
            return;
        }
        if view.restore.is_none() {
            view.restore = Some(view.geometry);
        }
        view.geometry = target;
        view.tiled_edges = slot_edges(slot);
        scene.snapped.push((id, slot));
        info!("{} snapped to {} at {}", id, slot, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeadlessOutput;

    fn two_outputs() -> HeadlessDesktop {
        HeadlessDesktop::new(&HeadlessConfig {
            outputs: vec![
                HeadlessOutput {
                    name: "DP-1".into(),
                    x: 0,
                    y: 0,
                    width: 1920,
                    height: 1080,
                    reserved_top: 30,
                },
                HeadlessOutput {
                    name: "HDMI-A-1".into(),
                    x: 1920,
                    y: 0,
                    width: 1280,
                    height: 1024,
                    reserved_top: 0,
                },
            ],
        })
    }

    #[test]
    fn outputs_are_numbered_in_order() {
        let desk = two_outputs();
        let outs = desk.outputs();
        assert_eq!(outs[0].id, OutputId(0));
        assert_eq!(outs[1].name, "HDMI-A-1");
        assert_eq!(outs[0].workarea, Rect::new(0, 30, 1920, 1050));
        assert_eq!(desk.output_at(Point::new(2000, 10)), Some(OutputId(1)));
        assert_eq!(desk.output_at(Point::new(2000, 1050)), None);
    }

    #[test]
    fn unplugging_rehomes_views() {
        let desk = two_outputs();
        let v = desk.map_view(OutputId(0), Rect::new(10, 20, 100, 100)).unwrap();
        let other = desk.map_view(OutputId(1), Rect::new(0, 0, 100, 100)).unwrap();
        assert_eq!(
            desk.remove_output(OutputId(0)),
            vec![Signal::DetachView {
                output: OutputId(0),
                view: v,
            }]
        );
        let info = desk.view(v).unwrap();
        assert_eq!(info.output, OutputId(1));
        assert_eq!(info.geometry, Rect::new(10, 20, 100, 100));
        assert_eq!(desk.view(other).unwrap().output, OutputId(1));
        assert!(desk.output(OutputId(0)).is_none());
        assert!(desk.remove_output(OutputId(0)).is_empty());

        let dp2 = desk.add_output(&HeadlessOutput {
            name: "DP-2".into(),
            x: -1920,
            y: 0,
            width: 1920,
            height: 1080,
            reserved_top: 0,
        });
        assert_eq!(dp2, OutputId(2));
        assert_eq!(desk.output_at(Point::new(-10, 10)), Some(dp2));
    }

    #[test]
    fn destroyed_id_never_resolves_again() {
        let desk = two_outputs();
        let a = desk.map_view(OutputId(0), Rect::new(0, 0, 100, 100)).unwrap();
        desk.destroy_view(a);
        let b = desk.map_view(OutputId(0), Rect::new(0, 0, 100, 100)).unwrap();
        assert_eq!(a.index, b.index);
        assert_ne!(a.generation, b.generation);
        assert!(desk.view(a).is_none());
        assert!(desk.view(b).is_some());
    }

    #[test]
    fn view_at_picks_topmost_in_global_space() {
        let desk = two_outputs();
        let low = desk.map_view(OutputId(1), Rect::new(0, 0, 500, 500)).unwrap();
        let high = desk.map_view(OutputId(1), Rect::new(100, 100, 100, 100)).unwrap();
        assert_eq!(desk.view_at(Point::new(2050, 150)), Some(high));
        assert_eq!(desk.view_at(Point::new(1930, 10)), Some(low));
        desk.focus_view(low).unwrap();
        assert_eq!(desk.view_at(Point::new(2050, 150)), Some(low));
        assert_eq!(desk.view_at(Point::new(50, 50)), None);
    }

    #[test]
    fn resize_keeps_opposite_edges() {
        let desk = two_outputs();
        let v = desk.map_view(OutputId(0), Rect::new(100, 100, 400, 300)).unwrap();
        desk.set_resizing(v, true, Edges::LEFT | Edges::TOP).unwrap();
        desk.resize_view(v, 350, 250).unwrap();
        assert_eq!(desk.view(v).unwrap().geometry, Rect::new(150, 150, 350, 250));
    }

    #[test]
    fn snap_then_untile_restores() {
        let desk = two_outputs();
        let v = desk.map_view(OutputId(0), Rect::new(100, 100, 400, 300)).unwrap();
        desk.snap_view(OutputId(0), v, SnapSlot::LEFT);
        let info = desk.view(v).unwrap();
        assert_eq!(info.geometry, Rect::new(0, 30, 960, 1050));
        assert!(info.is_tiled());
        desk.set_tiled(v, Edges::empty()).unwrap();
        assert_eq!(desk.view(v).unwrap().geometry, Rect::new(100, 100, 400, 300));
        assert_eq!(desk.snapped(), vec![(v, SnapSlot::LEFT)]);
    }

    #[test]
    fn grab_token_is_exclusive() {
        let desk = two_outputs();
        assert!(desk.activate_grab(OutputId(0), "move"));
        assert!(!desk.activate_grab(OutputId(1), "resize"));
        desk.deactivate_grab(OutputId(1), "resize");
        assert_eq!(desk.grab_owner().as_deref(), Some("move"));
        desk.deactivate_grab(OutputId(0), "move");
        assert!(desk.grab_owner().is_none());
    }

    #[test]
    fn apply_tracks_input_and_lifecycle() {
        let desk = two_outputs();
        desk.apply(&InputEvent::Motion { x: 12, y: 34 });
        assert_eq!(desk.cursor_position(), Point::new(12, 34));
        desk.apply(&InputEvent::TouchDown {
            id: 0,
            x: 5,
            y: 6,
            modifiers: Default::default(),
        });
        assert_eq!(desk.touch_position(0), Some(Point::new(5, 6)));
        desk.apply(&InputEvent::TouchUp { id: 0 });
        assert_eq!(desk.touch_position(0), None);

        desk.apply(&InputEvent::MapView {
            output: OutputId(0),
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        });
        let v = ViewId { index: 0, generation: 0 };
        assert!(desk.view(v).is_some());
        let signals = desk.apply(&InputEvent::UnmapView { view: v });
        assert_eq!(
            signals,
            vec![
                Signal::ViewUnmapped { view: v },
                Signal::ViewDisappeared {
                    output: OutputId(0),
                    view: v
                },
            ]
        );
        let signals = desk.apply(&InputEvent::DestroyView { view: v });
        assert_eq!(
            signals,
            vec![Signal::ViewDisappeared {
                output: OutputId(0),
                view: v
            }]
        );
    }

    #[test]
    fn disabled_slot_is_degenerate() {
        let desk = two_outputs();
        desk.disable_slot(SnapSlot::MAXIMIZE);
        assert!(desk.snap_geometry(OutputId(0), SnapSlot::MAXIMIZE).is_degenerate());
        assert!(!desk.snap_geometry(OutputId(0), SnapSlot::LEFT).is_degenerate());
    }
}
