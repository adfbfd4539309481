//! Collaborator seams.
//!
//! The grab controller never talks to a concrete compositor.  Surfaces,
//! outputs, input state and the global grab token are reached through
//! [`Compositor`]; snap target rectangles and the final snap come from a
//! [`LayoutEngine`]; purely visual drag effects go to an
//! [`AnimationBridge`].  The [`headless`](crate::headless) module provides an
//! in-memory implementation of all three, and tests substitute their own.

use crate::event::InputEvent;
use crate::geometry::{Edges, OutputId, Point, Rect, ViewId};
use crate::snap::SnapSlot;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

/// Static information about an output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
    pub id: OutputId,
    /// Name the compositor uses for this output (e.g. `"DP-1"`).
    pub name: String,
    /// Position and size in the global layout.
    pub geometry: Rect,
    /// Usable area in output-local coordinates.
    pub workarea: Rect,
}

impl OutputInfo {
    /// Visible bounds in output-local coordinates.
    pub fn local_bounds(&self) -> Rect {
        Rect::from_size(self.geometry.width, self.geometry.height)
    }
}

/// What a view is for.  Only toplevels can be grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewRole {
    Toplevel,
    /// Panels, backgrounds and other desktop-shell surfaces.
    Shell,
    Unmanaged,
}

/// Stacking layer of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Bottom,
    /// Regular floating views.
    Workspace,
    Top,
    Overlay,
}

/// Snapshot of a view's state, as reported by the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewInfo {
    pub id: ViewId,
    pub output: OutputId,
    /// Window-management geometry, local to `output`.
    pub geometry: Rect,
    /// Bounds including decorations and transforms, local to `output`.
    pub bounding_box: Rect,
    pub mapped: bool,
    pub role: ViewRole,
    pub layer: Layer,
    pub tiled_edges: Edges,
    pub fullscreen: bool,
}

impl ViewInfo {
    pub fn is_tiled(&self) -> bool {
        !self.tiled_edges.is_empty()
    }
}

/// Access to the compositor core.
///
/// All methods take `&self`: implementations are cheap handles onto shared
/// compositor state, so one handle can be cloned into every per-output
/// controller.  Everything runs on the compositor's single dispatch thread.
pub trait Compositor {
    /// The error type produced by this compositor.
    type Error: std::error::Error + 'static;

    fn outputs(&self) -> Vec<OutputInfo>;

    fn output(&self, id: OutputId) -> Option<OutputInfo>;

    /// The output whose layout geometry contains the global point.
    fn output_at(&self, global: Point) -> Option<OutputId>;

    /// Look up a view.  Returns `None` once the view has been destroyed,
    /// even if its arena slot was reused.
    fn view(&self, id: ViewId) -> Option<ViewInfo>;

    /// The topmost view under a global point.
    fn view_at(&self, global: Point) -> Option<ViewId>;

    /// Pointer position in global coordinates.
    fn cursor_position(&self) -> Point;

    /// Position of a touch point in global coordinates, if it is down.
    fn touch_position(&self, id: i32) -> Option<Point>;

    /// Workspace policy: may this view be moved interactively?
    fn view_movable(&self, id: ViewId) -> bool;

    /// Workspace policy: may this view be resized interactively?
    fn view_resizable(&self, id: ViewId) -> bool;

    /// Move the view's top-left corner (output-local).
    fn move_view(&self, id: ViewId, x: i32, y: i32) -> Result<(), Self::Error>;

    fn resize_view(&self, id: ViewId, width: i32, height: i32) -> Result<(), Self::Error>;

    fn set_tiled(&self, id: ViewId, edges: Edges) -> Result<(), Self::Error>;

    fn set_fullscreen(&self, id: ViewId, fullscreen: bool) -> Result<(), Self::Error>;

    fn set_moving(&self, id: ViewId, moving: bool) -> Result<(), Self::Error>;

    /// While resizing, the view keeps the edges opposite `edges` in place.
    fn set_resizing(&self, id: ViewId, resizing: bool, edges: Edges) -> Result<(), Self::Error>;

    fn focus_view(&self, id: ViewId) -> Result<(), Self::Error>;

    /// Transfer ownership of a view to another output.  The view's
    /// geometry is not touched.
    fn move_view_to_output(&self, id: ViewId, output: OutputId) -> Result<(), Self::Error>;

    /// Try to take the exclusive input grab for `owner` on `output`.
    ///
    /// Non-blocking and all-or-nothing: fails immediately while any other
    /// interactive operation holds it.
    fn activate_grab(&self, output: OutputId, owner: &str) -> bool;

    fn deactivate_grab(&self, output: OutputId, owner: &str);

    /// Render every frame on `output` instead of only damaged ones.
    fn set_redraw_always(&self, output: OutputId, always: bool);

    fn set_cursor(&self, name: &str);
}

/// The tiling/layout engine that owns concrete snap placement.
pub trait LayoutEngine {
    /// Rectangle (output-local) a view would occupy in `slot`.  A
    /// degenerate rectangle means the slot has no preview.
    fn snap_geometry(&self, output: OutputId, slot: SnapSlot) -> Rect;

    /// Place `view` into `slot`.
    fn snap_view(&self, output: OutputId, view: ViewId, slot: SnapSlot);
}

/// Purely visual drag effects (wobbly windows and the like).
///
/// Errors are logged and dropped; nothing functional depends on them.
pub trait AnimationBridge {
    type Error: std::error::Error + 'static;

    /// Begin following a grab anchored at `anchor` (output-local).
    fn start(&self, view: ViewId, anchor: Point) -> Result<(), Self::Error>;

    fn move_to(&self, view: ViewId, position: Point) -> Result<(), Self::Error>;

    /// Settle the effect into `target`; `None` releases any previous snap.
    fn snap(&self, view: ViewId, target: Option<Rect>, animate: bool) -> Result<(), Self::Error>;

    fn translate(&self, view: ViewId, dx: i32, dy: i32) -> Result<(), Self::Error>;

    fn end(&self, view: ViewId) -> Result<(), Self::Error>;
}

/// An [`AnimationBridge`] for compositors without drag effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnimation;

/// Never produced; [`NoAnimation`] cannot fail.
#[derive(Debug, thiserror::Error)]
#[error("no animation")]
pub struct NoAnimationError;

impl AnimationBridge for NoAnimation {
    type Error = NoAnimationError;

    fn start(&self, _: ViewId, _: Point) -> Result<(), NoAnimationError> {
        Ok(())
    }

    fn move_to(&self, _: ViewId, _: Point) -> Result<(), NoAnimationError> {
        Ok(())
    }

    fn snap(&self, _: ViewId, _: Option<Rect>, _: bool) -> Result<(), NoAnimationError> {
        Ok(())
    }

    fn translate(&self, _: ViewId, _: i32, _: i32) -> Result<(), NoAnimationError> {
        Ok(())
    }

    fn end(&self, _: ViewId) -> Result<(), NoAnimationError> {
        Ok(())
    }
}

/// A source of [`InputEvent`]s.
///
/// Implementations listen on some transport and forward parsed events into
/// the provided [`mpsc::Sender`].  The main loop consumes them in arrival
/// order.
///
/// # Contract
///
/// * [`run`](EventSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received event must be sent through `sink` exactly once, in the
///   order it arrived.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait EventSource: Send {
    type Error: std::error::Error + Send + 'static;

    fn run(&mut self, sink: mpsc::Sender<InputEvent>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;
    use std::sync::mpsc;

    /// A test double that emits a fixed sequence of events.
    struct MockSource {
        events: Vec<InputEvent>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl EventSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<InputEvent>) -> Result<(), MockError> {
            for event in self.events.drain(..) {
                let _ = sink.send(event);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_preserves_order() {
        let mut src = MockSource {
            events: vec![
                InputEvent::Motion { x: 10, y: 20 },
                InputEvent::Frame { elapsed_ms: 16 },
                InputEvent::Motion { x: 11, y: 21 },
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let events: Vec<InputEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::Motion { x: 10, y: 20 },
                InputEvent::Frame { elapsed_ms: 16 },
                InputEvent::Motion { x: 11, y: 21 },
            ]
        );
    }

    #[test]
    fn local_bounds_drop_layout_offset() {
        let out = OutputInfo {
            id: OutputId(1),
            name: "HDMI-A-1".into(),
            geometry: Rect::new(1920, 0, 1280, 1024),
            workarea: Rect::new(0, 30, 1280, 994),
        };
        assert_eq!(out.local_bounds(), Rect::new(0, 0, 1280, 1024));
    }

    #[test]
    fn no_animation_never_fails() {
        let v = ViewId { index: 0, generation: 0 };
        assert!(NoAnimation.start(v, Point::new(0, 0)).is_ok());
        assert!(NoAnimation.snap(v, None, false).is_ok());
        assert!(NoAnimation.end(v).is_ok());
    }
}
