//! The grab session controller.
//!
//! One [`GrabController`] exists per output.  It owns at most one
//! interactive move or resize session at a time, plus every ephemeral
//! visual the session creates: the snap preview and the mirror views on
//! neighbouring outputs.
//!
//! ```text
//!            initiate()                 release() / cancel()
//!   Idle ──────────────────▶ Active(op) ─────────────────────▶ Idle
//!                              │  snap slot 0..9 (move only)
//!                              └─ handoff to another output ──▶ Idle
//! ```
//!
//! The controller never calls another controller.  Signals for the rest of
//! the system (the final snap, the cross-output move request) are queued in
//! an outbox that the [`Dispatcher`](crate::signals::Dispatcher) drains
//! after every call.
//!
//! The view may be destroyed between any two events.  Every handler first
//! checks that the recorded [`ViewId`] still resolves and degrades to
//! [`cancel`](GrabController::cancel) otherwise.  Geometry already applied
//! before the view vanished is left as is.

use crate::config::Config;
use crate::event::Button;
use crate::geometry::{quadrant_edges, to_local, Edges, OutputId, Point, Rect, ViewId};
use crate::mirror::{MirrorRegistry, MirrorView};
use crate::preview::SnapPreview;
use crate::signals::Signal;
use crate::snap::{SnapSlot, SnapZones};
use crate::traits::{AnimationBridge, Compositor, Layer, LayoutEngine, ViewRole};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Kind of interactive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Move,
    Resize,
}

impl Operation {
    /// Name under which the exclusive input grab is held.
    pub fn grab_name(self) -> &'static str {
        match self {
            Operation::Move => "move",
            Operation::Resize => "resize",
        }
    }
}

/// Which input device drives the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    Pointer,
    /// Touch point 0.
    Touch,
}

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabState {
    Idle,
    Active(Operation),
}

/// Parameters of a session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabRequest {
    pub operation: Operation,
    pub source: InputSource,
    /// Button whose release ends the session (bindings only).
    pub button: Option<Button>,
    /// Started on behalf of a client rather than a binding.
    pub from_client: bool,
    /// Resize edges chosen by the client instead of the grab position.
    pub forced_edges: Option<Edges>,
}

impl GrabRequest {
    pub fn moving(source: InputSource) -> Self {
        Self {
            operation: Operation::Move,
            source,
            button: None,
            from_client: false,
            forced_edges: None,
        }
    }

    pub fn resizing(source: InputSource) -> Self {
        Self {
            operation: Operation::Resize,
            ..Self::moving(source)
        }
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.button = Some(button);
        self
    }

    /// Mark the request as client-initiated, optionally forcing the resize
    /// edges.  An empty mask is the same as no mask.
    pub fn from_client(mut self, edges: Option<Edges>) -> Self {
        self.from_client = true;
        self.forced_edges = edges.filter(|e| !e.is_empty());
        self
    }
}

/// Why a session could not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrabError {
    #[error("no view to grab")]
    NoView,
    #[error("{0} no longer exists")]
    ViewGone(ViewId),
    #[error("{0} is not mapped")]
    NotMapped(ViewId),
    #[error("{0} is not an interactive view")]
    ShellView(ViewId),
    #[error("workspace policy forbids this operation on {0}")]
    NotAllowed(ViewId),
    #[error("{view} belongs to {owner}, not {output}")]
    WrongOutput {
        view: ViewId,
        owner: OutputId,
        output: OutputId,
    },
    #[error("input grab is held by another operation")]
    GrabUnavailable,
    #[error("a session is already active")]
    AlreadyActive,
    #[error("compositor error: {0}")]
    Compositor(String),
}

#[derive(Debug, Clone, Copy)]
struct GrabSession {
    operation: Operation,
    /// Cleared when the view is reported gone.
    view: Option<ViewId>,
    source: InputSource,
    button: Option<Button>,
    from_client: bool,
    /// Output-local input position when the session (or the last un-snap)
    /// started.
    grab_start: Point,
    /// View geometry at the same moment.
    snapshot: Rect,
    edges: Edges,
    stuck_in_slot: bool,
    slot: SnapSlot,
}

/// A visual that outlived its session and only has a fade left to run.
#[derive(Debug)]
enum Closing {
    Preview(SnapPreview),
    Mirror(MirrorView),
}

impl Closing {
    fn advance(&mut self, elapsed_ms: u64) {
        match self {
            Closing::Preview(p) => p.advance(elapsed_ms),
            Closing::Mirror(m) => m.advance(elapsed_ms),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            Closing::Preview(p) => p.is_finished(),
            Closing::Mirror(m) => m.is_finished(),
        }
    }
}

fn compositor_error<E: std::error::Error>(e: E) -> GrabError {
    GrabError::Compositor(e.to_string())
}

fn swallow<E: std::error::Error>(what: &str, result: Result<(), E>) {
    if let Err(e) = result {
        debug!("animation {} failed: {}", what, e);
    }
}

/// Interactive move/resize controller for one output.
pub struct GrabController<C, A> {
    output: OutputId,
    compositor: C,
    animation: A,
    config: Config,
    session: Option<GrabSession>,
    preview: Option<SnapPreview>,
    mirrors: MirrorRegistry,
    closing: Vec<Closing>,
    outbox: Vec<Signal>,
}

impl<C, A> GrabController<C, A>
where
    C: Compositor + LayoutEngine,
    A: AnimationBridge,
{
    pub fn new(output: OutputId, compositor: C, animation: A, config: Config) -> Self {
        Self {
            output,
            compositor,
            animation,
            config,
            session: None,
            preview: None,
            mirrors: MirrorRegistry::new(),
            closing: Vec::new(),
            outbox: Vec::new(),
        }
    }

    pub fn output(&self) -> OutputId {
        self.output
    }

    /// Replace the configuration.  Takes effect from the next event.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn state(&self) -> GrabState {
        match &self.session {
            Some(s) => GrabState::Active(s.operation),
            None => GrabState::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The grabbed view, if a session is active and the view still exists.
    pub fn view(&self) -> Option<ViewId> {
        self.session.and_then(|s| s.view)
    }

    pub fn source(&self) -> Option<InputSource> {
        self.session.map(|s| s.source)
    }

    pub fn slot(&self) -> SnapSlot {
        self.session.map(|s| s.slot).unwrap_or_default()
    }

    pub fn edges(&self) -> Edges {
        self.session.map(|s| s.edges).unwrap_or_default()
    }

    pub fn is_stuck_in_slot(&self) -> bool {
        self.session.map(|s| s.stuck_in_slot).unwrap_or(false)
    }

    pub fn preview(&self) -> Option<&SnapPreview> {
        self.preview.as_ref()
    }

    pub fn mirrors(&self) -> &MirrorRegistry {
        &self.mirrors
    }

    /// Number of visuals still fading out after their session ended.
    pub fn closing_count(&self) -> usize {
        self.closing.len()
    }

    /// Drain the signals queued since the last call.
    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.outbox)
    }

    //  Initiation

    /// Start a session on `view`.
    ///
    /// Fails without side effects when the view is missing, unmapped, a
    /// shell surface, forbidden by workspace policy, owned by another
    /// output, or when the exclusive input grab is taken.
    pub fn initiate(&mut self, view: Option<ViewId>, request: GrabRequest) -> Result<(), GrabError> {
        if self.session.is_some() {
            return Err(GrabError::AlreadyActive);
        }
        let view = view.ok_or(GrabError::NoView)?;
        let info = self.compositor.view(view).ok_or(GrabError::ViewGone(view))?;
        if info.role != ViewRole::Toplevel {
            return Err(GrabError::ShellView(view));
        }
        if !info.mapped {
            return Err(GrabError::NotMapped(view));
        }
        let allowed = match request.operation {
            Operation::Move => self.compositor.view_movable(view),
            Operation::Resize => self.compositor.view_resizable(view),
        };
        if !allowed {
            return Err(GrabError::NotAllowed(view));
        }
        if info.output != self.output {
            return Err(GrabError::WrongOutput {
                view,
                owner: info.output,
                output: self.output,
            });
        }
        if !self
            .compositor
            .activate_grab(self.output, request.operation.grab_name())
        {
            return Err(GrabError::GrabUnavailable);
        }

        let grab_start = self.local_input(request.source);
        self.session = Some(GrabSession {
            operation: request.operation,
            view: Some(view),
            source: request.source,
            button: request.button,
            from_client: request.from_client,
            grab_start,
            snapshot: info.geometry,
            edges: Edges::empty(),
            stuck_in_slot: false,
            slot: SnapSlot::NONE,
        });
        self.compositor.set_redraw_always(self.output, true);

        let started = match request.operation {
            Operation::Move => self.start_move(view),
            Operation::Resize => self.start_resize(view, request.forced_edges),
        };
        if let Err(e) = started {
            warn!("{} start on {} aborted: {}", request.operation.grab_name(), view, e);
            self.cancel();
            return Err(e);
        }
        info!(
            "{} {} on {} from {}",
            request.operation.grab_name(),
            view,
            self.output,
            grab_start
        );

        if request.operation == Operation::Move {
            let global = self.global_input(request.source);
            self.update_multi_output(view, global);
        }
        Ok(())
    }

    fn start_move(&mut self, view: ViewId) -> Result<(), GrabError> {
        let info = self.compositor.view(view).ok_or(GrabError::ViewGone(view))?;
        self.compositor.focus_view(view).map_err(compositor_error)?;
        let grab_start = self.session_mut().map(|s| {
            s.stuck_in_slot = info.is_tiled() || info.fullscreen;
            s.grab_start
        });
        if let Some(anchor) = grab_start {
            swallow("start", self.animation.start(view, anchor));
        }
        self.compositor.set_moving(view, true).map_err(compositor_error)?;
        Ok(())
    }

    /// Begin a resize along `forced_edges`, or along the edges nearest the
    /// grab point.  A tiled or fullscreen view is restored to its floating
    /// geometry first, and the motion snapshot is taken from that restored
    /// geometry, so deltas always apply to the size the user sees.
    fn start_resize(&mut self, view: ViewId, forced_edges: Option<Edges>) -> Result<(), GrabError> {
        let before = self.compositor.view(view).ok_or(GrabError::ViewGone(view))?;
        let grab_start = self.session.map(|s| s.grab_start).unwrap_or_default();
        let edges = forced_edges
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| quadrant_edges(&before.geometry, grab_start));

        self.compositor.focus_view(view).map_err(compositor_error)?;
        if before.fullscreen {
            self.compositor
                .set_fullscreen(view, false)
                .map_err(compositor_error)?;
        }
        if before.is_tiled() {
            self.compositor
                .set_tiled(view, Edges::empty())
                .map_err(compositor_error)?;
        }
        if edges.intersects(Edges::LEFT | Edges::TOP) {
            self.compositor.set_moving(view, true).map_err(compositor_error)?;
        }
        self.compositor
            .set_resizing(view, true, edges)
            .map_err(compositor_error)?;

        let after = self.compositor.view(view).ok_or(GrabError::ViewGone(view))?;
        if let Some(s) = self.session_mut() {
            s.edges = edges;
            s.snapshot = after.geometry;
        }

        let bbox = after.bounding_box;
        let mut anchor = bbox.origin();
        if edges.contains(Edges::LEFT) {
            anchor.x += bbox.width;
        }
        if edges.contains(Edges::TOP) {
            anchor.y += bbox.height;
        }
        swallow("snap", self.animation.snap(view, None, false));
        swallow("start", self.animation.start(view, anchor));
        self.compositor.set_cursor(edges.cursor_name());
        Ok(())
    }

    //  Input

    /// Pointer or touch point 0 moved to `global`.
    pub fn handle_motion(&mut self, global: Point) {
        let Some(session) = self.session else {
            return;
        };
        let Some(view) = self.live_view() else {
            self.cancel();
            return;
        };
        let result = match session.operation {
            Operation::Move => self.move_motion(view, global),
            Operation::Resize => self.resize_motion(view, global),
        };
        if let Err(e) = result {
            debug!("motion on {} aborted: {}", view, e);
            self.cancel();
        }
    }

    /// A pointer button changed state while this controller holds the grab.
    pub fn handle_button(&mut self, button: Button, pressed: bool) {
        let Some(session) = self.session else {
            return;
        };
        if pressed || session.source != InputSource::Pointer {
            return;
        }
        let ends = session.button == Some(button) || (session.from_client && button == Button::Left);
        if ends {
            self.release();
        }
    }

    /// A touch point was lifted while this controller holds the grab.
    pub fn handle_touch_up(&mut self, id: i32) {
        if id == 0 && self.source() == Some(InputSource::Touch) {
            self.release();
        }
    }

    fn move_motion(&mut self, view: ViewId, global: Point) -> Result<(), GrabError> {
        let Some(session) = self.session else {
            return Ok(());
        };
        let local = self.to_owner_local(global);
        let (dx, dy) = local.delta_from(session.grab_start);
        swallow("move", self.animation.move_to(view, local));

        if session.stuck_in_slot {
            let threshold = i64::from(self.config.move_.snap_off_threshold);
            let distance_sq = i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy);
            if self.config.move_.enable_snap_off && distance_sq > threshold * threshold {
                self.unsnap(view, local)?;
            }
        } else {
            self.compositor
                .move_view(
                    view,
                    session.snapshot.x.saturating_add(dx),
                    session.snapshot.y.saturating_add(dy),
                )
                .map_err(compositor_error)?;
        }

        if self.update_multi_output(view, global) {
            return Ok(());
        }

        if self.config.move_.enable_snap {
            let slot = self.slot_at(view, local);
            self.update_slot(slot, local);
        }
        Ok(())
    }

    fn resize_motion(&mut self, view: ViewId, global: Point) -> Result<(), GrabError> {
        let Some(session) = self.session else {
            return Ok(());
        };
        let local = self.to_owner_local(global);
        let (dx, dy) = local.delta_from(session.grab_start);
        let (width, height) = resized(session.snapshot, session.edges, dx, dy);
        self.compositor
            .resize_view(view, width, height)
            .map_err(compositor_error)
    }

    /// Drag a tiled or fullscreen view out of its slot.
    fn unsnap(&mut self, view: ViewId, local: Point) -> Result<(), GrabError> {
        let before = self.compositor.view(view).ok_or(GrabError::ViewGone(view))?;
        if before.fullscreen {
            self.compositor
                .set_fullscreen(view, false)
                .map_err(compositor_error)?;
        }
        if before.is_tiled() {
            self.compositor
                .set_tiled(view, Edges::empty())
                .map_err(compositor_error)?;
        }
        let restored = self.compositor.view(view).ok_or(GrabError::ViewGone(view))?.geometry;

        // Keep the grab point at the same relative spot inside the view.
        let grab_start = self.session.map(|s| s.grab_start).unwrap_or(local);
        let old = before.geometry;
        let (gx, gy) = grab_start.delta_from(old.origin());
        let rel_x = f64::from(gx) / f64::from(old.width.max(1));
        let rel_y = f64::from(gy) / f64::from(old.height.max(1));
        let x = local.x.saturating_sub((rel_x * f64::from(restored.width)).round() as i32);
        let y = local.y.saturating_sub((rel_y * f64::from(restored.height)).round() as i32);
        self.compositor.move_view(view, x, y).map_err(compositor_error)?;

        debug!("unsnapped {} to {}", view, Point::new(x, y));
        if let Some(s) = self.session_mut() {
            s.stuck_in_slot = false;
            s.grab_start = local;
            s.snapshot = Rect::new(x, y, restored.width, restored.height);
        }
        Ok(())
    }

    //  Snapping

    fn slot_at(&self, view: ViewId, local: Point) -> SnapSlot {
        let floating = self
            .compositor
            .view(view)
            .is_some_and(|v| v.layer == Layer::Workspace);
        if !floating {
            return SnapSlot::NONE;
        }
        let Some(owner) = self.compositor.output(self.output) else {
            return SnapSlot::NONE;
        };
        SnapZones::new(owner.local_bounds(), owner.workarea, self.config.move_.snap_threshold)
            .slot_at(local)
    }

    fn update_slot(&mut self, slot: SnapSlot, local: Point) {
        let Some(session) = self.session_mut() else {
            return;
        };
        if session.slot == slot {
            return;
        }
        session.slot = slot;
        debug!("{} now in {}", self.output, slot);

        if slot.is_none() {
            self.close_preview();
            return;
        }
        let target = self.compositor.snap_geometry(self.output, slot);
        if target.is_degenerate() {
            debug!("no preview for {}: layout returned {}", slot, target);
            self.close_preview();
            return;
        }
        match &mut self.preview {
            Some(preview) => preview.retarget(slot, target),
            None => {
                self.preview = Some(SnapPreview::open(
                    self.output,
                    slot,
                    local,
                    target,
                    self.config.preview.duration_ms,
                ))
            }
        }
    }

    fn close_preview(&mut self) {
        if let Some(mut preview) = self.preview.take() {
            preview.close();
            self.closing.push(Closing::Preview(preview));
        }
    }

    //  Multiple outputs

    /// Hand the view off when the input left this output, otherwise make
    /// sure every overlapped output has a mirror.  Returns `true` after a
    /// handoff, in which case this controller is idle again.
    fn update_multi_output(&mut self, view: ViewId, global: Point) -> bool {
        let Some(target) = self.compositor.output_at(global) else {
            return false;
        };
        if target != self.output {
            if let Err(e) = self.handoff(view, target) {
                debug!("handoff of {} aborted: {}", view, e);
                self.cancel();
            }
            return true;
        }

        let (Some(owner), Some(info)) = (self.compositor.output(self.output), self.compositor.view(view)) else {
            return false;
        };
        let outputs = self.compositor.outputs();
        self.mirrors.reconcile(
            view,
            &owner,
            &outputs,
            info.bounding_box,
            self.config.mirror.fade_out_ms,
        );
        false
    }

    fn handoff(&mut self, view: ViewId, target: OutputId) -> Result<(), GrabError> {
        // The target's controller recreates whatever mirrors it needs.
        self.mirrors.discard_all();

        let owner = self
            .compositor
            .output(self.output)
            .ok_or_else(|| GrabError::Compositor(format!("{} vanished", self.output)))?;
        let dest = self
            .compositor
            .output(target)
            .ok_or_else(|| GrabError::Compositor(format!("{} vanished", target)))?;
        let info = self.compositor.view(view).ok_or(GrabError::ViewGone(view))?;

        let (dx, dy) = owner.geometry.origin().delta_from(dest.geometry.origin());
        let moved = info.geometry.translate(dx, dy);
        self.compositor
            .move_view(view, moved.x, moved.y)
            .map_err(compositor_error)?;
        swallow("translate", self.animation.translate(view, dx, dy));
        self.compositor.set_moving(view, false).map_err(compositor_error)?;
        self.compositor
            .move_view_to_output(view, target)
            .map_err(compositor_error)?;

        info!("handing {} off from {} to {}", view, owner.name, dest.name);
        let session = self.session;
        // Ends this session without a snap; the target starts its own.
        self.cancel();
        if let Some(session) = session {
            self.outbox.push(Signal::HandOff {
                output: target,
                view,
                source: session.source,
                button: session.button,
                from_client: session.from_client,
            });
        }
        Ok(())
    }

    /// A view was unmapped by its client.  Mirrors of it fade out and leave
    /// the registry.
    pub fn handle_view_unmapped(&mut self, view: ViewId) {
        for mirror in self.mirrors.base_unmapped(view) {
            self.closing.push(Closing::Mirror(mirror));
        }
    }

    /// A view was destroyed or detached from this output.
    pub fn handle_view_gone(&mut self, view: ViewId) {
        if self.session.is_some_and(|s| s.view == Some(view)) {
            debug!("{} went away during {:?}", view, self.state());
            self.cancel();
        }
    }

    //  Completion

    /// End the session.  Commits the snap slot of a move, finalizes a
    /// resize, and returns to Idle.  Does nothing when already idle.
    pub fn release(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.compositor
            .deactivate_grab(self.output, session.operation.grab_name());
        self.compositor.set_redraw_always(self.output, false);
        if session.operation == Operation::Resize {
            self.compositor.set_cursor("default");
        }

        if let Some(view) = session.view.filter(|v| self.compositor.view(*v).is_some()) {
            if let Err(e) = self.finish(view, &session) {
                debug!("finishing {} failed: {}", view, e);
            }
        }

        self.close_preview();
        for mirror in self.mirrors.close_all() {
            self.closing.push(Closing::Mirror(mirror));
        }
    }

    fn finish(&mut self, view: ViewId, session: &GrabSession) -> Result<(), GrabError> {
        match session.operation {
            Operation::Move => {
                self.compositor.set_moving(view, false).map_err(compositor_error)?;
                swallow("end", self.animation.end(view));
                if !session.slot.is_none() {
                    info!("snapping {} to {}", view, session.slot);
                    self.outbox.push(Signal::ViewSnap {
                        output: self.output,
                        view,
                        slot: session.slot,
                    });
                }
            }
            Operation::Resize => {
                if session.edges.intersects(Edges::LEFT | Edges::TOP) {
                    self.compositor.set_moving(view, false).map_err(compositor_error)?;
                }
                self.compositor
                    .set_resizing(view, false, Edges::empty())
                    .map_err(compositor_error)?;
                swallow("end", self.animation.end(view));
            }
        }
        Ok(())
    }

    /// Forget the view and tear the grab down without touching the view:
    /// no snap, no geometry finalization.  Does nothing when already idle.
    pub fn cancel(&mut self) {
        if let Some(s) = self.session_mut() {
            s.view = None;
        }
        self.release();
    }

    //  Animation

    /// Advance the preview and every closing visual.
    pub fn frame(&mut self, elapsed_ms: u64) {
        if let Some(preview) = &mut self.preview {
            preview.advance(elapsed_ms);
        }
        for visual in &mut self.closing {
            visual.advance(elapsed_ms);
        }
        self.closing.retain(|v| !v.is_finished());
    }

    //  Helpers

    fn session_mut(&mut self) -> Option<&mut GrabSession> {
        self.session.as_mut()
    }

    fn live_view(&self) -> Option<ViewId> {
        self.session
            .and_then(|s| s.view)
            .filter(|v| self.compositor.view(*v).is_some())
    }

    fn global_input(&self, source: InputSource) -> Point {
        match source {
            InputSource::Touch => self
                .compositor
                .touch_position(0)
                .unwrap_or_else(|| self.compositor.cursor_position()),
            InputSource::Pointer => self.compositor.cursor_position(),
        }
    }

    fn local_input(&self, source: InputSource) -> Point {
        self.to_owner_local(self.global_input(source))
    }

    fn to_owner_local(&self, global: Point) -> Point {
        match self.compositor.output(self.output) {
            Some(owner) => to_local(global, &owner.geometry),
            None => global,
        }
    }
}

/// New size for a resize from `snapshot` by `(dx, dy)` along `edges`.
/// Never smaller than 1×1.
pub fn resized(snapshot: Rect, edges: Edges, dx: i32, dy: i32) -> (i32, i32) {
    let mut width = snapshot.width;
    let mut height = snapshot.height;
    if edges.contains(Edges::LEFT) {
        width = width.saturating_sub(dx);
    } else if edges.contains(Edges::RIGHT) {
        width = width.saturating_add(dx);
    }
    if edges.contains(Edges::TOP) {
        height = height.saturating_sub(dy);
    } else if edges.contains(Edges::BOTTOM) {
        height = height.saturating_add(dy);
    }
    (width.max(1), height.max(1))
}
