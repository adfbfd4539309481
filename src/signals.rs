//! The signal bus.
//!
//! [`Signal`]s are the messages exchanged between controllers and the rest
//! of the compositor: client move/resize requests, view lifecycle
//! notifications and the final snap command.  The [`Dispatcher`] owns one
//! [`GrabController`] per output, routes raw input to the right one, and
//! delivers signals through a single FIFO queue so that a controller never
//! calls another controller directly.
//!
//! A cross-output handoff is therefore two steps: the old controller ends
//! its session (releasing the input grab) and queues a [`Signal::HandOff`];
//! the dispatcher then delivers it to the new output's controller, which
//! starts a fresh session driven by the same input source and ended by the
//! same button.

use crate::config::Config;
use crate::event::{Button, InputEvent, Modifiers};
use crate::geometry::{Edges, OutputId, Point, ViewId};
use crate::grab::{GrabController, GrabRequest, InputSource, Operation};
use crate::snap::SnapSlot;
use crate::traits::{AnimationBridge, Compositor, LayoutEngine};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::mpsc;

/// A message on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Start an interactive move of `view` on `output`.
    MoveRequest { output: OutputId, view: ViewId },

    /// Continue a move of `view` on `output` after it crossed over from
    /// another output.  Carries what the new session needs to end the same
    /// way the original one would have.
    HandOff {
        output: OutputId,
        view: ViewId,
        source: InputSource,
        button: Option<Button>,
        from_client: bool,
    },

    /// Start an interactive resize of `view` on `output`.  An empty edge
    /// mask lets the grab position choose the edges.
    ResizeRequest {
        output: OutputId,
        view: ViewId,
        edges: Edges,
    },

    /// `view` is leaving `output`.
    DetachView { output: OutputId, view: ViewId },

    /// `view` was destroyed or otherwise disappeared from `output`.
    ViewDisappeared { output: OutputId, view: ViewId },

    /// The client unmapped `view`.
    ViewUnmapped { view: ViewId },

    /// Place `view` into `slot`.  Emitted when a move is released inside a
    /// snap zone.
    ViewSnap {
        output: OutputId,
        view: ViewId,
        slot: SnapSlot,
    },
}

/// Routes input and signals to the per-output controllers.
pub struct Dispatcher<C, A> {
    compositor: C,
    animation: A,
    config: Config,
    controllers: BTreeMap<OutputId, GrabController<C, A>>,
    queue: VecDeque<Signal>,
    listener: Option<mpsc::Sender<Signal>>,
}

impl<C, A> Dispatcher<C, A>
where
    C: Compositor + LayoutEngine + Clone,
    A: AnimationBridge + Clone,
{
    /// Create a dispatcher with one controller per current output.
    pub fn new(compositor: C, animation: A, config: Config) -> Self {
        let mut dispatcher = Self {
            compositor,
            animation,
            config,
            controllers: BTreeMap::new(),
            queue: VecDeque::new(),
            listener: None,
        };
        dispatcher.sync_outputs();
        dispatcher
    }

    /// Every delivered signal is also sent to `tx`.
    pub fn set_listener(&mut self, tx: mpsc::Sender<Signal>) {
        self.listener = Some(tx);
    }

    /// Apply a new configuration to every controller.
    pub fn set_config(&mut self, config: Config) {
        for controller in self.controllers.values_mut() {
            controller.set_config(config.clone());
        }
        self.config = config;
        info!("configuration updated");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create controllers for new outputs and drop those of removed ones.
    /// A session on a removed output is cancelled first.
    pub fn sync_outputs(&mut self) {
        let outputs = self.compositor.outputs();
        let gone: Vec<OutputId> = self
            .controllers
            .keys()
            .filter(|id| !outputs.iter().any(|o| o.id == **id))
            .copied()
            .collect();
        for id in gone {
            if let Some(mut controller) = self.controllers.remove(&id) {
                controller.cancel();
                self.queue.extend(controller.take_signals());
                debug!("dropped controller for {}", id);
            }
        }
        for output in outputs {
            if !self.controllers.contains_key(&output.id) {
                debug!("new controller for {} ({})", output.id, output.name);
                self.controllers.insert(
                    output.id,
                    GrabController::new(
                        output.id,
                        self.compositor.clone(),
                        self.animation.clone(),
                        self.config.clone(),
                    ),
                );
            }
        }
        self.pump();
    }

    pub fn controller(&self, output: OutputId) -> Option<&GrabController<C, A>> {
        self.controllers.get(&output)
    }

    pub fn controllers(&self) -> impl Iterator<Item = &GrabController<C, A>> {
        self.controllers.values()
    }

    /// The output whose controller holds a session, if any.
    pub fn active_output(&self) -> Option<OutputId> {
        self.controllers
            .values()
            .find(|c| c.is_active())
            .map(|c| c.output())
    }

    /// Handle one input event, then deliver every signal it caused.
    pub fn handle(&mut self, event: &InputEvent) {
        trace!("event: {:?}", event);
        match *event {
            InputEvent::Button {
                button,
                pressed,
                modifiers,
            } => self.on_button(button, pressed, modifiers),
            InputEvent::Motion { x, y } => {
                if let Some(c) = self.active_with(InputSource::Pointer) {
                    c.handle_motion(Point::new(x, y));
                }
            }
            InputEvent::TouchDown { id, x, y, modifiers } => {
                if id == 0 {
                    self.on_touch_down(Point::new(x, y), modifiers);
                }
            }
            InputEvent::TouchMotion { id, x, y } => {
                if id == 0 {
                    if let Some(c) = self.active_with(InputSource::Touch) {
                        c.handle_motion(Point::new(x, y));
                    }
                }
            }
            InputEvent::TouchUp { id } => {
                if let Some(c) = self.active_with(InputSource::Touch) {
                    c.handle_touch_up(id);
                }
            }
            InputEvent::Frame { elapsed_ms } => {
                for controller in self.controllers.values_mut() {
                    controller.frame(elapsed_ms);
                }
            }
            InputEvent::MoveRequest { view } => match self.compositor.view(view) {
                Some(info) => self.queue.push_back(Signal::MoveRequest {
                    output: info.output,
                    view,
                }),
                None => debug!("move request for unknown {}", view),
            },
            InputEvent::ResizeRequest { view, edges } => match self.compositor.view(view) {
                Some(info) => self.queue.push_back(Signal::ResizeRequest {
                    output: info.output,
                    view,
                    edges,
                }),
                None => debug!("resize request for unknown {}", view),
            },
            // Applied by the backend, which reports the resulting signals.
            InputEvent::MapView { .. }
            | InputEvent::UnmapView { .. }
            | InputEvent::DestroyView { .. }
            | InputEvent::ReloadConfig => {}
            InputEvent::AddOutput(_) | InputEvent::RemoveOutput { .. } => self.sync_outputs(),
        }
        self.pump();
    }

    /// Queue a signal from outside (typically the backend) and deliver it.
    pub fn emit(&mut self, signal: Signal) {
        self.queue.push_back(signal);
        self.pump();
    }

    fn on_button(&mut self, button: Button, pressed: bool, modifiers: Modifiers) {
        if let Some(output) = self.active_output() {
            if let Some(c) = self.controllers.get_mut(&output) {
                c.handle_button(button, pressed);
            }
            return;
        }
        if !pressed {
            return;
        }
        let operation = if self.config.move_.activate.matches_button(button, modifiers) {
            Operation::Move
        } else if self.config.resize.activate.matches_button(button, modifiers) {
            Operation::Resize
        } else {
            return;
        };
        let request = match operation {
            Operation::Move => GrabRequest::moving(InputSource::Pointer),
            Operation::Resize => GrabRequest::resizing(InputSource::Pointer),
        }
        .with_button(button);
        let cursor = self.compositor.cursor_position();
        self.start_at(cursor, request);
    }

    fn on_touch_down(&mut self, point: Point, modifiers: Modifiers) {
        if self.active_output().is_some() {
            return;
        }
        let request = if self.config.move_.touch_activate.matches_touch(modifiers) {
            GrabRequest::moving(InputSource::Touch)
        } else if self.config.resize.touch_activate.matches_touch(modifiers) {
            GrabRequest::resizing(InputSource::Touch)
        } else {
            return;
        };
        self.start_at(point, request);
    }

    /// Start a binding-triggered session on the view under `global`, using
    /// the controller of the output under it.
    fn start_at(&mut self, global: Point, request: GrabRequest) {
        let Some(output) = self.compositor.output_at(global) else {
            debug!("no output under {}", global);
            return;
        };
        let view = self.compositor.view_at(global);
        if let Some(c) = self.controllers.get_mut(&output) {
            if let Err(e) = c.initiate(view, request) {
                debug!("{} binding ignored: {}", request.operation.grab_name(), e);
            }
        }
    }

    fn active_with(&mut self, source: InputSource) -> Option<&mut GrabController<C, A>> {
        self.controllers
            .values_mut()
            .find(|c| c.source() == Some(source))
    }

    /// Client requests use touch point 0 when it is down.
    fn client_source(&self) -> InputSource {
        if self.compositor.touch_position(0).is_some() {
            InputSource::Touch
        } else {
            InputSource::Pointer
        }
    }

    /// Deliver queued signals until the queue is empty.
    fn pump(&mut self) {
        loop {
            for controller in self.controllers.values_mut() {
                self.queue.extend(controller.take_signals());
            }
            let Some(signal) = self.queue.pop_front() else {
                break;
            };
            self.deliver(&signal);
            if let Some(tx) = &self.listener {
                let _ = tx.send(signal);
            }
        }
    }

    fn deliver(&mut self, signal: &Signal) {
        debug!("signal: {:?}", signal);
        match *signal {
            Signal::MoveRequest { output, view } => {
                let request = GrabRequest::moving(self.client_source()).from_client(None);
                self.initiate_on(output, view, request);
            }
            Signal::HandOff {
                output,
                view,
                source,
                button,
                from_client,
            } => {
                let request = GrabRequest {
                    button,
                    from_client,
                    ..GrabRequest::moving(source)
                };
                self.initiate_on(output, view, request);
            }
            Signal::ResizeRequest {
                output,
                view,
                edges,
            } => {
                let request = GrabRequest::resizing(self.client_source()).from_client(Some(edges));
                self.initiate_on(output, view, request);
            }
            Signal::DetachView { output, view } | Signal::ViewDisappeared { output, view } => {
                if let Some(c) = self.controllers.get_mut(&output) {
                    c.handle_view_gone(view);
                }
            }
            Signal::ViewUnmapped { view } => {
                for controller in self.controllers.values_mut() {
                    controller.handle_view_unmapped(view);
                }
            }
            Signal::ViewSnap { output, view, slot } => {
                self.compositor.snap_view(output, view, slot);
            }
        }
    }

    fn initiate_on(&mut self, output: OutputId, view: ViewId, request: GrabRequest) {
        let Some(c) = self.controllers.get_mut(&output) else {
            warn!("{} request for {} on unknown {}", request.operation.grab_name(), view, output);
            return;
        };
        if let Err(e) = c.initiate(Some(view), request) {
            debug!("{} request for {} refused: {}", request.operation.grab_name(), view, e);
        }
    }
}
