//! An [`AnimationBridge`] that records every call.

use crate::geometry::{Point, Rect, ViewId};
use crate::traits::AnimationBridge;
use log::trace;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One recorded animation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCall {
    Start { view: ViewId, anchor: Point },
    MoveTo { view: ViewId, position: Point },
    Snap { view: ViewId, target: Option<Rect>, animate: bool },
    Translate { view: ViewId, dx: i32, dy: i32 },
    End { view: ViewId },
}

#[derive(Debug, thiserror::Error)]
#[error("animation refused: {0:?}")]
pub struct AnimationError(AnimationCall);

/// Records calls into a shared log.  Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator {
    calls: Rc<RefCell<Vec<AnimationCall>>>,
    failing: Rc<Cell<bool>>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail (after recording it).
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn calls(&self) -> Vec<AnimationCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: AnimationCall) -> Result<(), AnimationError> {
        trace!("animation: {:?}", call);
        self.calls.borrow_mut().push(call);
        if self.failing.get() {
            Err(AnimationError(call))
        } else {
            Ok(())
        }
    }
}

impl AnimationBridge for RecordingAnimator {
    type Error = AnimationError;

    fn start(&self, view: ViewId, anchor: Point) -> Result<(), AnimationError> {
        self.record(AnimationCall::Start { view, anchor })
    }

    fn move_to(&self, view: ViewId, position: Point) -> Result<(), AnimationError> {
        self.record(AnimationCall::MoveTo { view, position })
    }

    fn snap(&self, view: ViewId, target: Option<Rect>, animate: bool) -> Result<(), AnimationError> {
        self.record(AnimationCall::Snap {
            view,
            target,
            animate,
        })
    }

    fn translate(&self, view: ViewId, dx: i32, dy: i32) -> Result<(), AnimationError> {
        self.record(AnimationCall::Translate { view, dx, dy })
    }

    fn end(&self, view: ViewId) -> Result<(), AnimationError> {
        self.record(AnimationCall::End { view })
    }
}
