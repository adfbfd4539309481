//! Frame-driven animations for the preview overlay and mirror views.
//!
//! Nothing here reads a clock.  The compositor calls
//! [`Dispatcher::frame`](crate::signals::Dispatcher::frame) once per output
//! frame with the elapsed time, and every live animation advances by that
//! amount.  Retargeting a running [`Transition`] re-bases it: the new start
//! value is whatever the animation currently shows, and the timer restarts.

use crate::geometry::Rect;

/// CSS-like cubic Bézier easing curve with endpoints fixed at (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Easing {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl Easing {
    /// CSS `ease`.
    pub const EASE: Easing = Easing::cubic_bezier(0.25, 0.10, 0.25, 1.00);
    /// CSS `ease-out`.
    pub const EASE_OUT: Easing = Easing::cubic_bezier(0.0, 0.0, 0.58, 1.0);

    pub const fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Map normalized time `u` in `[0, 1]` to eased progress.
    pub fn apply(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);

        // Polynomial coefficients of x(t) and y(t).
        let cx = 3.0 * self.x1;
        let bx = 3.0 * (self.x2 - self.x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * self.y1;
        let by = 3.0 * (self.y2 - self.y1) - cy;
        let ay = 1.0 - cy - by;

        let sample = |a: f64, b: f64, c: f64, t: f64| ((a * t + b) * t + c) * t;

        // Newton-Raphson on x(t) = u, bisection if it wanders off.
        let mut t = u;
        for _ in 0..8 {
            let x = sample(ax, bx, cx, t) - u;
            if x.abs() < 1e-7 {
                return sample(ay, by, cy, t);
            }
            let dx = (3.0 * ax * t + 2.0 * bx) * t + cx;
            if dx.abs() < 1e-7 {
                break;
            }
            t -= x / dx;
            if !(0.0..=1.0).contains(&t) {
                break;
            }
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = u;
        for _ in 0..32 {
            let x = sample(ax, bx, cx, t);
            if (x - u).abs() < 1e-7 {
                break;
            }
            if x < u {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        sample(ay, by, cy, t)
    }
}

/// A scalar animated from `from` to `to` over `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: f64,
    to: f64,
    elapsed_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl Transition {
    /// A transition already resting at `value`.
    pub fn settled(value: f64, duration_ms: u64) -> Self {
        Self {
            from: value,
            to: value,
            elapsed_ms: duration_ms,
            duration_ms,
            easing: Easing::EASE,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Current interpolated value.
    pub fn value(&self) -> f64 {
        if self.duration_ms == 0 || self.elapsed_ms >= self.duration_ms {
            return self.to;
        }
        let u = self.elapsed_ms as f64 / self.duration_ms as f64;
        self.from + (self.to - self.from) * self.easing.apply(u)
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Start animating toward `to` from the currently shown value.
    pub fn retarget(&mut self, to: f64) {
        self.from = self.value();
        self.to = to;
        self.elapsed_ms = 0;
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms).min(self.duration_ms);
    }

    pub fn is_running(&self) -> bool {
        self.elapsed_ms < self.duration_ms
    }
}

/// Four [`Transition`]s animating a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectTransition {
    x: Transition,
    y: Transition,
    width: Transition,
    height: Transition,
}

impl RectTransition {
    pub fn settled(rect: Rect, duration_ms: u64) -> Self {
        Self {
            x: Transition::settled(rect.x as f64, duration_ms),
            y: Transition::settled(rect.y as f64, duration_ms),
            width: Transition::settled(rect.width as f64, duration_ms),
            height: Transition::settled(rect.height as f64, duration_ms),
        }
    }

    /// Current rectangle, rounded to whole pixels.
    pub fn value(&self) -> Rect {
        Rect::new(
            self.x.value().round() as i32,
            self.y.value().round() as i32,
            self.width.value().round() as i32,
            self.height.value().round() as i32,
        )
    }

    pub fn target(&self) -> Rect {
        Rect::new(
            self.x.target().round() as i32,
            self.y.target().round() as i32,
            self.width.target().round() as i32,
            self.height.target().round() as i32,
        )
    }

    pub fn retarget(&mut self, to: Rect) {
        self.x.retarget(to.x as f64);
        self.y.retarget(to.y as f64);
        self.width.retarget(to.width as f64);
        self.height.retarget(to.height as f64);
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.x.advance(elapsed_ms);
        self.y.advance(elapsed_ms);
        self.width.advance(elapsed_ms);
        self.height.advance(elapsed_ms);
    }
}
