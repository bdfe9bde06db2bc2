use glam::Vec2;

/// Hermite smoothstep on `[0, 1]`; eases in and out.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Position curves used by stage motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    /// Component-wise smoothstep between the endpoints.
    SmoothStep,
    /// Linear interpolation over `t * t`; starts slow and accelerates.
    EaseIn,
}

impl Curve {
    pub fn position(self, from: Vec2, to: Vec2, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::SmoothStep => from.lerp(to, smoothstep(t)),
            Curve::EaseIn => from.lerp(to, t * t),
        }
    }
}

/// Supplies the per-frame delta time that drives every tween.
///
/// Deltas must be finite and positive. A clock that reports anything else
/// has stalled: [`Ticks`] stops and `Director::run` fails.
pub trait FrameClock {
    fn next_delta(&mut self) -> f32;
}

/// Whether `dt` moves time forward.
pub(crate) fn is_advancing(dt: f32) -> bool {
    dt.is_finite() && dt > 0.0
}

/// Frame clock that reports the same delta every frame. Headless hosts and
/// tests use it to get deterministic timelines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    delta: f32,
}

impl FixedStep {
    pub fn new(delta: f32) -> Self {
        Self { delta }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(1.0 / fps.max(1) as f32)
    }
}

impl FrameClock for FixedStep {
    fn next_delta(&mut self) -> f32 {
        self.delta
    }
}

/// Single-pass progress parameter running from 0 to 1 over `duration`.
///
/// The first [`advance`](Tween::advance) reports `0.0` (or `1.0` straight
/// away when the duration is not positive) and ignores its delta, because the
/// frame that starts a tween has not spent any time in it yet. Every later
/// call accumulates the delta. The final value reported is always exactly
/// `1.0`, after which the tween yields `None` forever.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    duration: f32,
    elapsed: f32,
    started: bool,
    finished: bool,
}

impl Tween {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            started: false,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if self.finished {
            return None;
        }
        if self.duration.is_nan() || self.duration <= 0.0 {
            self.started = true;
            self.finished = true;
            return Some(1.0);
        }
        if self.started {
            self.elapsed += dt.max(0.0);
        } else {
            self.started = true;
        }
        let t = self.elapsed / self.duration;
        if t >= 1.0 {
            self.finished = true;
            Some(1.0)
        } else {
            Some(t)
        }
    }

    /// Drives the tween from `clock`, one item per frame.
    pub fn ticks<C: FrameClock>(self, clock: &mut C) -> Ticks<'_, C> {
        Ticks {
            tween: self,
            clock,
            stalled: false,
        }
    }
}

/// Iterator returned by [`Tween::ticks`]. Ends early, without reaching
/// `1.0`, if the clock stalls.
pub struct Ticks<'c, C> {
    tween: Tween,
    clock: &'c mut C,
    stalled: bool,
}

impl<C> Ticks<'_, C> {
    /// True once the clock reported a delta that does not advance time.
    pub fn stalled(&self) -> bool {
        self.stalled
    }
}

impl<C: FrameClock> Iterator for Ticks<'_, C> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.tween.finished || self.stalled {
            return None;
        }
        let dt = if self.tween.started {
            self.clock.next_delta()
        } else {
            0.0
        };
        if self.tween.started && !is_advancing(dt) {
            self.stalled = true;
            return None;
        }
        self.tween.advance(dt)
    }
}
