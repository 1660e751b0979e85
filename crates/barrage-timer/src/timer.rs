//! The interval timer.

use barrage_math::Ratio;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::FrameDelta;

// ---------------------------------------------------------------------------
// TimerSpec
// ---------------------------------------------------------------------------

/// Serialized form of a [`Timer`]: its configuration, no runtime progress.
///
/// Tuning files describe timers with this shape:
///
/// ```json
/// { "interval": 0.25, "looping": true, "start_counting": true }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSpec {
    /// Target duration in seconds.
    pub interval: f32,
    /// Wrap around and keep counting after the interval is crossed.
    pub looping: bool,
    /// Non-looping only: zero progress and keep counting instead of
    /// terminating.
    pub reset_on_terminate: bool,
    /// Consume unscaled (real) time instead of game time.
    pub ignores_time_scale: bool,
    /// Start in the counting state.
    pub start_counting: bool,
}

impl Default for TimerSpec {
    fn default() -> Self {
        Self {
            interval: 1.0,
            looping: false,
            reset_on_terminate: false,
            ignores_time_scale: false,
            start_counting: false,
        }
    }
}

impl From<TimerSpec> for Timer {
    fn from(spec: TimerSpec) -> Self {
        let mut timer = Timer::new();
        timer.set_interval(spec.interval);
        timer.looping = spec.looping;
        timer.reset_on_terminate = spec.reset_on_terminate;
        timer.ignores_time_scale = spec.ignores_time_scale;
        timer.counting = spec.start_counting;
        timer
    }
}

impl From<Timer> for TimerSpec {
    fn from(timer: Timer) -> Self {
        Self {
            interval: timer.interval,
            looping: timer.looping,
            reset_on_terminate: timer.reset_on_terminate,
            ignores_time_scale: timer.ignores_time_scale,
            start_counting: timer.counting,
        }
    }
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// Counts elapsed seconds against a target interval.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ set_interval() ──→ start()/restart() ──→ advance() each tick
///                                       ▲                  │
///                                       │                  ▼ (elapsed ≥ interval)
///                                       │       looping:   wrap, keep counting
///                                       │       resetting: zero, keep counting
///                                       └────── otherwise: terminated, stopped
/// ```
///
/// Invariant: a non-looping timer that is terminated is not counting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TimerSpec", into = "TimerSpec")]
pub struct Timer {
    interval: f32,
    inv_interval: f32,
    elapsed: f32,
    ratio: f32,
    counting: bool,
    terminated: bool,
    looping: bool,
    reset_on_terminate: bool,
    ignores_time_scale: bool,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Smallest accepted interval. Non-positive intervals clamp to this.
    pub const MIN_INTERVAL: f32 = 1.0e-4;

    /// An idle, non-looping timer. Until [`set_interval`](Self::set_interval)
    /// is called the interval is [`Self::MIN_INTERVAL`].
    pub fn new() -> Self {
        Self {
            interval: Self::MIN_INTERVAL,
            inv_interval: 1.0 / Self::MIN_INTERVAL,
            elapsed: 0.0,
            ratio: 0.0,
            counting: false,
            terminated: false,
            looping: false,
            reset_on_terminate: false,
            ignores_time_scale: false,
        }
    }

    pub fn with_interval(mut self, seconds: f32) -> Self {
        self.set_interval(seconds);
        self
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn resetting(mut self) -> Self {
        self.reset_on_terminate = true;
        self
    }

    pub fn unscaled(mut self) -> Self {
        self.ignores_time_scale = true;
        self
    }

    pub fn started(mut self) -> Self {
        self.start();
        self
    }

    /// Sets the target duration. Progress is kept; `ratio` catches up on
    /// the next `advance`.
    pub fn set_interval(&mut self, seconds: f32) {
        let seconds = if seconds.is_finite() && seconds > 0.0 {
            seconds
        } else {
            warn!(
                requested = seconds,
                clamped = Self::MIN_INTERVAL,
                "timer interval must be positive, clamping"
            );
            Self::MIN_INTERVAL
        };
        self.interval = seconds;
        self.inv_interval = 1.0 / seconds;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn set_reset_on_terminate(&mut self, reset: bool) {
        self.reset_on_terminate = reset;
    }

    pub fn set_ignores_time_scale(&mut self, ignores: bool) {
        self.ignores_time_scale = ignores;
    }

    /// Resumes counting without touching elapsed time.
    pub fn start(&mut self) {
        self.counting = true;
        self.terminated = false;
    }

    /// Pauses counting. Elapsed time and ratio are kept.
    pub fn stop(&mut self) {
        self.counting = false;
    }

    /// Zeroes progress and clears termination. Counting continues unless
    /// `stop` is set.
    pub fn reset(&mut self, stop: bool) {
        self.counting = !stop;
        self.elapsed = 0.0;
        self.ratio = 0.0;
        self.terminated = false;
    }

    /// Zeroes progress and starts counting.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.ratio = 0.0;
        self.counting = true;
        self.terminated = false;
    }

    /// Sets a new interval, then [`restart`](Self::restart)s.
    pub fn restart_with(&mut self, seconds: f32) {
        self.set_interval(seconds);
        self.restart();
    }

    /// Adds `delta` seconds. Returns `true` only on the tick the interval
    /// is crossed; a timer that is not counting ignores the call.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !self.counting {
            return false;
        }

        self.elapsed += delta.max(0.0);
        self.ratio = self.elapsed * self.inv_interval;

        if self.elapsed < self.interval {
            return false;
        }

        if self.looping {
            self.elapsed -= self.interval;
            self.ratio = 1.0;
        } else if self.reset_on_terminate {
            self.elapsed = 0.0;
            self.ratio = 0.0;
        } else {
            self.terminated = true;
            self.ratio = 1.0;
            self.counting = false;
        }

        trace!(
            interval = self.interval,
            looping = self.looping,
            terminated = self.terminated,
            "timer fired"
        );
        true
    }

    /// [`advance`](Self::advance) with the scaled or unscaled component of
    /// `delta`, depending on [`ignores_time_scale`](Self::ignores_time_scale).
    pub fn advance_frame(&mut self, delta: FrameDelta) -> bool {
        self.advance(delta.pick(self.ignores_time_scale))
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Elapsed over interval, as last computed by `advance`.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// [`ratio`](Self::ratio) clamped into a [`Ratio`].
    pub fn progress(&self) -> Ratio {
        Ratio::new(self.ratio)
    }

    pub fn is_counting(&self) -> bool {
        self.counting
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn resets_on_terminate(&self) -> bool {
        self.reset_on_terminate
    }

    pub fn ignores_time_scale(&self) -> bool {
        self.ignores_time_scale
    }
}
