//! Deterministic clock: one call, one tick, no sleeping.

use std::time::Duration;

use barrage_timer::FrameDelta;
use tracing::{debug, trace};

use crate::TickInfo;
use crate::config::{TickConfig, clamp_time_scale};

/// A tick source that advances only when asked.
///
/// Every [`step`](Self::step) yields the same fixed `dt`, so a run driven
/// by a `StepClock` is reproducible to the bit.
#[derive(Debug, Clone)]
pub struct StepClock {
    tick_duration: Duration,
    tick_count: u64,
    time_scale: f32,
    scaled_seconds: f64,
    unscaled_seconds: f64,
}

impl StepClock {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self::from_config(TickConfig::with_rate(tick_rate_hz))
    }

    /// Takes the rate and time scale of `config`; policies and budgets do
    /// not apply when nothing sleeps.
    pub fn from_config(config: TickConfig) -> Self {
        let config = config.validated();
        debug!(
            rate_hz = config.tick_rate_hz,
            time_scale = config.time_scale,
            "step clock created"
        );
        Self {
            tick_duration: config.tick_duration(),
            tick_count: 0,
            time_scale: config.time_scale,
            scaled_seconds: 0.0,
            unscaled_seconds: 0.0,
        }
    }

    /// Produces the next tick immediately.
    pub fn step(&mut self) -> TickInfo {
        self.tick_count += 1;
        let delta = FrameDelta::scaled(self.tick_duration.as_secs_f32(), self.time_scale);
        self.scaled_seconds += f64::from(delta.scaled);
        self.unscaled_seconds += f64::from(delta.unscaled);
        trace!(tick = self.tick_count, "step");

        TickInfo {
            tick: self.tick_count,
            dt: self.tick_duration,
            overrun: false,
            ticks_skipped: 0,
            delta,
        }
    }

    /// Sets the game-time multiplier, clamped to `0.0..=MAX_TIME_SCALE`.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = clamp_time_scale(scale);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Game time accumulated so far, in seconds.
    pub fn scaled_seconds(&self) -> f64 {
        self.scaled_seconds
    }

    /// Real time accumulated so far, in seconds.
    pub fn unscaled_seconds(&self) -> f64 {
        self.unscaled_seconds
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::from_config(TickConfig::default())
    }
}
