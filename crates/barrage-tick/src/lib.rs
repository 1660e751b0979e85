//! Fixed-timestep frame clock for Barrage.
//!
//! Two tick sources share one configuration and one [`TickInfo`] shape:
//!
//! - [`FrameClock`] sleeps on Tokio's timer until each deadline, detects
//!   overruns and applies a [`TickPolicy`]. Use it for real-time play.
//! - [`StepClock`] never sleeps: every [`StepClock::step`] is one tick.
//!   Use it for tests, replays and fast-forward runs.
//!
//! Both carry a time scale. Each tick reports a [`FrameDelta`] whose
//! `scaled` half is game time and whose `unscaled` half is real time, so a
//! paused game (scale 0) still animates its menus.
//!
//! # Integration
//!
//! ```ignore
//! let mut clock = FrameClock::with_rate(60);
//! loop {
//!     let info = clock.wait_for_tick().await;
//!     wave.tick(info.delta, &world, &mut outbox)?;
//!     boss.tick(info.delta, &world, &mut outbox)?;
//!     clock.record_tick_end();
//! }
//! ```

mod config;
mod frame;
mod step;

pub use barrage_timer::FrameDelta;
pub use config::{MAX_TIME_SCALE, TickConfig, TickPolicy};
pub use frame::{FrameClock, TickMetrics};
pub use step::StepClock;

use std::time::Duration;

/// Information about a completed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// Fixed delta time for this tick (always `1 / tick_rate`).
    pub dt: Duration,
    /// `true` if this tick fired late.
    pub overrun: bool,
    /// How many ticks were skipped due to overrun (0 in normal operation).
    pub ticks_skipped: u64,
    /// `dt` in seconds, split into game time and real time.
    pub delta: FrameDelta,
}
