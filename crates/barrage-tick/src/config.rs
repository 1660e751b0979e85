//! Clock configuration.

use std::time::Duration;

use tracing::warn;

/// Upper bound of the time scale. 1.0 is real time, 0.0 freezes game time.
pub const MAX_TIME_SCALE: f32 = 4.0;

/// What to do when a tick takes longer than its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Skip the missed tick(s) and resume from now.
    #[default]
    Skip,
    /// Run up to `max_catchup` extra ticks immediately.
    CatchUp {
        /// Hard cap on consecutive catch-up ticks.
        max_catchup: u32,
    },
    /// Keep the original cadence; the next tick fires at its scheduled time.
    Drop,
}

/// Full configuration for a tick source.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Tick rate in Hz, `1..=MAX_TICK_RATE_HZ`.
    pub tick_rate_hz: u32,
    /// Overrun handling policy.
    pub policy: TickPolicy,
    /// Fraction of the budget (0.0–1.0) above which a warning is logged.
    pub budget_warn_threshold: f64,
    /// Fraction of the budget (0.0–1.0) above which a critical warning is logged.
    pub budget_critical_threshold: f64,
    /// Enable per-tick metrics collection.
    pub metrics_enabled: bool,
    /// Initial time scale, `0.0..=MAX_TIME_SCALE`.
    pub time_scale: f32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            policy: TickPolicy::default(),
            budget_warn_threshold: 0.80,
            budget_critical_threshold: 1.0,
            metrics_enabled: true,
            time_scale: 1.0,
        }
    }
}

impl TickConfig {
    /// Maximum supported tick rate.
    pub const MAX_TICK_RATE_HZ: u32 = 240;

    /// A config for a specific tick rate with the other defaults.
    pub fn with_rate(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz,
            ..Default::default()
        }
    }

    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called by both clocks on construction. Rules:
    /// - `tick_rate_hz` clamped to `1..=MAX_TICK_RATE_HZ`.
    /// - Thresholds clamped to `0.0..=1.0`, warn forced ≤ critical.
    /// - `time_scale` clamped to `0.0..=MAX_TIME_SCALE`.
    pub fn validated(mut self) -> Self {
        if self.tick_rate_hz == 0 || self.tick_rate_hz > Self::MAX_TICK_RATE_HZ {
            let clamped = self.tick_rate_hz.clamp(1, Self::MAX_TICK_RATE_HZ);
            warn!(
                rate = self.tick_rate_hz,
                clamped, "tick_rate_hz out of range, clamping"
            );
            self.tick_rate_hz = clamped;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self.budget_critical_threshold = self.budget_critical_threshold.clamp(0.0, 1.0);
        if self.budget_warn_threshold > self.budget_critical_threshold {
            self.budget_warn_threshold = self.budget_critical_threshold;
        }
        self.time_scale = clamp_time_scale(self.time_scale);
        self
    }

    /// Duration of a single tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}

pub(crate) fn clamp_time_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        warn!("time scale is NaN, using 1.0");
        return 1.0;
    }
    let clamped = scale.clamp(0.0, MAX_TIME_SCALE);
    if clamped != scale {
        warn!(scale, clamped, "time scale out of range, clamping");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_clamps_rate_and_scale() {
        let cfg = TickConfig {
            tick_rate_hz: 0,
            time_scale: 9.0,
            budget_warn_threshold: 2.0,
            budget_critical_threshold: 0.5,
            ..TickConfig::default()
        }
        .validated();
        assert_eq!(cfg.tick_rate_hz, 1);
        assert_eq!(cfg.time_scale, MAX_TIME_SCALE);
        assert_eq!(cfg.budget_critical_threshold, 0.5);
        assert_eq!(cfg.budget_warn_threshold, 0.5);
    }

    #[test]
    fn test_nan_scale_falls_back_to_real_time() {
        assert_eq!(clamp_time_scale(f32::NAN), 1.0);
        assert_eq!(clamp_time_scale(-1.0), 0.0);
        assert_eq!(clamp_time_scale(0.5), 0.5);
    }
}
