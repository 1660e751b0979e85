//! Per-tick elapsed time.

/// Elapsed time of one tick, in seconds.
///
/// `scaled` is game time (multiplied by the current time scale);
/// `unscaled` is real time and keeps flowing while the game is paused.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameDelta {
    pub scaled: f32,
    pub unscaled: f32,
}

impl FrameDelta {
    /// A tick of `dt` seconds at time scale 1.
    pub const fn fixed(dt: f32) -> Self {
        Self {
            scaled: dt,
            unscaled: dt,
        }
    }

    /// A tick of `dt` real seconds under `time_scale`.
    pub fn scaled(dt: f32, time_scale: f32) -> Self {
        Self {
            scaled: dt * time_scale.max(0.0),
            unscaled: dt,
        }
    }

    /// Picks the component a timer should consume.
    pub fn pick(&self, ignores_time_scale: bool) -> f32 {
        if ignores_time_scale {
            self.unscaled
        } else {
            self.scaled
        }
    }
}
