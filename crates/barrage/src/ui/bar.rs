//! Gauge bars (boss life, stage progress).

use barrage_math::Ratio;
use barrage_timer::{FrameDelta, Timer};

/// A bar with a fill ratio inside a frame whose length can be scaled.
///
/// The frame length animates the bar in and out; the ratio is the value
/// shown.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    ratio: Ratio,
    length_scale: Ratio,
    reveal: Timer,
}

impl ProgressBar {
    /// A full, fully visible bar.
    pub fn new() -> Self {
        Self {
            ratio: Ratio::ONE,
            length_scale: Ratio::ONE,
            reveal: Timer::new(),
        }
    }

    pub fn ratio(&self) -> Ratio {
        self.ratio
    }

    pub fn set_ratio(&mut self, ratio: Ratio) {
        self.ratio = ratio;
    }

    pub fn length_scale(&self) -> Ratio {
        self.length_scale
    }

    /// Sets the frame length directly. Cancels a running reveal.
    pub fn set_length_scale(&mut self, scale: Ratio) {
        self.reveal.stop();
        self.length_scale = scale;
    }

    pub fn hide(&mut self) {
        self.set_length_scale(Ratio::ZERO);
    }

    /// Grows the frame from nothing to full length over `seconds`.
    pub fn reveal(&mut self, seconds: f32) {
        self.length_scale = Ratio::ZERO;
        self.reveal.restart_with(seconds);
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_counting()
    }

    pub fn update(&mut self, delta: FrameDelta) {
        if self.reveal.is_counting() {
            self.reveal.advance_frame(delta);
            self.length_scale = self.reveal.progress();
        }
    }

    /// Visible fill as a fraction of the full-length frame.
    pub fn filled(&self) -> f32 {
        self.ratio.to_fraction() * self.length_scale.to_fraction()
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_grows_frame() {
        let mut bar = ProgressBar::new();
        bar.set_ratio(Ratio::HALF);
        bar.reveal(0.5);
        assert_eq!(bar.filled(), 0.0);

        bar.update(FrameDelta::fixed(0.25));
        assert_eq!(bar.length_scale(), Ratio::HALF);
        assert_eq!(bar.filled(), 0.25);

        bar.update(FrameDelta::fixed(0.25));
        assert_eq!(bar.length_scale(), Ratio::ONE);
        assert!(!bar.is_revealing());
    }

    #[test]
    fn test_manual_scale_cancels_reveal() {
        let mut bar = ProgressBar::new();
        bar.reveal(1.0);
        bar.hide();
        bar.update(FrameDelta::fixed(0.5));
        assert_eq!(bar.length_scale(), Ratio::ZERO);
    }
}
