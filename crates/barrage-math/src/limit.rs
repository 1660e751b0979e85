//! Min/max ranges.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Ratio;

/// A closed `min..=max` range of floats.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Limit {
    pub min: f32,
    pub max: f32,
}

impl Limit {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `0.0..=max`.
    pub const fn up_to(max: f32) -> Self {
        Self { min: 0.0, max }
    }

    pub fn range(&self) -> f32 {
        self.max - self.min
    }

    pub fn mid(&self) -> f32 {
        self.lerp(Ratio::HALF)
    }

    pub fn lerp(&self, t: Ratio) -> f32 {
        self.min + self.range() * t.to_fraction()
    }

    /// Where `value` sits inside the range, clamped.
    pub fn ratio_of(&self, value: f32) -> Ratio {
        let range = self.range();
        if range.abs() <= f32::EPSILON {
            return Ratio::ZERO;
        }
        Ratio::new((value - self.min) / range)
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min.min(self.max), self.max.max(self.min))
    }

    /// Uniform sample in the range. A degenerate range returns `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..self.max)
    }

    /// Uniform integer sample in `floor(min)..=floor(max)`.
    pub fn sample_int<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let lo = self.min.floor() as i32;
        let hi = self.max.floor() as i32;
        if hi <= lo {
            return lo;
        }
        rng.random_range(lo..=hi)
    }

    pub fn swapped(&self) -> Self {
        Self::new(self.max, self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_lerp_and_ratio_of_are_inverse() {
        let limit = Limit::new(0.6, 1.0);
        let w = limit.lerp(Ratio::new(0.5));
        assert!((w - 0.8).abs() < 1e-6);
        assert!((limit.ratio_of(w).to_fraction() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_sample_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let limit = Limit::new(-4.0, 4.0);
        for _ in 0..200 {
            let v = limit.sample(&mut rng);
            assert!((-4.0..4.0).contains(&v));
        }
    }

    #[test]
    fn test_sample_int_inclusive() {
        let mut rng = StdRng::seed_from_u64(11);
        let limit = Limit::new(0.0, 1.0);
        let mut seen = [false; 2];
        for _ in 0..200 {
            seen[limit.sample_int(&mut rng) as usize] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Limit::new(2.0, 2.0).sample(&mut rng), 2.0);
        assert_eq!(Limit::new(2.0, 2.0).ratio_of(5.0), Ratio::ZERO);
    }
}
