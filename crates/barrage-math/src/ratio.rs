//! Fractions and probabilities.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

/// A fraction clamped to `0.0..=1.0`.
///
/// Used for timer progress, remaining life, stage level and buff weights.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Ratio(f32);

impl Ratio {
    pub const ZERO: Self = Self(0.0);
    pub const HALF: Self = Self(0.5);
    pub const ONE: Self = Self(1.0);

    /// Clamps into range; NaN becomes zero.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn to_fraction(self) -> f32 {
        self.0
    }

    /// `1 - self`, e.g. life lost from life remaining.
    pub fn reversed(self) -> Self {
        Self(1.0 - self.0)
    }

    pub fn saturating_add(self, amount: f32) -> Self {
        Self::new(self.0 + amount)
    }

    pub fn saturating_sub(self, amount: f32) -> Self {
        Self::new(self.0 - amount)
    }

    /// Scales `value` by this fraction.
    pub fn of(self, value: f32) -> f32 {
        value * self.0
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f32::deserialize(deserializer).map(Self::new)
    }
}

/// A probability expressed in percent, clamped to `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Percentage(f32);

impl Percentage {
    pub const NEVER: Self = Self(0.0);
    pub const ALWAYS: Self = Self(100.0);

    pub fn new(percent: f32) -> Self {
        if percent.is_nan() {
            Self(0.0)
        } else {
            Self(percent.clamp(0.0, 100.0))
        }
    }

    pub fn percent(self) -> f32 {
        self.0
    }

    pub fn to_ratio(self) -> Ratio {
        Ratio::new(self.0 * 0.01)
    }

    /// Rolls the dice. 0% never passes, 100% always does.
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> bool {
        if self.0 <= 0.0 {
            return false;
        }
        rng.random_range(0.0..100.0) < self.0
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f32::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_ratio_clamps() {
        assert_eq!(Ratio::new(1.5), Ratio::ONE);
        assert_eq!(Ratio::new(-0.2), Ratio::ZERO);
        assert_eq!(Ratio::new(f32::NAN), Ratio::ZERO);
    }

    #[test]
    fn test_ratio_reversed() {
        assert!((Ratio::new(0.25).reversed().to_fraction() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_percentage_to_ratio() {
        assert!((Percentage::new(40.0).to_ratio().to_fraction() - 0.4).abs() < 1e-6);
        assert_eq!(Percentage::new(250.0), Percentage::ALWAYS);
    }

    #[test]
    fn test_percentage_extremes_are_certain() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(Percentage::ALWAYS.roll(&mut rng));
            assert!(!Percentage::NEVER.roll(&mut rng));
        }
    }
}
