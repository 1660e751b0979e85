//! Difficulty curves.
//!
//! Boss tuning values scale with two inputs: how much life the boss has
//! lost and how far the stage level has progressed. Counts grow with
//! both; waiting times shrink with both.

use barrage_math::Ratio;
use serde::{Deserialize, Serialize};

/// `base * (1 + life * life_lost + level * level)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthBuff {
    pub life: f32,
    pub level: f32,
}

impl GrowthBuff {
    pub const fn new(life: f32, level: f32) -> Self {
        Self { life, level }
    }

    pub fn value(&self, base: f32, life_lost: Ratio, level: Ratio) -> f32 {
        base * (1.0 + self.life * life_lost.to_fraction() + self.level * level.to_fraction())
    }

    /// [`value`](Self::value) truncated to a count.
    pub fn count(&self, base: u32, life_lost: Ratio, level: Ratio) -> u32 {
        self.value(base as f32, life_lost, level) as u32
    }
}

/// `base * (1 - life * life_lost) * (1 - level * level)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayBuff {
    pub life: Ratio,
    pub level: Ratio,
}

impl DecayBuff {
    pub fn new(life: f32, level: f32) -> Self {
        Self {
            life: Ratio::new(life),
            level: Ratio::new(level),
        }
    }

    pub fn value(&self, base: f32, life_lost: Ratio, level: Ratio) -> f32 {
        let life_buffed = base * (1.0 - self.life.to_fraction() * life_lost.to_fraction());
        life_buffed * (1.0 - self.level.to_fraction() * level.to_fraction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_is_identity_at_full_life_and_first_level() {
        let buff = GrowthBuff::new(2.0, 3.0);
        assert_eq!(buff.value(3.0, Ratio::ZERO, Ratio::ZERO), 3.0);
        assert_eq!(buff.count(3, Ratio::ZERO, Ratio::ZERO), 3);
    }

    #[test]
    fn test_growth_adds_both_terms() {
        let buff = GrowthBuff::new(2.0, 3.0);
        // 3 * (1 + 2*0.5 + 3*1) = 15
        assert_eq!(buff.value(3.0, Ratio::HALF, Ratio::ONE), 15.0);
    }

    #[test]
    fn test_growth_count_truncates_toward_zero() {
        let buff = GrowthBuff::new(2.0, 0.0);
        // 3 * (1 + 2*0.25) = 4.5
        assert_eq!(buff.value(3.0, Ratio::new(0.25), Ratio::ZERO), 4.5);
        assert_eq!(buff.count(3, Ratio::new(0.25), Ratio::ZERO), 4);
    }

    #[test]
    fn test_decay_multiplies_both_terms() {
        let buff = DecayBuff::new(0.5, 0.5);
        // 2 * (1 - 0.5) * (1 - 0.5) = 0.5
        assert_eq!(buff.value(2.0, Ratio::ONE, Ratio::ONE), 0.5);
        assert_eq!(buff.value(2.0, Ratio::ZERO, Ratio::ZERO), 2.0);
    }
}
