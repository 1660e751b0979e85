//! A value pinned inside a [`Limit`].

use serde::{Deserialize, Serialize};

use crate::{Limit, Ratio};

/// A stat that grows and shrinks but never leaves its range.
///
/// Starts at the range minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    limit: Limit,
    value: f32,
}

impl Gauge {
    pub fn new(limit: Limit) -> Self {
        Self {
            limit,
            value: limit.min,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    /// How full the gauge is.
    pub fn ratio(&self) -> Ratio {
        self.limit.ratio_of(self.value)
    }

    pub fn is_full(&self) -> bool {
        self.value >= self.limit.max
    }

    pub fn set(&mut self, value: f32) {
        self.value = self.limit.clamp(value);
    }

    /// Adds `amount` (negative to drain) and returns the new value.
    pub fn add(&mut self, amount: f32) -> f32 {
        self.set(self.value + amount);
        self.value
    }

    pub fn set_min(&mut self) {
        self.value = self.limit.min;
    }

    pub fn set_max(&mut self) {
        self.value = self.limit.max;
    }
}

impl From<Limit> for Gauge {
    fn from(limit: Limit) -> Self {
        Self::new(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_clamps_to_limit() {
        let mut gauge = Gauge::new(Limit::new(1.0, 2.0));
        assert_eq!(gauge.value(), 1.0);
        assert_eq!(gauge.add(0.5), 1.5);
        assert_eq!(gauge.ratio(), Ratio::HALF);
        assert_eq!(gauge.add(3.0), 2.0);
        assert!(gauge.is_full());
        assert_eq!(gauge.add(-5.0), 1.0);
    }

    #[test]
    fn test_set_min_and_max() {
        let mut gauge = Gauge::from(Limit::up_to(5.0));
        gauge.set_max();
        assert_eq!(gauge.value(), 5.0);
        gauge.set_min();
        assert_eq!(gauge.value(), 0.0);
    }
}
