//! Angles. Degrees are the gameplay unit; radians only exist at the
//! trigonometry boundary.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::Vec2;

/// An angle in degrees, always normalized to `0.0..360.0`.
///
/// 0° points along +X, 90° along +Y.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Degree(f32);

impl Degree {
    pub const ZERO: Self = Self(0.0);
    /// Facing -X: the heading enemies use when entering from the right.
    pub const HALF_TURN: Self = Self(180.0);
    pub const FULL_TURN: f32 = 360.0;

    pub fn new(degrees: f32) -> Self {
        let wrapped = degrees.rem_euclid(Self::FULL_TURN);
        // rem_euclid can round up to exactly 360 for tiny negatives.
        if wrapped >= Self::FULL_TURN || !wrapped.is_finite() {
            Self(0.0)
        } else {
            Self(wrapped)
        }
    }

    /// Heading of a vector. The zero vector maps to 0°.
    pub fn from_vector(v: Vec2) -> Self {
        if v == Vec2::ZERO {
            return Self::ZERO;
        }
        Radian::new(v.y.atan2(v.x)).to_degree()
    }

    /// Unsigned angle between two vectors, in `0.0..=180.0`.
    pub fn between(a: Vec2, b: Vec2) -> f32 {
        let cos = a.normalized().dot(b.normalized()).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }

    /// A uniformly random heading.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random_range(0.0..Self::FULL_TURN))
    }

    pub fn degrees(self) -> f32 {
        self.0
    }

    pub fn to_radian(self) -> Radian {
        Radian::new(self.0.to_radians())
    }

    /// Unit vector pointing along this heading.
    pub fn unit_vector(self) -> Vec2 {
        let rad = self.to_radian().value();
        Vec2::new(rad.cos(), rad.sin())
    }
}

impl<'de> Deserialize<'de> for Degree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f32::deserialize(deserializer).map(Self::new)
    }
}

impl Add for Degree {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl AddAssign for Degree {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Degree {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 - rhs.0)
    }
}

impl Mul<f32> for Degree {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.0 * rhs)
    }
}

impl Div<f32> for Degree {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.0 / rhs)
    }
}

impl Neg for Degree {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.0)
    }
}

/// An angle in radians. Not normalized.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radian(f32);

impl Radian {
    pub const fn new(radians: f32) -> Self {
        Self(radians)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn to_degree(self) -> Degree {
        Degree::new(self.0.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_new_wraps_into_range() {
        assert!(close(Degree::new(370.0).degrees(), 10.0));
        assert!(close(Degree::new(-90.0).degrees(), 270.0));
        assert!(close(Degree::new(720.0).degrees(), 0.0));
    }

    #[test]
    fn test_from_vector_quadrants() {
        assert!(close(Degree::from_vector(Vec2::UP).degrees(), 90.0));
        assert!(close(Degree::from_vector(Vec2::LEFT).degrees(), 180.0));
        assert!(close(Degree::from_vector(Vec2::DOWN).degrees(), 270.0));
    }

    #[test]
    fn test_unit_vector_round_trips_heading() {
        let d = Degree::new(135.0);
        assert!(close(Degree::from_vector(d.unit_vector()).degrees(), 135.0));
    }

    #[test]
    fn test_between_is_unsigned() {
        assert!(close(Degree::between(Vec2::RIGHT, Vec2::UP), 90.0));
        assert!(close(Degree::between(Vec2::RIGHT, Vec2::DOWN), 90.0));
        assert!(close(Degree::between(Vec2::RIGHT, Vec2::LEFT), 180.0));
    }

    #[test]
    fn test_subtraction_wraps() {
        let d = Degree::new(10.0) - Degree::new(30.0);
        assert!(close(d.degrees(), 340.0));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let d: Degree = serde_json::from_str("450.0").unwrap();
        assert!(close(d.degrees(), 90.0));
    }
}
