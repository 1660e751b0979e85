//! Explicit unit value types for Barrage.
//!
//! Gameplay code juggles several kinds of "just a float": angles in
//! degrees, angles in radians, progress fractions, drop probabilities and
//! min/max ranges. Each gets its own type here, and converting between
//! them is always a named call (`Degree::to_radian`, `Ratio::to_fraction`,
//! `Percentage::to_ratio`). Nothing converts implicitly.
//!
//! - [`Vec2`]: 2D position / direction
//! - [`Degree`] / [`Radian`]: angles
//! - [`Ratio`]: a fraction clamped to `0.0..=1.0`
//! - [`Percentage`]: a probability in `0.0..=100.0`
//! - [`Limit`]: a min/max range with lerp and sampling
//! - [`Gauge`]: a value kept inside a [`Limit`]
//! - [`easing`]: interpolation curves over a [`Ratio`]

mod angle;
pub mod easing;
mod gauge;
mod limit;
mod ratio;
mod vec2;

pub use angle::{Degree, Radian};
pub use gauge::Gauge;
pub use limit::Limit;
pub use ratio::{Percentage, Ratio};
pub use vec2::Vec2;
