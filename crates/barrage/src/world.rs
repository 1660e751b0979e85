//! Read-only world state handed to actors each tick.

use barrage_math::{Ratio, Vec2};
use serde::{Deserialize, Serialize};

use crate::body::WeaponKind;

/// Axis-aligned play field. Actors that leave it are released.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// The same field grown by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Self {
        let grow = Vec2::new(margin, margin);
        Self::new(self.min - grow, self.max + grow)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Vec2::new(-13.0, -6.0), Vec2::new(13.0, 6.0))
    }
}

/// Weapons the player has unlocked. Only those can become an enemy's
/// weakness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeaponSet(u8);

impl WeaponSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(0b111)
    }

    pub fn with(mut self, kind: WeaponKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn insert(&mut self, kind: WeaponKind) {
        self.0 |= Self::bit(kind);
    }

    pub fn contains(&self, kind: WeaponKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    fn bit(kind: WeaponKind) -> u8 {
        1 << kind as u8
    }
}

/// Snapshot of the world an actor may read during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldView {
    pub player: Vec2,
    pub player_alive: bool,
    /// Stage difficulty, 0 at the first level.
    pub level: Ratio,
    pub bounds: Bounds,
    pub unlocked: WeaponSet,
}

impl Default for WorldView {
    fn default() -> Self {
        Self {
            player: Vec2::new(-8.0, 0.0),
            player_alive: true,
            level: Ratio::ZERO,
            bounds: Bounds::default(),
            unlocked: WeaponSet::empty().with(WeaponKind::Shot),
        }
    }
}
