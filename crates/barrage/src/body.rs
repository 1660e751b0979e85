//! Kinematics shared by every actor, and the capability traits actors
//! compose instead of inheriting.

use barrage_math::{Degree, Vec2};
use barrage_pool::PoolKey;
use serde::{Deserialize, Serialize};

/// Which side a weapon belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Player,
    Enemy,
}

/// Player weapon families. An enemy's weakness names one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Shot,
    Bomb,
    Beam,
}

impl WeaponKind {
    pub const ALL: [Self; 3] = [Self::Shot, Self::Bomb, Self::Beam];
}

/// Position, heading and speed of an actor.
///
/// The heading is kept as an angle and as unit vectors; setting either
/// updates the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    angle: Degree,
    direction: Vec2,
    left: Vec2,
    /// Units per second along `direction`.
    pub speed: f32,
    pub active: bool,
}

impl Body {
    pub fn new(position: Vec2, angle: Degree) -> Self {
        let mut body = Self {
            position,
            angle,
            direction: Vec2::RIGHT,
            left: Vec2::UP,
            speed: 0.0,
            active: false,
        };
        body.set_angle(angle);
        body
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn angle(&self) -> Degree {
        self.angle
    }

    pub fn set_angle(&mut self, angle: Degree) {
        self.angle = angle;
        self.direction = angle.unit_vector();
        self.left = self.direction.perp();
    }

    /// Forward unit vector.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Points the body along `direction`. A zero vector is ignored.
    pub fn set_direction(&mut self, direction: Vec2) {
        let unit = direction.normalized();
        if unit == Vec2::ZERO {
            return;
        }
        self.direction = unit;
        self.left = unit.perp();
        self.angle = Degree::from_vector(unit);
    }

    pub fn left(&self) -> Vec2 {
        self.left
    }

    pub fn right(&self) -> Vec2 {
        -self.left
    }

    pub fn back(&self) -> Vec2 {
        -self.direction
    }

    pub fn look_at(&mut self, target: Vec2) {
        self.set_direction(target - self.position);
    }

    /// Moves `speed * dt` along the heading.
    pub fn step(&mut self, dt: f32) {
        self.position += self.direction * (self.speed * dt);
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Degree::ZERO)
    }
}

/// Anything with a [`Body`] that moves on its own.
pub trait Movable {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    fn position(&self) -> Vec2 {
        self.body().position
    }

    /// Effective speed. Override to apply buffs.
    fn speed(&self) -> f32 {
        self.body().speed
    }

    fn advance_position(&mut self, dt: f32) {
        let offset = self.body().direction() * (self.speed() * dt);
        self.body_mut().position += offset;
    }

    fn look_at(&mut self, target: Vec2) {
        self.body_mut().look_at(target);
    }
}

/// Anything that hurts what it touches.
pub trait Damaging {
    fn damage(&self) -> f32;

    fn team(&self) -> Team;

    fn weapon(&self) -> WeaponKind;

    /// Whether a hit right now would deal damage.
    fn is_attacking(&self) -> bool {
        true
    }
}

/// Anything that may only be hurt by one weapon family.
pub trait HasWeakness {
    fn weakness(&self) -> Option<WeaponKind>;

    /// Without a weakness every weapon hurts.
    fn is_hurt_by(&self, weapon: WeaponKind) -> bool {
        self.weakness().is_none_or(|w| w == weapon)
    }
}

/// Something a weapon can connect with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Enemy(PoolKey),
    Boss,
    Player,
}

/// Targets a lingering weapon (piercing shot, blast, beam) has already
/// hit. Each target is struck once per shot.
#[derive(Debug, Clone, Default)]
pub struct Contacts(Vec<Target>);

impl Contacts {
    /// Records `target`. Returns `false` if it was hit before.
    pub fn first_touch(&mut self, target: Target) -> bool {
        if self.0.contains(&target) {
            return false;
        }
        self.0.push(target);
        true
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether two circles overlap.
pub fn overlaps(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) <= a_radius + b_radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_angle_and_direction_stay_in_sync() {
        let mut body = Body::new(Vec2::ZERO, Degree::HALF_TURN);
        assert!(close(body.direction(), Vec2::LEFT));
        assert!(close(body.left(), Vec2::DOWN));
        assert!(close(body.right(), Vec2::UP));

        body.set_direction(Vec2::new(0.0, 3.0));
        assert!((body.angle().degrees() - 90.0).abs() < 1e-4);
        assert!(close(body.back(), Vec2::DOWN));
    }

    #[test]
    fn test_zero_direction_is_ignored() {
        let mut body = Body::new(Vec2::ZERO, Degree::new(90.0));
        body.look_at(Vec2::ZERO);
        assert!((body.angle().degrees() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_step_moves_along_heading() {
        let mut body = Body::new(Vec2::ZERO, Degree::ZERO).with_speed(4.0);
        body.step(0.5);
        assert!(close(body.position, Vec2::new(2.0, 0.0)));
    }

    struct Shield(Option<WeaponKind>);

    impl HasWeakness for Shield {
        fn weakness(&self) -> Option<WeaponKind> {
            self.0
        }
    }

    #[test]
    fn test_contacts_strike_once() {
        let mut contacts = Contacts::default();
        assert!(contacts.first_touch(Target::Boss));
        assert!(!contacts.first_touch(Target::Boss));
        assert!(contacts.first_touch(Target::Player));
        assert_eq!(contacts.len(), 2);
        contacts.clear();
        assert!(contacts.first_touch(Target::Boss));
    }

    #[test]
    fn test_weakness_filters_weapons() {
        assert!(Shield(None).is_hurt_by(WeaponKind::Bomb));
        assert!(Shield(Some(WeaponKind::Beam)).is_hurt_by(WeaponKind::Beam));
        assert!(!Shield(Some(WeaponKind::Beam)).is_hurt_by(WeaponKind::Shot));
    }
}
