//! Projectiles: straight, homing and weaving.

use std::f32::consts::TAU;

use barrage_math::{Degree, Ratio, Vec2};
use barrage_pool::{Pool, Poolable};
use barrage_timer::Timer;
use serde::{Deserialize, Serialize};

use crate::body::{Body, Contacts, Damaging, Movable, Target, Team, WeaponKind};
use crate::world::Bounds;

/// How a bullet travels after it leaves the muzzle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Flight {
    /// Along its heading.
    Straight,
    /// Turns toward its target every tick. An accuracy of 1 points
    /// straight at it.
    Chase { accuracy: Ratio },
    /// Weaves across its heading on a sine path.
    Wave { amplitude: f32, period: f32 },
}

/// A pooled projectile.
#[derive(Debug, Clone)]
pub struct Bullet {
    body: Body,
    team: Team,
    weapon: WeaponKind,
    base_damage: f32,
    radius: f32,
    pub damage_buff: f32,
    pub speed_buff: f32,
    /// Scales the hit radius; charged shots are bigger.
    pub size_buff: f32,
    /// Charged shots fly through what they hit.
    pub pierces: bool,
    flight: Flight,
    /// Where a chasing bullet is headed.
    target: Option<Vec2>,
    /// Centre line of a weaving bullet.
    anchor: Vec2,
    wave: Timer,
    contacts: Contacts,
}

impl Bullet {
    /// A template. Tag it with a team through the owning pool's
    /// construction hook.
    pub fn new(speed: f32, damage: f32) -> Self {
        Self {
            body: Body::new(Vec2::ZERO, Degree::ZERO).with_speed(speed),
            team: Team::Player,
            weapon: WeaponKind::Shot,
            base_damage: damage,
            radius: 0.1,
            damage_buff: 1.0,
            speed_buff: 1.0,
            size_buff: 1.0,
            pierces: false,
            flight: Flight::Straight,
            target: None,
            anchor: Vec2::ZERO,
            wave: Timer::new(),
            contacts: Contacts::default(),
        }
    }

    pub fn with_flight(mut self, flight: Flight) -> Self {
        self.flight = flight;
        if let Flight::Wave { period, .. } = flight {
            self.wave = Timer::new().with_interval(period).looping().started();
        }
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius * self.size_buff
    }

    pub fn flight(&self) -> Flight {
        self.flight
    }

    /// Points a chasing bullet at `target`. `None` keeps the heading.
    pub fn set_target(&mut self, target: Option<Vec2>) {
        self.target = target;
    }

    pub fn set_team(&mut self, team: Team) {
        self.team = team;
    }

    pub fn set_angle(&mut self, angle: Degree) {
        self.body.set_angle(angle);
    }

    /// Moves the bullet and releases it once it leaves `bounds`. Returns
    /// whether it is still in play.
    pub fn update(&mut self, dt: f32, bounds: &Bounds) -> bool {
        if !self.body.active {
            return false;
        }
        match self.flight {
            Flight::Straight => self.advance_position(dt),
            Flight::Chase { accuracy } => {
                if let Some(target) = self.target {
                    let to_target = (target - self.body.position).normalized();
                    let heading = self.body.direction().lerp(to_target, accuracy.to_fraction());
                    self.body.set_direction(heading);
                }
                self.advance_position(dt);
            }
            Flight::Wave { amplitude, .. } => {
                self.anchor += self.body.direction() * (self.speed() * dt);
                self.wave.advance(dt);
                let swing = (self.wave.progress().to_fraction() * TAU).sin() * amplitude;
                self.body.position = self.anchor + self.body.left() * swing;
            }
        }
        if !bounds.contains(self.body.position) {
            self.deactivate();
            return false;
        }
        true
    }

    /// Records a hit on `target`. A piercing bullet strikes each target
    /// once; returns `false` for a repeat.
    pub fn touch(&mut self, target: Target) -> bool {
        self.contacts.first_touch(target)
    }

    /// Called when the bullet connects. Non-piercing bullets are spent.
    pub fn on_hit(&mut self) {
        if !self.pierces {
            self.deactivate();
        }
    }
}

/// Moves every live bullet of `pool`.
pub fn update_bullets(pool: &mut Pool<Bullet>, dt: f32, bounds: &Bounds) {
    pool.for_each_active(|_, bullet| {
        bullet.update(dt, bounds);
    });
}

impl Poolable for Bullet {
    fn is_active(&self) -> bool {
        self.body.active
    }

    fn set_active(&mut self, active: bool) {
        self.body.active = active;
    }

    fn set_position(&mut self, position: Vec2) {
        self.body.position = position;
    }

    fn on_acquired(&mut self) {
        self.pierces = false;
        self.size_buff = 1.0;
        self.target = None;
        self.anchor = self.body.position;
        self.wave.restart();
        self.contacts.clear();
    }
}

impl Movable for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn speed(&self) -> f32 {
        self.body.speed * self.speed_buff
    }
}

impl Damaging for Bullet {
    fn damage(&self) -> f32 {
        self.base_damage * self.damage_buff
    }

    fn team(&self) -> Team {
        self.team
    }

    fn weapon(&self) -> WeaponKind {
        self.weapon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Bounds {
        Bounds::new(Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0))
    }

    #[test]
    fn test_leaves_field_and_releases() {
        let mut pool = Pool::with_seed(vec![Bullet::new(10.0, 1.0)], 3);
        let key = pool.generate(Vec2::new(4.0, 0.0)).unwrap();

        update_bullets(&mut pool, 0.05, &field());
        assert!(pool[key].is_active());
        update_bullets(&mut pool, 0.1, &field());
        assert!(!pool[key].is_active());
        assert_eq!(pool.reuse(Vec2::ZERO), Some(key));
    }

    #[test]
    fn test_buffs_scale_speed_and_damage() {
        let mut bullet = Bullet::new(2.0, 3.0);
        bullet.speed_buff = 2.0;
        bullet.damage_buff = 0.5;
        bullet.set_active(true);
        bullet.update(1.0, &field());
        assert_eq!(bullet.position(), Vec2::new(4.0, 0.0));
        assert_eq!(bullet.damage(), 1.5);
    }

    #[test]
    fn test_chase_turns_toward_target() {
        let bullet = Bullet::new(1.0, 1.0).with_flight(Flight::Chase {
            accuracy: Ratio::HALF,
        });
        let mut pool = Pool::with_seed(vec![bullet], 1);
        let key = pool.generate(Vec2::ZERO).unwrap();
        let bullet = &mut pool[key];
        bullet.set_target(Some(Vec2::new(0.0, 10.0)));

        let before = bullet.body().direction();
        bullet.update(0.1, &field());
        let after = bullet.body().direction();
        assert!(after.y > before.y);
        // Half way between right and up.
        assert!((after.x - after.y).abs() < 1e-5);

        for _ in 0..20 {
            bullet.update(0.01, &field());
        }
        assert!(bullet.body().direction().y > 0.99);
    }

    #[test]
    fn test_chase_without_target_flies_straight() {
        let mut bullet = Bullet::new(2.0, 1.0).with_flight(Flight::Chase {
            accuracy: Ratio::ONE,
        });
        bullet.set_active(true);
        bullet.update(0.5, &field());
        assert_eq!(bullet.position(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_wave_swings_across_heading() {
        let bullet = Bullet::new(4.0, 1.0).with_flight(Flight::Wave {
            amplitude: 1.0,
            period: 1.0,
        });
        let mut pool = Pool::with_seed(vec![bullet], 1);
        let key = pool.generate(Vec2::new(-4.0, 0.0)).unwrap();
        let bullet = &mut pool[key];

        // A quarter period: full swing to the left of the heading.
        bullet.update(0.25, &field());
        assert!((bullet.position() - Vec2::new(-3.0, 1.0)).length() < 1e-4);
        bullet.update(0.5, &field());
        assert!((bullet.position() - Vec2::new(-1.0, -1.0)).length() < 1e-4);
        bullet.update(0.25, &field());
        assert!((bullet.position() - Vec2::new(0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_piercing_bullet_touches_each_target_once() {
        let mut pool = Pool::with_seed(vec![Bullet::new(1.0, 1.0)], 1);
        let key = pool.generate(Vec2::ZERO).unwrap();
        assert!(pool[key].touch(Target::Boss));
        assert!(!pool[key].touch(Target::Boss));
        pool[key].deactivate();

        let again = pool.generate(Vec2::ZERO).unwrap();
        assert_eq!(again, key);
        assert!(pool[key].touch(Target::Boss));
    }

    #[test]
    fn test_piercing_bullets_survive_hits() {
        let mut bullet = Bullet::new(1.0, 1.0);
        bullet.set_active(true);
        bullet.pierces = true;
        bullet.on_hit();
        assert!(bullet.is_active());
        bullet.pierces = false;
        bullet.on_hit();
        assert!(!bullet.is_active());
    }
}
