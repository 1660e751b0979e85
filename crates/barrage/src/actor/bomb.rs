//! The player's bomb: it lobs forward, bursts on landing or on contact,
//! and leaves a blast that grows, fades and then releases the bomb.

use barrage_math::{Degree, Limit, Ratio, Vec2, easing};
use barrage_pool::Poolable;
use barrage_timer::{FrameDelta, Timer};
use tracing::trace;

use crate::body::{Body, Contacts, Damaging, Movable, Target, Team, WeaponKind};
use crate::config::BombConfig;
use crate::services::{Cue, Outbox, SoundCue};

/// The explosion a bomb leaves behind.
#[derive(Debug, Clone)]
pub struct Blast {
    grow: Timer,
    fade: Timer,
    max_radius: f32,
    radius: f32,
    alpha: f32,
}

impl Blast {
    fn new(cfg: &BombConfig) -> Self {
        Self {
            grow: Timer::new().with_interval(cfg.blast_grow_seconds),
            fade: Timer::new().with_interval(cfg.blast_fade_seconds),
            max_radius: cfg.blast_radius,
            radius: 0.0,
            alpha: 1.0,
        }
    }

    fn start(&mut self) {
        self.grow.restart();
        self.fade.reset(true);
        self.radius = 0.0;
        self.alpha = 1.0;
    }

    /// Grows, then fades. Returns `true` once fully faded.
    fn update(&mut self, delta: FrameDelta) -> bool {
        if self.grow.is_counting() {
            if self.grow.advance_frame(delta) {
                self.fade.restart();
            }
            self.radius = self.max_radius * easing::quad_out(self.grow.progress()).to_fraction();
            return false;
        }
        self.fade.advance_frame(delta);
        self.alpha = self.fade.progress().reversed().to_fraction();
        self.fade.is_terminated()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Opacity, 1 until fading starts.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// A pooled bomb.
///
/// Set the heading and [`set_charge`](Self::set_charge) right after
/// generating it; the charge picks how far it flies.
#[derive(Debug, Clone)]
pub struct Bomb {
    body: Body,
    radius: f32,
    damage: f32,
    damage_buff: f32,
    move_distance: Limit,
    launch: Vec2,
    landing: Vec2,
    flight: Timer,
    blast: Blast,
    blasting: bool,
    shake_amplitude: f32,
    shake_seconds: f32,
    contacts: Contacts,
}

impl Bomb {
    pub fn new(cfg: &BombConfig) -> Self {
        Self {
            body: Body::default(),
            radius: cfg.radius,
            damage: cfg.damage,
            damage_buff: 1.0,
            move_distance: cfg.move_distance,
            launch: Vec2::ZERO,
            landing: Vec2::ZERO,
            flight: Timer::new().with_interval(cfg.move_seconds),
            blast: Blast::new(cfg),
            blasting: false,
            shake_amplitude: cfg.shake_amplitude,
            shake_seconds: cfg.shake_seconds,
            contacts: Contacts::default(),
        }
    }

    pub fn set_angle(&mut self, angle: Degree) {
        self.body.set_angle(angle);
        self.aim_landing(Ratio::ZERO);
    }

    /// A fuller charge throws the bomb further.
    pub fn set_charge(&mut self, charge: Ratio) {
        self.aim_landing(charge);
    }

    fn aim_landing(&mut self, charge: Ratio) {
        self.landing = self.launch + self.body.direction() * self.move_distance.lerp(charge);
    }

    pub fn set_damage_buff(&mut self, buff: f32) {
        self.damage_buff = buff;
    }

    pub fn landing(&self) -> Vec2 {
        self.landing
    }

    pub fn is_blasting(&self) -> bool {
        self.blasting
    }

    pub fn blast(&self) -> &Blast {
        &self.blast
    }

    /// Reach of the bomb now: its shell in flight, the blast after.
    pub fn hit_radius(&self) -> f32 {
        if self.blasting {
            self.blast.radius
        } else {
            self.radius
        }
    }

    /// Flies toward the landing point and bursts there; while blasting,
    /// grows and fades, then releases itself.
    pub fn update(&mut self, delta: FrameDelta, outbox: &mut Outbox) {
        if !self.body.active {
            return;
        }
        if self.blasting {
            if self.blast.update(delta) {
                trace!("blast faded");
                self.deactivate();
            }
            return;
        }
        let landed = self.flight.advance_frame(delta);
        let eased = easing::quad_out(self.flight.progress()).to_fraction();
        self.body.position = self.launch.lerp(self.landing, eased);
        if landed {
            self.explode(outbox);
        }
    }

    /// Bursts where the bomb is. Later calls do nothing.
    pub fn explode(&mut self, outbox: &mut Outbox) {
        if !self.body.active || self.blasting {
            return;
        }
        self.blasting = true;
        self.flight.stop();
        self.blast.start();
        self.contacts.clear();
        outbox.push(Cue::Sound(SoundCue::Explosion));
        outbox.push(Cue::CameraShake {
            amplitude: self.shake_amplitude,
            seconds: self.shake_seconds,
        });
    }

    /// Records a blast hit on `target`; each target is struck once.
    pub fn touch(&mut self, target: Target) -> bool {
        self.contacts.first_touch(target)
    }
}

impl Poolable for Bomb {
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
        self.launch = self.body.position;
        self.landing = self.launch;
        self.damage_buff = 1.0;
        self.blasting = false;
        self.flight.restart();
        self.contacts.clear();
    }
}

impl Movable for Bomb {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Damaging for Bomb {
    fn damage(&self) -> f32 {
        self.damage * self.damage_buff
    }

    fn team(&self) -> Team {
        Team::Player
    }

    fn weapon(&self) -> WeaponKind {
        WeaponKind::Bomb
    }

    /// Only the blast hurts.
    fn is_attacking(&self) -> bool {
        self.blasting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrage_pool::Pool;

    const DT: FrameDelta = FrameDelta::fixed(0.125);

    fn quick() -> BombConfig {
        BombConfig {
            move_seconds: 0.5,
            move_distance: Limit::new(2.0, 4.0),
            blast_radius: 2.0,
            blast_grow_seconds: 0.25,
            blast_fade_seconds: 0.5,
            ..BombConfig::default()
        }
    }

    fn launched(charge: Ratio) -> (Pool<Bomb>, barrage_pool::PoolKey) {
        let mut pool = Pool::with_seed(vec![Bomb::new(&quick())], 1);
        let key = pool.generate(Vec2::new(1.0, 0.0)).unwrap();
        pool[key].set_angle(Degree::ZERO);
        pool[key].set_charge(charge);
        (pool, key)
    }

    #[test]
    fn test_charge_sets_throw_distance() {
        let (pool, key) = launched(Ratio::ZERO);
        assert_eq!(pool[key].landing(), Vec2::new(3.0, 0.0));
        let (pool, key) = launched(Ratio::ONE);
        assert_eq!(pool[key].landing(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_travels_then_blasts_then_releases() {
        let (mut pool, key) = launched(Ratio::ONE);
        let mut outbox = Outbox::new();
        let bomb = &mut pool[key];

        // In flight: eased toward the landing point, harmless.
        bomb.update(DT, &mut outbox);
        let first = bomb.position().x;
        assert!(first > 1.0 && first < 5.0);
        assert!(!bomb.is_attacking());
        for _ in 0..2 {
            bomb.update(DT, &mut outbox);
        }
        assert!(!bomb.is_blasting());
        assert!(outbox.is_empty());

        // Lands on the fourth tick and bursts.
        bomb.update(DT, &mut outbox);
        assert_eq!(bomb.position(), Vec2::new(5.0, 0.0));
        assert!(bomb.is_blasting());
        assert!(bomb.is_attacking());
        assert!(outbox.iter().any(|c| *c == Cue::Sound(SoundCue::Explosion)));
        assert!(outbox.iter().any(|c| matches!(c, Cue::CameraShake { .. })));

        // Grows over two ticks.
        bomb.update(DT, &mut outbox);
        assert!(bomb.hit_radius() > 0.0 && bomb.hit_radius() < 2.0);
        bomb.update(DT, &mut outbox);
        assert_eq!(bomb.hit_radius(), 2.0);
        assert_eq!(bomb.blast().alpha(), 1.0);

        // Fades over four, then the bomb frees itself.
        for _ in 0..3 {
            bomb.update(DT, &mut outbox);
            assert!(bomb.is_active());
        }
        assert!(bomb.blast().alpha() < 1.0);
        bomb.update(DT, &mut outbox);
        assert!(!bomb.is_active());
        assert_eq!(pool.reuse(Vec2::ZERO), Some(key));
        assert!(!pool[key].is_blasting());
    }

    #[test]
    fn test_contact_explodes_early_and_once() {
        let (mut pool, key) = launched(Ratio::ONE);
        let mut outbox = Outbox::new();
        let bomb = &mut pool[key];
        bomb.update(DT, &mut outbox);
        let at = bomb.position();

        bomb.explode(&mut outbox);
        bomb.explode(&mut outbox);
        assert_eq!(outbox.len(), 2);
        bomb.update(DT, &mut outbox);
        assert_eq!(bomb.position(), at);
    }

    #[test]
    fn test_blast_strikes_each_target_once() {
        let (mut pool, key) = launched(Ratio::ZERO);
        let mut outbox = Outbox::new();
        let bomb = &mut pool[key];
        bomb.explode(&mut outbox);
        assert!(bomb.touch(Target::Boss));
        assert!(!bomb.touch(Target::Boss));
        assert_eq!(bomb.weapon(), WeaponKind::Bomb);
    }
}
