//! Regular enemies.

use barrage_math::{Degree, Limit, Percentage, Ratio, Vec2};
use barrage_pool::{Pool, PoolError, Poolable};
use barrage_timer::{FrameDelta, Timer};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::bullet::{Bullet, update_bullets};
use super::item::ItemKind;
use crate::body::{Body, HasWeakness, Movable, Team, WeaponKind};
use crate::config::{EnemyConfig, WaveConfig};
use crate::services::{Cue, Outbox, SoundCue};
use crate::world::WorldView;

/// How an enemy moves and whether it shoots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Flies straight ahead.
    Straight,
    /// Turns toward the player once, then flies straight.
    Aimer,
    /// Travels a random distance, stops and shoots.
    StayShot,
    /// Flies straight and shoots at the player while it can see them.
    MoveShot,
}

impl EnemyKind {
    pub const ALL: [Self; 4] = [Self::Straight, Self::Aimer, Self::StayShot, Self::MoveShot];

    pub fn shoots(self) -> bool {
        matches!(self, Self::StayShot | Self::MoveShot)
    }
}

/// Result of [`Enemy::take_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Inactive, invincible, or the weapon is not the weakness.
    Ignored,
    Survived,
    Destroyed,
}

/// A pooled enemy.
///
/// Cloning yields a fresh enemy: the bullet pool keeps its templates but
/// not its members.
pub struct Enemy {
    kind: EnemyKind,
    body: Body,
    life_max: f32,
    life: f32,
    life_ratio: Ratio,
    hit_radius: f32,
    pub invincible: bool,
    weakness: Option<WeaponKind>,
    weakness_multiplier: f32,

    shot_timer: Timer,
    bullets: Pool<Bullet>,
    bullet_distance: f32,
    flash: Timer,

    stay_distance: Limit,
    travel: f32,
    travelled: f32,
    viewing_angle: Degree,

    drop_chance: Percentage,
    drop_count: Limit,
    bonus_drops: u32,
    drop_kinds: Vec<ItemKind>,

    destroyed: bool,
    rng: StdRng,
}

impl Enemy {
    /// A template of `kind`.
    pub fn template(kind: EnemyKind, cfg: &EnemyConfig) -> Self {
        Self {
            kind,
            body: Body::new(Vec2::ZERO, Degree::HALF_TURN).with_speed(cfg.speed),
            life_max: cfg.life.max(f32::EPSILON),
            life: cfg.life,
            life_ratio: Ratio::ONE,
            hit_radius: cfg.hit_radius,
            invincible: false,
            weakness: None,
            weakness_multiplier: cfg.weakness_multiplier,
            shot_timer: Timer::new().with_interval(cfg.shot_seconds).looping(),
            bullets: Pool::with_seed(vec![Bullet::new(cfg.bullet_speed, cfg.bullet_damage)], 0),
            bullet_distance: cfg.bullet_distance,
            flash: Timer::new().with_interval(cfg.flash_seconds),
            stay_distance: cfg.stay_distance,
            travel: 0.0,
            travelled: 0.0,
            viewing_angle: cfg.viewing_angle,
            drop_chance: cfg.drop_chance,
            drop_count: cfg.drop_count,
            bonus_drops: cfg.weakness_bonus_drops,
            drop_kinds: cfg.drop_kinds.clone(),
            destroyed: false,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Per-spawn setup that needs the world and randomness: weakness
    /// roll, stay distance, aiming. Call right after generation.
    pub fn spawn(&mut self, rng: &mut impl Rng, world: &WorldView, wave: &WaveConfig) {
        self.rng = StdRng::seed_from_u64(rng.random());

        self.weakness = None;
        if wave.weakness_chance.roll(rng) {
            let candidates: Vec<WeaponKind> = wave
                .weakness_weapons
                .iter()
                .copied()
                .filter(|&weapon| world.unlocked.contains(weapon))
                .collect();
            self.weakness = candidates.choose(rng).copied();
        }

        self.travel = self.stay_distance.sample(rng);
        if self.kind == EnemyKind::Aimer {
            self.body.look_at(world.player);
        }
        trace!(kind = ?self.kind, weakness = ?self.weakness, "enemy spawned");
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn life_ratio(&self) -> Ratio {
        self.life_ratio
    }

    pub fn hit_radius(&self) -> f32 {
        self.hit_radius
    }

    /// Whether the damage flash is showing.
    pub fn is_flashing(&self) -> bool {
        self.flash.is_counting()
    }

    pub fn was_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn bullets(&self) -> &Pool<Bullet> {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut Pool<Bullet> {
        &mut self.bullets
    }

    pub fn set_angle(&mut self, angle: Degree) {
        self.body.set_angle(angle);
    }

    /// Moves, shoots and releases the enemy once it leaves the field.
    /// Inactive enemies only move their bullets.
    pub fn update(
        &mut self,
        delta: FrameDelta,
        world: &WorldView,
        outbox: &mut Outbox,
    ) -> Result<(), PoolError> {
        let dt = delta.scaled;
        update_bullets(&mut self.bullets, dt, &world.bounds);
        if !self.body.active {
            return Ok(());
        }

        self.flash.advance_frame(delta);

        match self.kind {
            EnemyKind::Straight | EnemyKind::Aimer => self.advance_position(dt),
            EnemyKind::StayShot => {
                if self.travelled >= self.travel {
                    self.shoot(dt, None, outbox)?;
                } else {
                    self.advance_position(dt);
                    self.travelled += self.speed() * dt;
                }
            }
            EnemyKind::MoveShot => {
                self.advance_position(dt);
                let to_player = world.player - self.body.position;
                let seen = Degree::between(self.body.direction(), to_player)
                    <= self.viewing_angle.degrees();
                if seen {
                    self.shoot(dt, Some(world.player), outbox)?;
                }
            }
        }

        if !world.bounds.expanded(1.0).contains(self.body.position) {
            debug!(kind = ?self.kind, "enemy left the field");
            self.deactivate();
        }
        Ok(())
    }

    fn shoot(&mut self, dt: f32, aim: Option<Vec2>, outbox: &mut Outbox) -> Result<(), PoolError> {
        if !self.shot_timer.advance(dt) {
            return Ok(());
        }
        let muzzle = self.body.position + self.body.direction() * self.bullet_distance;
        let key = self.bullets.generate(muzzle)?;
        let bullet = &mut self.bullets[key];
        bullet.set_angle(self.body.angle());
        if let Some(target) = aim {
            bullet.look_at(target);
        }
        outbox.push(Cue::Sound(SoundCue::EnemyShot));
        Ok(())
    }

    /// Applies a hit from `weapon`.
    ///
    /// An enemy with a weakness ignores every other weapon and takes
    /// extra damage from its weakness. Life falling below zero destroys
    /// the enemy: destruction cues and item drops go to `outbox`.
    pub fn take_damage(&mut self, amount: f32, weapon: WeaponKind, outbox: &mut Outbox) -> HitOutcome {
        if !self.body.active || self.invincible || !self.is_hurt_by(weapon) {
            return HitOutcome::Ignored;
        }

        let multiplier = if self.weakness.is_some() {
            self.weakness_multiplier
        } else {
            1.0
        };
        self.life -= amount * multiplier;
        self.life_ratio = Ratio::new(self.life / self.life_max);

        if self.life < 0.0 {
            self.destroy(outbox);
            HitOutcome::Destroyed
        } else {
            self.flash.restart();
            outbox.push(Cue::Sound(SoundCue::EnemyDamaged));
            HitOutcome::Survived
        }
    }

    fn destroy(&mut self, outbox: &mut Outbox) {
        self.destroyed = true;
        outbox.push(Cue::Sound(SoundCue::EnemyDestroyed));
        outbox.push(Cue::EnemyDestroyed {
            kind: self.kind,
            weakness: self.weakness,
        });

        if self.drop_chance.roll(&mut self.rng) || self.weakness.is_some() {
            let bonus = if self.weakness.is_some() { self.bonus_drops } else { 0 };
            let count = self.drop_count.sample_int(&mut self.rng).max(0) as u32 + bonus;
            for _ in 0..count {
                if let Some(&kind) = self.drop_kinds.choose(&mut self.rng) {
                    outbox.push(Cue::ItemDropped {
                        kind,
                        position: self.body.position,
                    });
                }
            }
        }

        debug!(kind = ?self.kind, weakness = ?self.weakness, "enemy destroyed");
        self.deactivate();
    }
}

impl Clone for Enemy {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            body: self.body,
            life_max: self.life_max,
            life: self.life,
            life_ratio: self.life_ratio,
            hit_radius: self.hit_radius,
            invincible: self.invincible,
            weakness: self.weakness,
            weakness_multiplier: self.weakness_multiplier,
            shot_timer: self.shot_timer,
            bullets: Pool::with_seed(self.bullets.templates().to_vec(), self.rng.clone().random()),
            bullet_distance: self.bullet_distance,
            flash: self.flash,
            stay_distance: self.stay_distance,
            travel: self.travel,
            travelled: self.travelled,
            viewing_angle: self.viewing_angle,
            drop_chance: self.drop_chance,
            drop_count: self.drop_count,
            bonus_drops: self.bonus_drops,
            drop_kinds: self.drop_kinds.clone(),
            destroyed: self.destroyed,
            rng: self.rng.clone(),
        }
    }
}

impl std::fmt::Debug for Enemy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enemy")
            .field("kind", &self.kind)
            .field("position", &self.body.position)
            .field("active", &self.body.active)
            .field("life", &self.life)
            .field("weakness", &self.weakness)
            .finish_non_exhaustive()
    }
}

impl Poolable for Enemy {
    fn is_active(&self) -> bool {
        self.body.active
    }

    fn set_active(&mut self, active: bool) {
        self.body.active = active;
    }

    fn set_position(&mut self, position: Vec2) {
        self.body.position = position;
    }

    fn on_constructed(&mut self) {
        self.bullets.set_on_before_constructed(|bullet: &mut Bullet| {
            bullet.set_team(Team::Enemy);
            bullet.set_angle(Degree::HALF_TURN);
        });
    }

    fn on_acquired(&mut self) {
        self.life = self.life_max;
        self.life_ratio = Ratio::ONE;
        self.body.set_angle(Degree::HALF_TURN);
        self.weakness = None;
        self.invincible = false;
        self.destroyed = false;
        self.travelled = 0.0;
        self.flash.reset(true);
        self.shot_timer.restart();
    }

    fn on_released(&mut self) {
        // Bullets of an enemy that simply left play vanish with it.
        if !self.destroyed {
            self.bullets.deactivate_all();
        }
    }
}

impl Movable for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl HasWeakness for Enemy {
    fn weakness(&self) -> Option<WeaponKind> {
        self.weakness
    }
}
