//! The player's ship: auto-fire, charge shots, stocked sub-weapons and
//! the pickups that buff them.

use barrage_math::{Degree, Gauge, Ratio, Vec2};
use barrage_pool::{Pool, PoolKey, Poolable};
use barrage_timer::{FrameDelta, Timer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::beam::Beam;
use super::bomb::Bomb;
use super::boss::Boss;
use super::bullet::{Bullet, Flight};
use super::enemy::HitOutcome;
use super::item::{ItemKind, Pickup};
use super::wave::EnemyWave;
use crate::body::{Body, Damaging, HasWeakness, Movable, Target, WeaponKind, overlaps};
use crate::config::{BeamConfig, BombConfig, PlayerConfig, SubWeaponConfig};
use crate::error::BarrageError;
use crate::services::{Cue, Outbox, SoundCue};
use crate::world::WorldView;

/// Movement pattern of the main weapon's bullets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotKind {
    Straight,
    /// Homes in on the nearest enemy the shot can hurt.
    Chase,
    /// Weaves on a sine path.
    Wave,
}

impl ShotKind {
    pub const ALL: [Self; 3] = [Self::Straight, Self::Chase, Self::Wave];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The next kind in [`ALL`](Self::ALL), wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Stats raised by pickups. Each starts at its minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBuffs {
    /// Damage multiplier of every weapon.
    pub damage: Gauge,
    /// Shortens the auto-fire interval.
    pub rapid_fire: Gauge,
    /// Extra bullet pairs per volley; its whole part also raises the
    /// sub-weapon stock.
    pub way: Gauge,
    /// Extra maximum life.
    pub life: Gauge,
}

impl PlayerBuffs {
    fn new(cfg: &PlayerConfig) -> Self {
        Self {
            damage: Gauge::new(cfg.damage),
            rapid_fire: Gauge::new(cfg.rapid_fire),
            way: Gauge::new(cfg.way),
            life: Gauge::new(cfg.extra_life),
        }
    }

    fn reset(&mut self) {
        self.damage.set_min();
        self.rapid_fire.set_min();
        self.way.set_min();
        self.life.set_min();
    }

    /// Bullet pairs added to each side of a volley.
    pub fn way_count(&self) -> u32 {
        self.way.value().max(0.0) as u32
    }
}

/// Stock and charge of one sub-weapon.
///
/// Stock refills one at a time while below the maximum. Once full, the
/// charge builds; a fuller charge makes the next use stronger.
#[derive(Debug, Clone)]
struct SubWeapon {
    kind: WeaponKind,
    stock: u32,
    recast: Timer,
    charge: Timer,
}

impl SubWeapon {
    fn new(kind: WeaponKind, cfg: &SubWeaponConfig) -> Self {
        Self {
            kind,
            stock: 0,
            recast: Timer::new().with_interval(cfg.recast_seconds).looping().started(),
            charge: Timer::new().with_interval(cfg.charge_seconds),
        }
    }

    fn restart(&mut self) {
        self.stock = 0;
        self.recast.restart();
        self.charge.reset(true);
    }

    fn update(&mut self, delta: FrameDelta, stock_max: u32, outbox: &mut Outbox) {
        if self.stock >= stock_max {
            if !self.charge.is_counting() && !self.charge.is_terminated() {
                self.charge.start();
            }
            if self.charge.advance_frame(delta) {
                outbox.push(Cue::Sound(SoundCue::Charged));
            }
        } else if self.recast.advance_frame(delta) {
            self.stock += 1;
            outbox.push(Cue::Sound(SoundCue::Recast));
            debug!(kind = ?self.kind, stock = self.stock, "sub-weapon restocked");
        }
    }

    /// Spends one stock and returns the charge it was used with.
    fn spend(&mut self) -> Option<Ratio> {
        if self.stock == 0 {
            return None;
        }
        self.stock -= 1;
        let charge = self.charge.progress();
        self.charge.reset(true);
        Some(charge)
    }
}

/// The player's ship.
///
/// The main weapon fires on its own. Holding a charge pauses it and the
/// release fires one stronger volley. Sub-weapons fire on request when
/// unlocked and stocked.
#[derive(Debug)]
pub struct Player {
    cfg: PlayerConfig,
    body: Body,
    life: f32,
    life_max: f32,
    alive: bool,
    buffs: PlayerBuffs,
    shot_kind: ShotKind,
    shots: [Pool<Bullet>; 3],
    shot_timer: Timer,
    charge: Timer,
    charging: bool,
    bombs: Pool<Bomb>,
    beams: Pool<Beam>,
    bomb: SubWeapon,
    beam: SubWeapon,
    reaction: Timer,
    catch_reaction: Timer,
    gameover: Timer,
    /// Hostiles overlapping the ship last tick. Ramming hurts on contact,
    /// not every tick of it.
    touching: Vec<Target>,
}

impl Player {
    /// `seed` drives the template choice of the weapon pools.
    pub fn new(cfg: &PlayerConfig, bomb: &BombConfig, beam: &BeamConfig, seed: u64) -> Self {
        let shots = ShotKind::ALL.map(|kind| {
            let flight = match kind {
                ShotKind::Straight => Flight::Straight,
                ShotKind::Chase => Flight::Chase {
                    accuracy: cfg.chase_accuracy,
                },
                ShotKind::Wave => Flight::Wave {
                    amplitude: cfg.wave_amplitude,
                    period: cfg.wave_period,
                },
            };
            let template = Bullet::new(cfg.bullet_speed, cfg.bullet_damage)
                .with_radius(cfg.bullet_radius)
                .with_flight(flight);
            Pool::with_seed(vec![template], seed.wrapping_add(kind.index() as u64))
        });

        let mut player = Self {
            cfg: cfg.clone(),
            body: Body::new(cfg.start_position, Degree::ZERO).with_speed(cfg.move_speed),
            life: cfg.life,
            life_max: cfg.life,
            alive: true,
            buffs: PlayerBuffs::new(cfg),
            shot_kind: ShotKind::Straight,
            shots,
            shot_timer: Timer::new().with_interval(cfg.shot_seconds).looping().started(),
            charge: Timer::new().with_interval(cfg.charge_seconds),
            charging: false,
            bombs: Pool::with_seed(vec![Bomb::new(bomb)], seed.wrapping_add(3)),
            beams: Pool::with_seed(vec![Beam::new(beam)], seed.wrapping_add(4)),
            bomb: SubWeapon::new(WeaponKind::Bomb, &cfg.bomb),
            beam: SubWeapon::new(WeaponKind::Beam, &cfg.beam),
            reaction: Timer::new().with_interval(cfg.reaction_seconds),
            catch_reaction: Timer::new().with_interval(cfg.catch_reaction_seconds),
            gameover: Timer::new().with_interval(cfg.gameover_seconds),
            touching: Vec::new(),
        };
        player.body.active = true;
        player
    }

    /// Back to the start of a stage: full life, no buffs, no stock, no
    /// shots in flight.
    pub fn restart(&mut self) {
        self.body.position = self.cfg.start_position;
        self.body.set_angle(Degree::ZERO);
        self.body.active = true;
        self.alive = true;
        self.life = self.cfg.life;
        self.life_max = self.cfg.life;
        self.buffs.reset();
        self.shot_kind = ShotKind::Straight;
        for pool in &mut self.shots {
            pool.deactivate_all();
        }
        self.bombs.deactivate_all();
        self.beams.deactivate_all();
        self.bomb.restart();
        self.beam.restart();
        self.shot_timer.restart_with(self.cfg.shot_seconds);
        self.charge.reset(true);
        self.charging = false;
        self.reaction.reset(true);
        self.catch_reaction.reset(true);
        self.gameover.reset(true);
        self.touching.clear();
        info!("player restarted");
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    /// Moves up (`axis > 0`) or down, staying inside the lane.
    pub fn move_vertical(&mut self, axis: f32, dt: f32) {
        if !self.alive {
            return;
        }
        let limit = self.cfg.move_limit;
        let y = self.body.position.y + axis.clamp(-1.0, 1.0) * self.body.speed * dt;
        self.body.position.y = y.clamp(-limit, limit);
    }

    pub fn select_shot(&mut self, kind: ShotKind) {
        self.shot_kind = kind;
    }

    /// Switches to the next main weapon and returns it.
    pub fn cycle_shot(&mut self) -> ShotKind {
        self.shot_kind = self.shot_kind.next();
        self.shot_kind
    }

    /// Starts charging the main weapon. Auto-fire holds until release.
    pub fn begin_charge(&mut self, outbox: &mut Outbox) {
        if !self.alive || self.charging {
            return;
        }
        self.charging = true;
        self.charge.restart();
        outbox.push(Cue::Sound(SoundCue::BeamCharge));
    }

    /// Fires the charged volley. Does nothing if not charging.
    pub fn release_charge(&mut self, near: Option<Vec2>, outbox: &mut Outbox) -> Result<(), BarrageError> {
        if !self.charging {
            return Ok(());
        }
        let charge = self.charge.progress();
        self.volley(Some(charge), near)?;
        self.charging = false;
        self.charge.reset(true);
        self.shot_timer.reset(false);
        outbox.push(Cue::Sound(SoundCue::ChargeShot));
        outbox.push(Cue::CameraShake {
            amplitude: 0.025 * charge.to_fraction(),
            seconds: 0.5,
        });
        debug!(charge = charge.to_fraction(), kind = ?self.shot_kind, "charge shot");
        Ok(())
    }

    /// Fires `kind` if it is unlocked and stocked. Returns whether it
    /// fired.
    pub fn use_sub_weapon(
        &mut self,
        kind: WeaponKind,
        world: &WorldView,
        outbox: &mut Outbox,
    ) -> Result<bool, BarrageError> {
        if !self.alive || !world.unlocked.contains(kind) {
            return Ok(false);
        }
        let damage_buff = self.buffs.damage.value();
        match kind {
            WeaponKind::Shot => Ok(false),
            WeaponKind::Bomb => {
                let Some(charge) = self.bomb.spend() else {
                    return Ok(false);
                };
                let launch = self.body.position + self.body.direction() * self.cfg.bullet_distance;
                let key = self.bombs.generate(launch)?;
                let bomb = &mut self.bombs[key];
                bomb.set_angle(self.body.angle());
                bomb.set_charge(charge);
                bomb.set_damage_buff(damage_buff);
                outbox.push(Cue::Sound(SoundCue::BombFire));
                debug!(charge = charge.to_fraction(), "bomb thrown");
                Ok(true)
            }
            WeaponKind::Beam => {
                let Some(charge) = self.beam.spend() else {
                    return Ok(false);
                };
                let anchor = self.beam_anchor();
                let key = self.beams.generate(anchor)?;
                let beam = &mut self.beams[key];
                beam.aim(self.body.angle());
                beam.set_charge(charge);
                beam.set_damage_buff(damage_buff);
                outbox.push(Cue::Sound(SoundCue::BeamFire));
                outbox.push(Cue::CameraShake {
                    amplitude: 0.1,
                    seconds: 1.5,
                });
                debug!(charge = charge.to_fraction(), "beam fired");
                Ok(true)
            }
        }
    }

    fn beam_anchor(&self) -> Vec2 {
        self.body.position + self.cfg.beam_offset
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Runs one tick. `near` is where chasing bullets should head.
    ///
    /// Shots, bombs and beams keep moving after death; the game-over cue
    /// is raised once, `gameover_seconds` after dying.
    pub fn update(
        &mut self,
        delta: FrameDelta,
        world: &WorldView,
        near: Option<Vec2>,
        outbox: &mut Outbox,
    ) -> Result<(), BarrageError> {
        let dt = delta.scaled;
        for pool in &mut self.shots {
            pool.for_each_active(|_, bullet| {
                if matches!(bullet.flight(), Flight::Chase { .. }) {
                    bullet.set_target(near);
                }
                bullet.update(dt, &world.bounds);
            });
        }
        self.bombs.for_each_active(|_, bomb| bomb.update(delta, outbox));
        let anchor = self.beam_anchor();
        for (_, beam) in self.beams.iter_mut() {
            if beam.is_active() {
                beam.follow(anchor);
                beam.update(delta)?;
            }
        }
        self.reaction.advance_frame(delta);
        self.catch_reaction.advance_frame(delta);

        if !self.alive {
            if self.gameover.advance_frame(delta) {
                info!("game over");
                outbox.push(Cue::Gameover);
            }
            return Ok(());
        }

        if self.charging {
            self.charge.advance_frame(delta);
        } else if self.shot_timer.advance_frame(delta) {
            self.volley(None, near)?;
            outbox.push(Cue::Sound(SoundCue::PlayerShot));
            self.shot_timer.set_interval(self.shot_interval());
        }

        let stock_max = self.stock_max();
        if world.unlocked.contains(WeaponKind::Bomb) {
            self.bomb.update(delta, stock_max, outbox);
        }
        if world.unlocked.contains(WeaponKind::Beam) {
            self.beam.update(delta, stock_max, outbox);
        }
        Ok(())
    }

    /// Seconds between volleys at the current rapid-fire buff.
    pub fn shot_interval(&self) -> f32 {
        let reduction = self.cfg.shot_reduction.to_ratio().to_fraction() * self.buffs.rapid_fire.value();
        self.cfg.shot_seconds * (1.0 - reduction)
    }

    /// Fires `1 + 2 * way` bullets fanned around the heading.
    fn volley(&mut self, charge: Option<Ratio>, near: Option<Vec2>) -> Result<(), BarrageError> {
        let way = self.buffs.way_count() as i32;
        let step = self.cfg.bullet_angle.degrees();
        let heading = self.body.angle().degrees();
        let damage = self.buffs.damage.value();
        let kind = self.shot_kind;
        let pool = &mut self.shots[kind.index()];

        for i in -way..=way {
            let angle = Degree::new(heading + step * i as f32);
            let muzzle = self.body.position + angle.unit_vector() * self.cfg.bullet_distance;
            let key = pool.generate(muzzle)?;
            let bullet = &mut pool[key];
            bullet.set_angle(angle);
            bullet.damage_buff = damage;
            bullet.set_target(near);
            if let Some(charge) = charge {
                let ratio = charge.to_fraction();
                bullet.pierces = true;
                bullet.damage_buff += self.cfg.charge_damage_buff * ratio;
                bullet.size_buff = 1.0 + ratio;
                // A piercing homing shot would circle its target forever.
                if kind == ShotKind::Chase {
                    bullet.pierces = false;
                    bullet.damage_buff += self.cfg.charged_chase_buff;
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Hits
    // -----------------------------------------------------------------------

    /// Where a chasing shot should head: the nearest enemy it can hurt,
    /// else the boss.
    pub fn chase_target(&self, wave: &EnemyWave, boss: &Boss) -> Option<Vec2> {
        wave.nearest_hurt_by(self.body.position, WeaponKind::Shot)
            .or_else(|| boss.is_active().then(|| boss.position()))
    }

    /// Resolves the player's shots, bombs and beams against enemies and
    /// the boss. Returns how many hits landed.
    pub fn strike(&mut self, wave: &mut EnemyWave, boss: &mut Boss, outbox: &mut Outbox) -> u32 {
        let enemies: Vec<(PoolKey, Vec2, f32, bool)> = wave
            .enemies()
            .iter_active()
            .map(|(key, enemy)| {
                (key, enemy.position(), enemy.hit_radius(), enemy.is_hurt_by(WeaponKind::Bomb))
            })
            .collect();
        let mut hits = 0;

        for pool in &mut self.shots {
            pool.for_each_active(|_, bullet| {
                for &(key, position, radius, _) in &enemies {
                    if !bullet.is_active() {
                        return;
                    }
                    if overlaps(bullet.position(), bullet.radius(), position, radius)
                        && bullet.touch(Target::Enemy(key))
                        && wave.strike(key, bullet.damage(), bullet.weapon(), outbox) != HitOutcome::Ignored
                    {
                        hits += 1;
                        bullet.on_hit();
                    }
                }
                if bullet.is_active()
                    && boss.is_active()
                    && overlaps(bullet.position(), bullet.radius(), boss.position(), boss.hit_radius())
                    && bullet.touch(Target::Boss)
                    && boss.take_damage(bullet.damage(), bullet.weapon(), outbox) != HitOutcome::Ignored
                {
                    hits += 1;
                    bullet.on_hit();
                }
            });
        }

        self.bombs.for_each_active(|_, bomb| {
            if !bomb.is_blasting() {
                let struck = enemies.iter().any(|&(_, position, radius, hurt)| {
                    hurt && overlaps(bomb.position(), bomb.hit_radius(), position, radius)
                }) || (boss.is_active()
                    && overlaps(bomb.position(), bomb.hit_radius(), boss.position(), boss.hit_radius()));
                if struck {
                    bomb.explode(outbox);
                }
                return;
            }
            for &(key, position, radius, _) in &enemies {
                if overlaps(bomb.position(), bomb.hit_radius(), position, radius)
                    && bomb.touch(Target::Enemy(key))
                    && wave.strike(key, bomb.damage(), WeaponKind::Bomb, outbox) != HitOutcome::Ignored
                {
                    hits += 1;
                }
            }
            if boss.is_active()
                && overlaps(bomb.position(), bomb.hit_radius(), boss.position(), boss.hit_radius())
                && bomb.touch(Target::Boss)
                && boss.take_damage(bomb.damage(), WeaponKind::Bomb, outbox) != HitOutcome::Ignored
            {
                hits += 1;
            }
        });

        for (_, beam) in self.beams.iter_mut() {
            if !beam.is_active() || !beam.is_attacking() {
                continue;
            }
            for &(key, position, radius, _) in &enemies {
                if beam.reaches(position, radius)
                    && beam.touch(Target::Enemy(key))
                    && wave.strike(key, beam.damage(), WeaponKind::Beam, outbox) != HitOutcome::Ignored
                {
                    hits += 1;
                }
            }
            if boss.is_active()
                && beam.reaches(boss.position(), boss.hit_radius())
                && beam.touch(Target::Boss)
                && boss.take_damage(beam.damage(), WeaponKind::Beam, outbox) != HitOutcome::Ignored
            {
                hits += 1;
            }
        }
        hits
    }

    /// Resolves everything hostile that touches the ship: rams, enemy and
    /// boss bullets, and boss beams.
    pub fn collide_hostiles(&mut self, wave: &mut EnemyWave, boss: &mut Boss, outbox: &mut Outbox) {
        if !self.alive {
            self.touching.clear();
            return;
        }
        let me = self.body.position;
        let reach = self.cfg.hit_radius;
        let mut incoming = Vec::new();

        let mut touching: Vec<Target> = wave
            .enemies()
            .iter_active()
            .filter(|(_, enemy)| overlaps(me, reach, enemy.position(), enemy.hit_radius()))
            .map(|(key, _)| Target::Enemy(key))
            .collect();
        if boss.is_active() && overlaps(me, reach, boss.position(), boss.hit_radius()) {
            touching.push(Target::Boss);
        }
        for target in &touching {
            if !self.touching.contains(target) {
                incoming.push(self.cfg.contact_damage);
            }
        }
        self.touching = touching;

        let mut shot_at = |bullet: &mut Bullet| {
            if overlaps(me, reach, bullet.position(), bullet.radius()) && bullet.touch(Target::Player) {
                incoming.push(bullet.damage());
                bullet.on_hit();
            }
        };
        for (_, enemy) in wave.enemies_mut().iter_mut() {
            enemy.bullets_mut().for_each_active(|_, bullet| shot_at(bullet));
        }
        boss.bullets_mut().for_each_active(|_, bullet| shot_at(bullet));

        for (_, beam) in boss.beams_mut().iter_mut() {
            if beam.is_active()
                && beam.is_attacking()
                && beam.reaches(me, reach)
                && beam.touch(Target::Player)
            {
                incoming.push(beam.damage());
            }
        }

        for amount in incoming {
            self.take_damage(amount, outbox);
        }
    }

    /// Loses `amount` life. Falling below zero kills the ship and starts
    /// the game-over countdown.
    pub fn take_damage(&mut self, amount: f32, outbox: &mut Outbox) -> HitOutcome {
        if !self.alive {
            return HitOutcome::Ignored;
        }
        self.life -= amount;
        self.reaction.restart();
        outbox.push(Cue::Sound(SoundCue::PlayerDamaged));
        outbox.push(Cue::CameraShake {
            amplitude: 0.05,
            seconds: 0.5,
        });

        if self.life < 0.0 {
            self.alive = false;
            self.charging = false;
            self.charge.reset(true);
            self.gameover.restart();
            outbox.push(Cue::Sound(SoundCue::PlayerDestroyed));
            outbox.push(Cue::CameraShake {
                amplitude: 0.5,
                seconds: 1.5,
            });
            info!("player destroyed");
            HitOutcome::Destroyed
        } else {
            HitOutcome::Survived
        }
    }

    // -----------------------------------------------------------------------
    // Pickups
    // -----------------------------------------------------------------------

    /// Raises the stat `pickup` names. A dead ship catches nothing.
    pub fn apply(&mut self, pickup: Pickup, outbox: &mut Outbox) {
        if !self.alive {
            return;
        }
        match pickup.kind {
            ItemKind::Damage => {
                self.buffs.damage.add(pickup.amount);
            }
            ItemKind::RapidFire => {
                self.buffs.rapid_fire.add(pickup.amount);
            }
            ItemKind::Way => {
                self.buffs.way.add(pickup.amount);
            }
            ItemKind::Life => {
                self.life_max = self.cfg.life + self.buffs.life.add(pickup.amount);
                self.life = (self.life + pickup.amount).min(self.life_max);
            }
            ItemKind::Heal => {
                self.life = (self.life + pickup.amount).min(self.life_max);
            }
        }
        self.catch_reaction.restart();
        outbox.push(Cue::Sound(SoundCue::ItemCaught));
        debug!(kind = ?pickup.kind, amount = pickup.amount, "item caught");
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn life_max(&self) -> f32 {
        self.life_max
    }

    pub fn life_ratio(&self) -> Ratio {
        Ratio::new(self.life / self.life_max)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the hit flash is showing.
    pub fn is_flashing(&self) -> bool {
        self.reaction.is_counting()
    }

    /// Fade of the pickup colour, 0 right after a catch.
    pub fn catch_reaction(&self) -> Option<Ratio> {
        self.catch_reaction.is_counting().then(|| self.catch_reaction.progress())
    }

    pub fn buffs(&self) -> &PlayerBuffs {
        &self.buffs
    }

    pub fn shot_kind(&self) -> ShotKind {
        self.shot_kind
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Main-weapon charge, 0 when not charging.
    pub fn charge(&self) -> Ratio {
        if self.charging {
            self.charge.progress()
        } else {
            Ratio::ZERO
        }
    }

    /// Most sub-weapon uses that can be stocked.
    pub fn stock_max(&self) -> u32 {
        self.buffs.way_count() + 1
    }

    pub fn stock(&self, kind: WeaponKind) -> u32 {
        self.sub_weapon(kind).map_or(0, |sub| sub.stock)
    }

    /// Charge of a sub-weapon's next use.
    pub fn sub_charge(&self, kind: WeaponKind) -> Ratio {
        self.sub_weapon(kind).map_or(Ratio::ZERO, |sub| sub.charge.progress())
    }

    fn sub_weapon(&self, kind: WeaponKind) -> Option<&SubWeapon> {
        match kind {
            WeaponKind::Shot => None,
            WeaponKind::Bomb => Some(&self.bomb),
            WeaponKind::Beam => Some(&self.beam),
        }
    }

    pub fn shots(&self, kind: ShotKind) -> &Pool<Bullet> {
        &self.shots[kind.index()]
    }

    pub fn bombs(&self) -> &Pool<Bomb> {
        &self.bombs
    }

    pub fn beams(&self) -> &Pool<Beam> {
        &self.beams
    }
}

impl Movable for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WeaponSet;

    const DT: FrameDelta = FrameDelta::fixed(0.125);

    fn cfg() -> PlayerConfig {
        PlayerConfig {
            shot_seconds: 0.25,
            charge_seconds: 1.0,
            bomb: SubWeaponConfig {
                recast_seconds: 0.5,
                charge_seconds: 0.5,
            },
            beam: SubWeaponConfig {
                recast_seconds: 0.5,
                charge_seconds: 0.5,
            },
            ..PlayerConfig::default()
        }
    }

    fn player() -> Player {
        Player::new(&cfg(), &BombConfig::default(), &BeamConfig::default(), 5)
    }

    fn armed() -> WorldView {
        WorldView {
            unlocked: WeaponSet::all(),
            ..WorldView::default()
        }
    }

    fn run(player: &mut Player, world: &WorldView, ticks: usize, outbox: &mut Outbox) {
        for _ in 0..ticks {
            player.update(DT, world, None, outbox).unwrap();
        }
    }

    fn pickup(kind: ItemKind, amount: f32) -> Pickup {
        Pickup { kind, amount }
    }

    fn live_angles(pool: &Pool<Bullet>) -> Vec<f32> {
        pool.iter_active()
            .map(|(_, bullet)| bullet.body().angle().degrees().round())
            .collect()
    }

    // =====================================================================
    // Main weapon
    // =====================================================================

    #[test]
    fn test_auto_fires_single_bullet() {
        let mut player = player();
        let mut outbox = Outbox::new();
        run(&mut player, &WorldView::default(), 2, &mut outbox);
        assert_eq!(player.shots(ShotKind::Straight).active_count(), 1);
        assert!(outbox.iter().any(|c| *c == Cue::Sound(SoundCue::PlayerShot)));
    }

    #[test]
    fn test_way_pickup_fans_the_volley() {
        let mut player = player();
        let mut outbox = Outbox::new();
        player.apply(pickup(ItemKind::Way, 1.5), &mut outbox);
        assert_eq!(player.buffs().way_count(), 1);
        assert_eq!(player.stock_max(), 2);

        run(&mut player, &WorldView::default(), 2, &mut outbox);
        assert_eq!(live_angles(player.shots(ShotKind::Straight)), vec![350.0, 0.0, 10.0]);
    }

    #[test]
    fn test_selected_kind_picks_the_pool() {
        let mut player = player();
        let mut outbox = Outbox::new();
        assert_eq!(player.cycle_shot(), ShotKind::Chase);
        run(&mut player, &WorldView::default(), 2, &mut outbox);
        assert_eq!(player.shots(ShotKind::Chase).active_count(), 1);
        assert_eq!(player.shots(ShotKind::Straight).active_count(), 0);
        player.select_shot(ShotKind::Wave);
        assert_eq!(player.cycle_shot(), ShotKind::Straight);
    }

    #[test]
    fn test_rapid_fire_shortens_interval() {
        let mut player = player();
        let mut outbox = Outbox::new();
        assert_eq!(player.shot_interval(), 0.25);
        player.apply(pickup(ItemKind::RapidFire, 0.5), &mut outbox);
        assert!((player.shot_interval() - 0.15).abs() < 1e-6);
        player.apply(pickup(ItemKind::RapidFire, 5.0), &mut outbox);
        assert!((player.shot_interval() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_charge_shot_pierces_and_hits_harder() {
        let mut player = player();
        let mut outbox = Outbox::new();
        player.begin_charge(&mut outbox);
        run(&mut player, &WorldView::default(), 8, &mut outbox);
        // Auto-fire holds while charging.
        assert_eq!(player.shots(ShotKind::Straight).active_count(), 0);
        assert_eq!(player.charge(), Ratio::ONE);

        outbox = Outbox::new();
        player.release_charge(None, &mut outbox).unwrap();
        let (_, bullet) = player.shots(ShotKind::Straight).iter_active().next().unwrap();
        assert!(bullet.pierces);
        assert_eq!(bullet.damage_buff, 3.0);
        assert_eq!(bullet.radius(), cfg().bullet_radius * 2.0);
        assert!(!player.is_charging());
        assert!(outbox.iter().any(|c| *c == Cue::Sound(SoundCue::ChargeShot)));
        assert!(outbox.iter().any(|c| *c == Cue::CameraShake { amplitude: 0.025, seconds: 0.5 }));
    }

    #[test]
    fn test_charged_chase_does_not_pierce() {
        let mut player = player();
        let mut outbox = Outbox::new();
        player.select_shot(ShotKind::Chase);
        player.begin_charge(&mut outbox);
        run(&mut player, &WorldView::default(), 4, &mut outbox);
        player.release_charge(Some(Vec2::new(0.0, 3.0)), &mut outbox).unwrap();

        let (_, bullet) = player.shots(ShotKind::Chase).iter_active().next().unwrap();
        assert!(!bullet.pierces);
        assert!((bullet.damage_buff - 2.1).abs() < 1e-6);
    }

    #[test]
    fn test_chase_bullets_home_on_target() {
        let mut player = player();
        let mut outbox = Outbox::new();
        player.select_shot(ShotKind::Chase);
        let world = WorldView::default();
        let above = Some(Vec2::new(-7.0, 4.0));
        for _ in 0..4 {
            player.update(DT, &world, above, &mut outbox).unwrap();
        }
        let (_, bullet) = player.shots(ShotKind::Chase).iter_active().next().unwrap();
        assert!(bullet.body().direction().y > 0.5);
    }

    // =====================================================================
    // Sub-weapons
    // =====================================================================

    #[test]
    fn test_sub_weapon_stocks_then_charges() {
        let mut player = player();
        let mut outbox = Outbox::new();
        let world = armed();

        run(&mut player, &world, 4, &mut outbox);
        assert_eq!(player.stock(WeaponKind::Bomb), 1);
        assert!(outbox.iter().any(|c| *c == Cue::Sound(SoundCue::Recast)));

        // Full stock: the charge builds instead.
        run(&mut player, &world, 4, &mut outbox);
        assert_eq!(player.stock(WeaponKind::Bomb), 1);
        assert_eq!(player.sub_charge(WeaponKind::Bomb), Ratio::ONE);
        assert!(outbox.iter().any(|c| *c == Cue::Sound(SoundCue::Charged)));
    }

    #[test]
    fn test_bomb_uses_stock_and_charge() {
        let mut player = player();
        let mut outbox = Outbox::new();
        let world = armed();
        run(&mut player, &world, 8, &mut outbox);

        assert!(player.use_sub_weapon(WeaponKind::Bomb, &world, &mut outbox).unwrap());
        assert_eq!(player.stock(WeaponKind::Bomb), 0);
        assert_eq!(player.sub_charge(WeaponKind::Bomb), Ratio::ZERO);
        let (_, bomb) = player.bombs().iter_active().next().unwrap();
        let launch = cfg().start_position + Vec2::new(cfg().bullet_distance, 0.0);
        let farthest = BombConfig::default().move_distance.max;
        assert_eq!(bomb.landing(), launch + Vec2::new(farthest, 0.0));

        assert!(!player.use_sub_weapon(WeaponKind::Bomb, &world, &mut outbox).unwrap());
    }

    #[test]
    fn test_beam_takes_charge_and_damage_buff() {
        let mut player = player();
        let mut outbox = Outbox::new();
        let world = armed();
        player.apply(pickup(ItemKind::Damage, 0.5), &mut outbox);
        run(&mut player, &world, 4, &mut outbox);

        assert!(player.use_sub_weapon(WeaponKind::Beam, &world, &mut outbox).unwrap());
        let (_, beam) = player.beams().iter_active().next().unwrap();
        assert_eq!(beam.damage(), BeamConfig::default().damage * 1.5);
        assert_eq!(beam.position(), cfg().start_position + cfg().beam_offset);
        assert!(outbox.iter().any(|c| *c == Cue::Sound(SoundCue::BeamFire)));
    }

    #[test]
    fn test_locked_sub_weapon_neither_stocks_nor_fires() {
        let mut player = player();
        let mut outbox = Outbox::new();
        let world = WorldView::default();
        run(&mut player, &world, 8, &mut outbox);
        assert_eq!(player.stock(WeaponKind::Beam), 0);
        assert!(!player.use_sub_weapon(WeaponKind::Beam, &world, &mut outbox).unwrap());
        assert!(!player.use_sub_weapon(WeaponKind::Shot, &armed(), &mut outbox).unwrap());
    }

    // =====================================================================
    // Pickups
    // =====================================================================

    #[test]
    fn test_damage_pickup_buffs_bullets() {
        let mut player = player();
        let mut outbox = Outbox::new();
        player.apply(pickup(ItemKind::Damage, 0.25), &mut outbox);
        assert_eq!(player.buffs().damage.value(), 1.25);
        assert!(outbox.iter().any(|c| *c == Cue::Sound(SoundCue::ItemCaught)));
        assert_eq!(player.catch_reaction(), Some(Ratio::ZERO));

        run(&mut player, &WorldView::default(), 2, &mut outbox);
        let (_, bullet) = player.shots(ShotKind::Straight).iter_active().next().unwrap();
        assert_eq!(bullet.damage(), cfg().bullet_damage * 1.25);
    }

    #[test]
    fn test_life_pickup_raises_max_and_heals() {
        let mut player = player();
        let mut outbox = Outbox::new();
        player.take_damage(30.0, &mut outbox);
        player.apply(pickup(ItemKind::Life, 20.0), &mut outbox);
        assert_eq!(player.life_max(), 120.0);
        assert_eq!(player.life(), 90.0);

        player.apply(pickup(ItemKind::Heal, 100.0), &mut outbox);
        assert_eq!(player.life(), 120.0);

        // The extra life gauge caps at its limit.
        player.apply(pickup(ItemKind::Life, 100.0), &mut outbox);
        assert_eq!(player.life_max(), 150.0);
        assert_eq!(player.life(), 150.0);
    }

    #[test]
    fn test_restart_clears_buffs_and_stock() {
        let mut player = player();
        let mut outbox = Outbox::new();
        let world = armed();
        player.apply(pickup(ItemKind::Way, 3.0), &mut outbox);
        player.apply(pickup(ItemKind::Life, 10.0), &mut outbox);
        run(&mut player, &world, 6, &mut outbox);
        assert!(player.stock(WeaponKind::Bomb) > 0);

        player.restart();
        assert_eq!(player.buffs().way_count(), 0);
        assert_eq!(player.life_max(), 100.0);
        assert_eq!(player.stock(WeaponKind::Bomb), 0);
        assert_eq!(player.shots(ShotKind::Straight).active_count(), 0);
    }

    // =====================================================================
    // Damage and death
    // =====================================================================

    #[test]
    fn test_death_stops_fire_and_raises_gameover_once() {
        let mut player = player();
        let mut outbox = Outbox::new();
        assert_eq!(player.take_damage(50.0, &mut outbox), HitOutcome::Survived);
        assert!(player.is_flashing());
        assert_eq!(player.take_damage(60.0, &mut outbox), HitOutcome::Destroyed);
        assert_eq!(player.take_damage(1.0, &mut outbox), HitOutcome::Ignored);
        assert!(outbox.iter().any(|c| *c == Cue::Sound(SoundCue::PlayerDestroyed)));

        outbox = Outbox::new();
        // Three seconds at eight ticks a second.
        run(&mut player, &WorldView::default(), 30, &mut outbox);
        assert_eq!(player.shots(ShotKind::Straight).active_count(), 0);
        let gameovers = outbox.iter().filter(|c| **c == Cue::Gameover).count();
        assert_eq!(gameovers, 1);

        player.apply(pickup(ItemKind::Heal, 10.0), &mut outbox);
        assert!(player.life() < 0.0);
    }

    #[test]
    fn test_moves_inside_the_lane() {
        let mut player = player();
        player.move_vertical(1.0, 0.25);
        assert_eq!(player.position().y, 2.0);
        player.move_vertical(5.0, 10.0);
        assert_eq!(player.position().y, 4.5);
        player.move_vertical(-1.0, 10.0);
        assert_eq!(player.position().y, -4.5);
    }
}
