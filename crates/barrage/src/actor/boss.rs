//! The stage boss.
//!
//! The boss runs a fixed attack cycle once it has flown in:
//!
//! ```text
//! Approach ──→ MoveWait ──→ AimShot ──→ MoveShot ──→ BeamShot ──→ Summon
//!                 ▲                                                  │
//!                 └──────────────────────────────────────────────────┘
//! ```
//!
//! Counts and waits scale with the life the boss has lost and with the
//! stage level (see [`crate::buff`]).

use barrage_math::{Degree, Ratio, Vec2, easing};
use barrage_pool::{Pool, Poolable};
use barrage_state::StateManager;
use barrage_timer::{FrameDelta, Timer};
use tracing::{debug, info, trace};

use super::beam::Beam;
use super::bullet::{Bullet, update_bullets};
use super::enemy::HitOutcome;
use crate::body::{Body, Movable, Team, WeaponKind};
use crate::config::{BeamConfig, BossConfig};
use crate::error::BarrageError;
use crate::services::{Cue, Outbox, SoundCue};
use crate::ui::ProgressBar;
use crate::world::WorldView;

/// Boss behaviour phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossPhase {
    /// Flies in; cannot be hurt.
    Approach,
    /// Patrols until the move timer fires.
    MoveWait,
    /// Stands and fires aimed shots.
    AimShot,
    /// Patrols while firing straight shots.
    MoveShot,
    /// Fires a beam and waits.
    BeamShot,
    /// Calls in regular enemies and waits.
    Summon,
}

/// Where a summoned enemy should appear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summon {
    pub position: Vec2,
    pub angle: Degree,
}

/// What the phase callbacks read and write.
#[derive(Debug)]
struct BossBody {
    cfg: BossConfig,
    body: Body,
    life_max: f32,
    life: f32,
    life_ratio: Ratio,
    invincible: bool,
    approaching: bool,
    defeated: bool,

    /// Inputs of the current tick.
    dt: f32,
    level: Ratio,
    player: Vec2,

    timer: Timer,
    shot_count: u32,
    patrol_sign: f32,
    left_limit: Vec2,
    right_limit: Vec2,

    bullets: Pool<Bullet>,
    beams: Pool<Beam>,
    summons: Vec<Summon>,
    life_bar: ProgressBar,

    outbox: Outbox,
    fault: Option<BarrageError>,
}

impl BossBody {
    fn life_lost(&self) -> Ratio {
        self.life_ratio.reversed()
    }

    fn patrol(&mut self) {
        let step = self.body.left() * (self.patrol_sign * self.body.speed * self.dt);
        self.body.position += step;
    }

    /// Turns around at the patrol limits.
    fn flip_patrol(&mut self) {
        let (limit, axis) = if self.patrol_sign > 0.0 {
            (self.left_limit, self.body.left())
        } else {
            (self.right_limit, self.body.right())
        };
        if axis.dot(limit - self.body.position) < 0.0 {
            self.body.position = limit;
            self.patrol_sign = -self.patrol_sign;
        }
    }

    fn fire(&mut self, aim: Option<Vec2>) {
        let muzzle = self.cfg.muzzles[(self.shot_count % 2) as usize];
        match self.bullets.generate(self.body.position + muzzle) {
            Ok(key) => {
                let bullet = &mut self.bullets[key];
                bullet.set_angle(self.body.angle());
                if let Some(target) = aim {
                    bullet.look_at(target);
                }
                self.outbox.push(Cue::Sound(SoundCue::EnemyShot));
            }
            Err(err) => self.fault = Some(err.into()),
        }
    }

    fn fire_beam(&mut self) {
        let level = self.level;
        let wait = self.cfg.beam_wait_buff.value(self.cfg.beam_wait_seconds, self.life_lost(), level);
        self.timer.restart_with(wait);

        let damage_buff =
            self.cfg.beam_damage_debuff + self.cfg.beam_damage_buff.value(1.0, self.life_lost(), level);
        match self.beams.generate(self.body.position + self.cfg.beam_offset) {
            Ok(key) => {
                let beam = &mut self.beams[key];
                beam.set_damage_buff(damage_buff);
                beam.set_charge(level);
            }
            Err(err) => {
                self.fault = Some(err.into());
                return;
            }
        }

        self.outbox.push(Cue::CameraShake {
            amplitude: self.cfg.shake_amplitude,
            seconds: self.cfg.shake_seconds,
        });
        self.outbox.push(Cue::Sound(SoundCue::BeamCharge));
        self.outbox.push(Cue::Sound(SoundCue::BeamFire));
    }

    fn summon(&mut self) {
        let level = self.level;
        let wait = self
            .cfg
            .summon_wait_buff
            .value(self.cfg.summon_wait_seconds, self.life_lost(), level);
        self.timer.restart_with(wait);

        let count = self
            .cfg
            .summon_count_buff
            .count(self.cfg.summon_count, self.life_lost(), level);
        let spread = self.cfg.summon_angle;
        let step = spread / (count + 1) as f32;
        let mut angle = self.body.angle() - spread * 0.5 + step;
        for _ in 0..count {
            self.summons.push(Summon {
                position: self.body.position + angle.unit_vector() * self.cfg.summon_distance,
                angle: self.body.angle(),
            });
            angle += step;
        }
        debug!(count, "boss summons");
    }
}

type BossMachine = StateManager<BossPhase, BossBody>;

/// The boss and everything it fires.
pub struct Boss {
    core: BossBody,
    machine: BossMachine,
}

impl Boss {
    /// `seed` drives the template choice of the bullet and beam pools.
    pub fn new(cfg: &BossConfig, beam: &BeamConfig, seed: u64) -> Result<Self, BarrageError> {
        let body = Body::new(cfg.approach_from, Degree::HALF_TURN).with_speed(cfg.patrol_speed);
        let left_limit = cfg.approach_to + body.left() * cfg.patrol_distance;
        let right_limit = cfg.approach_to + body.right() * cfg.patrol_distance;

        let mut bullets = Pool::with_seed(vec![Bullet::new(cfg.bullet_speed, cfg.bullet_damage)], seed);
        bullets.set_on_before_constructed(|bullet: &mut Bullet| bullet.set_team(Team::Enemy));
        let mut beams = Pool::with_seed(vec![Beam::new(beam)], seed.wrapping_add(1));
        beams.set_on_before_constructed(|beam: &mut Beam| {
            beam.set_team(Team::Enemy);
            beam.aim(Degree::HALF_TURN);
        });

        let mut boss = Self {
            core: BossBody {
                cfg: cfg.clone(),
                body,
                life_max: cfg.life,
                life: cfg.life,
                life_ratio: Ratio::ONE,
                invincible: false,
                approaching: false,
                defeated: false,
                dt: 0.0,
                level: Ratio::ZERO,
                player: Vec2::ZERO,
                timer: Timer::new(),
                shot_count: 0,
                patrol_sign: 1.0,
                left_limit,
                right_limit,
                bullets,
                beams,
                summons: Vec::new(),
                life_bar: ProgressBar::new(),
                outbox: Outbox::new(),
                fault: None,
            },
            machine: Self::build_machine()?,
        };
        boss.reset(Ratio::ZERO)?;
        Ok(boss)
    }

    fn build_machine() -> Result<BossMachine, BarrageError> {
        let mut machine = StateManager::new();

        machine
            .add_state(BossPhase::Approach, |b: &mut BossBody| {
                b.timer.advance(b.dt);
                let t = easing::quad_out(b.timer.progress());
                b.body.position = b.cfg.approach_from.lerp(b.cfg.approach_to, t.to_fraction());
                b.life_bar.set_length_scale(t);
            })?
            .add_transition(BossPhase::MoveWait, |b: &mut BossBody| b.timer.is_terminated())
            .on_enter(|b: &mut BossBody| {
                b.approaching = true;
                b.invincible = true;
                b.timer.set_looping(false);
                b.timer.restart_with(b.cfg.approach_seconds);
                b.body.position = b.cfg.approach_from;
            })
            .on_exit(|b: &mut BossBody| {
                b.approaching = false;
                b.invincible = false;
                b.body.position = b.cfg.approach_to;
                b.life_bar.set_length_scale(Ratio::ONE);
            });

        machine
            .add_state(BossPhase::MoveWait, BossBody::patrol)?
            .add_transition(BossPhase::AimShot, |b: &mut BossBody| b.timer.advance(b.dt))
            .on_enter(|b: &mut BossBody| {
                b.body.speed = b.cfg.patrol_speed;
                let wait = b.cfg.move_seconds_buff.value(b.cfg.move_seconds, b.life_lost(), b.level);
                b.timer.restart_with(wait);
            });

        machine
            .add_state(BossPhase::AimShot, |b: &mut BossBody| {
                if b.timer.advance(b.dt) {
                    b.shot_count += 1;
                    let target = b.player;
                    b.fire(Some(target));
                }
            })?
            .add_transition(BossPhase::MoveShot, |b: &mut BossBody| {
                let count = b.cfg.aim_shot_count_buff.count(b.cfg.aim_shot_count, b.life_lost(), b.level);
                b.shot_count >= count
            })
            .on_enter(|b: &mut BossBody| {
                b.shot_count = 0;
                b.timer.set_looping(true);
                let interval = b
                    .cfg
                    .aim_shot_seconds_buff
                    .value(b.cfg.aim_shot_seconds, b.life_lost(), b.level);
                b.timer.restart_with(interval);
            })
            .on_exit(|b: &mut BossBody| b.timer.set_looping(false));

        machine
            .add_state(BossPhase::MoveShot, |b: &mut BossBody| {
                b.patrol();
                if b.timer.advance(b.dt) {
                    b.shot_count += 1;
                    b.fire(None);
                }
            })?
            .add_transition(BossPhase::BeamShot, |b: &mut BossBody| {
                let count = b.cfg.move_shot_count_buff.count(b.cfg.move_shot_count, b.life_lost(), b.level);
                b.shot_count >= count
            })
            .on_enter(|b: &mut BossBody| {
                b.body.speed = b.cfg.move_shot_speed;
                b.shot_count = 0;
                b.timer.set_looping(true);
                let interval = b
                    .cfg
                    .move_shot_seconds_buff
                    .value(b.cfg.move_shot_seconds, b.life_lost(), b.level);
                b.timer.restart_with(interval);
            })
            .on_exit(|b: &mut BossBody| b.timer.set_looping(false));

        machine
            .add_state(BossPhase::BeamShot, |_: &mut BossBody| {})?
            .add_transition(BossPhase::Summon, |b: &mut BossBody| b.timer.advance(b.dt))
            .on_enter(BossBody::fire_beam);

        machine
            .add_state(BossPhase::Summon, |_: &mut BossBody| {})?
            .add_transition(BossPhase::MoveWait, |b: &mut BossBody| b.timer.advance(b.dt))
            .on_enter(BossBody::summon);

        Ok(machine)
    }

    /// Puts the boss back at the start of its entrance, inactive, with
    /// life scaled for `level`. Bullets and beams in flight vanish.
    pub fn reset(&mut self, level: Ratio) -> Result<(), BarrageError> {
        let core = &mut self.core;
        core.level = level;
        core.defeated = false;
        core.life_max = (core.cfg.life * (1.0 + core.cfg.life_level_buff * level.to_fraction()))
            .max(f32::EPSILON);
        core.life = core.life_max;
        core.life_ratio = Ratio::ONE;
        core.life_bar.set_ratio(Ratio::ONE);
        core.patrol_sign = 1.0;
        core.summons.clear();
        core.bullets.deactivate_all();
        core.beams.deactivate_all();

        self.machine.set_current_label(BossPhase::Approach, &mut self.core)?;
        self.core.life_bar.hide();
        self.core.body.active = false;
        debug!(life = self.core.life_max, "boss reset");
        Ok(())
    }

    /// Resets for the current stage level and starts the entrance.
    pub fn spawn(&mut self, world: &WorldView) -> Result<(), BarrageError> {
        self.reset(world.level)?;
        self.core.player = world.player;
        self.core.body.active = true;
        info!(life = self.core.life_max, "boss spawned");
        Ok(())
    }

    /// Runs one tick: bullets and beams move, then the current phase
    /// behaves. Cues raised on the way are appended to `outbox`.
    pub fn tick(
        &mut self,
        delta: FrameDelta,
        world: &WorldView,
        outbox: &mut Outbox,
    ) -> Result<(), BarrageError> {
        let core = &mut self.core;
        update_bullets(&mut core.bullets, delta.scaled, &world.bounds);
        let anchor = core.body.position + core.cfg.beam_offset;
        for (_, beam) in core.beams.iter_mut() {
            if beam.is_active() {
                beam.follow(anchor);
                beam.update(delta)?;
            }
        }

        if core.body.active {
            core.dt = delta.scaled;
            core.level = world.level;
            core.player = world.player;

            if let Some(phase) = self.machine.behave(&mut self.core)? {
                trace!(?phase, "boss phase");
            }
            self.core.flip_patrol();
            self.core.life_bar.set_ratio(self.core.life_ratio);
        }

        outbox.append(&mut self.core.outbox);
        match self.core.fault.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Applies a hit. The boss has no weakness; it ignores hits while
    /// flying in. Life falling below zero defeats it.
    pub fn take_damage(&mut self, amount: f32, weapon: WeaponKind, outbox: &mut Outbox) -> HitOutcome {
        let core = &mut self.core;
        if !core.body.active || core.invincible {
            return HitOutcome::Ignored;
        }

        core.life -= amount;
        core.life_ratio = Ratio::new(core.life / core.life_max);
        core.life_bar.set_ratio(core.life_ratio);

        if core.life < 0.0 {
            core.defeated = true;
            core.body.active = false;
            core.beams.deactivate_all();
            outbox.push(Cue::Sound(SoundCue::EnemyDestroyed));
            outbox.push(Cue::BossDefeated);
            info!(?weapon, "boss defeated");
            HitOutcome::Destroyed
        } else {
            outbox.push(Cue::Sound(SoundCue::EnemyDamaged));
            HitOutcome::Survived
        }
    }

    /// Summon orders raised since the last call.
    pub fn drain_summons(&mut self) -> Vec<Summon> {
        std::mem::take(&mut self.core.summons)
    }

    pub fn phase(&self) -> Option<BossPhase> {
        self.machine.current_label()
    }

    pub fn life(&self) -> f32 {
        self.core.life
    }

    pub fn life_max(&self) -> f32 {
        self.core.life_max
    }

    pub fn life_ratio(&self) -> Ratio {
        self.core.life_ratio
    }

    pub fn life_bar(&self) -> &ProgressBar {
        &self.core.life_bar
    }

    pub fn is_active(&self) -> bool {
        self.core.body.active
    }

    pub fn is_approaching(&self) -> bool {
        self.core.approaching
    }

    pub fn is_invincible(&self) -> bool {
        self.core.invincible
    }

    pub fn is_defeated(&self) -> bool {
        self.core.defeated
    }

    pub fn position(&self) -> Vec2 {
        self.core.body.position
    }

    pub fn hit_radius(&self) -> f32 {
        self.core.cfg.hit_radius
    }

    pub fn bullets(&self) -> &Pool<Bullet> {
        &self.core.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut Pool<Bullet> {
        &mut self.core.bullets
    }

    pub fn beams(&self) -> &Pool<Beam> {
        &self.core.beams
    }

    pub fn beams_mut(&mut self) -> &mut Pool<Beam> {
        &mut self.core.beams
    }
}

impl std::fmt::Debug for Boss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Boss")
            .field("phase", &self.phase())
            .field("life", &self.core.life)
            .field("active", &self.core.body.active)
            .finish_non_exhaustive()
    }
}
