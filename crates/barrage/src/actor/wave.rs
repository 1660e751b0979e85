//! Regular enemy spawning and the countdown to the boss.

use barrage_math::{Ratio, Vec2};
use barrage_pool::{Pool, PoolError, PoolKey, Poolable};
use barrage_timer::{FrameDelta, Timer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use super::boss::Summon;
use super::enemy::{Enemy, EnemyKind, HitOutcome};
use crate::body::{HasWeakness, Movable, WeaponKind};
use crate::config::{EnemyConfig, WaveConfig};
use crate::error::BarrageError;
use crate::services::Outbox;
use crate::world::WorldView;

/// What happened during one [`EnemyWave::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveSignal {
    Idle,
    Spawned(PoolKey),
    /// The countdown ran out: time for the boss. Raised once per stage,
    /// and wins over a spawn on the same tick.
    BossDue,
}

/// Spawns regular enemies on a timer until the boss is due.
///
/// The number of enemies on the field is capped; the cap and the spawn
/// rate both rise with the stage level and as the boss draws near.
#[derive(Debug)]
pub struct EnemyWave {
    cfg: WaveConfig,
    enemies: Pool<Enemy>,
    spawn_timer: Timer,
    boss_timer: Timer,
    /// Spawns since the pool was last forced to grow.
    spawned: u32,
    rng: StdRng,
}

impl EnemyWave {
    pub fn new(wave: &WaveConfig, enemy: &EnemyConfig, seed: u64) -> Self {
        let templates = EnemyKind::ALL
            .iter()
            .map(|&kind| Enemy::template(kind, enemy))
            .collect();
        Self {
            cfg: wave.clone(),
            enemies: Pool::with_seed(templates, seed),
            spawn_timer: Timer::new().with_interval(wave.spawn_seconds).looping().started(),
            boss_timer: Timer::new().with_interval(wave.boss_seconds).started(),
            spawned: 0,
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
        }
    }

    /// How close the boss is, from 0 at stage start to 1 when due.
    pub fn boss_progress(&self) -> Ratio {
        self.boss_timer.progress()
    }

    pub fn is_boss_due(&self) -> bool {
        self.boss_timer.is_terminated()
    }

    /// Most enemies allowed on the field at `level`.
    pub fn cap(&self, level: Ratio) -> usize {
        let buff = 1.0
            + self.cfg.count_max_level_buff * level.to_fraction()
            + self.cfg.count_max_progress_buff * self.boss_progress().to_fraction();
        (self.cfg.count_max as f32 * buff) as usize
    }

    /// Enemies currently on the field.
    pub fn active_count(&self) -> usize {
        self.enemies.active_count()
    }

    pub fn enemies(&self) -> &Pool<Enemy> {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut Pool<Enemy> {
        &mut self.enemies
    }

    /// Moves every enemy and its bullets, then spawns and counts down.
    /// Once the boss is due nothing new spawns, but enemies already out
    /// keep moving.
    pub fn tick(
        &mut self,
        delta: FrameDelta,
        world: &WorldView,
        outbox: &mut Outbox,
    ) -> Result<WaveSignal, BarrageError> {
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.update(delta, world, outbox)?;
        }

        if self.boss_timer.is_terminated() {
            return Ok(WaveSignal::Idle);
        }

        let mut signal = WaveSignal::Idle;
        if self.spawn_timer.advance_frame(delta) && self.active_count() < self.cap(world.level) {
            signal = WaveSignal::Spawned(self.spawn(world)?);
        }
        if self.boss_timer.advance_frame(delta) {
            info!(enemies = self.active_count(), "boss due");
            signal = WaveSignal::BossDue;
        }
        Ok(signal)
    }

    fn spawn(&mut self, world: &WorldView) -> Result<PoolKey, PoolError> {
        self.spawned += 1;
        let position = Vec2::new(self.cfg.spawn_x, self.cfg.spawn_y.sample(&mut self.rng));
        let key = if self.spawned >= self.cfg.instantiate_every {
            self.spawned = 0;
            self.enemies.instantiate(position)?
        } else {
            self.enemies.generate(position)?
        };
        self.enemies[key].spawn(&mut self.rng, world, &self.cfg);

        let level_buffed = self.cfg.spawn_seconds
            * (1.0 - self.cfg.spawn_level_buff.to_fraction() * world.level.to_fraction());
        let interval = level_buffed
            * (1.0 - self.cfg.spawn_progress_buff.to_fraction() * self.boss_progress().to_fraction());
        self.spawn_timer.set_interval(interval);

        debug!(%key, kind = ?self.enemies[key].kind(), interval, "enemy spawned");
        Ok(key)
    }

    /// Brings in an enemy the boss called, built from a random template.
    pub fn adopt(&mut self, summon: &Summon, world: &WorldView) -> Result<PoolKey, PoolError> {
        let mut enemy = self
            .enemies
            .templates()
            .choose(&mut self.rng)
            .cloned()
            .ok_or(PoolError::NoTemplates)?;
        enemy.on_constructed();
        enemy.set_position(summon.position);
        enemy.on_acquired();
        enemy.spawn(&mut self.rng, world, &self.cfg);
        enemy.set_angle(summon.angle);
        enemy.activate();
        let key = self.enemies.register(enemy);
        debug!(%key, "summoned enemy adopted");
        Ok(key)
    }

    /// Position of the live enemy closest to `point` that `weapon` can
    /// hurt.
    pub fn nearest_hurt_by(&self, point: Vec2, weapon: WeaponKind) -> Option<Vec2> {
        self.enemies
            .iter_active()
            .filter(|(_, enemy)| enemy.is_hurt_by(weapon))
            .map(|(_, enemy)| enemy.position())
            .min_by(|a, b| a.distance(point).total_cmp(&b.distance(point)))
    }

    /// Damages one enemy. Unknown keys are ignored.
    pub fn strike(
        &mut self,
        key: PoolKey,
        amount: f32,
        weapon: WeaponKind,
        outbox: &mut Outbox,
    ) -> HitOutcome {
        self.enemies
            .get_mut(key)
            .map_or(HitOutcome::Ignored, |enemy| enemy.take_damage(amount, weapon, outbox))
    }

    /// Clears the field and restarts both countdowns.
    pub fn restart(&mut self) {
        let cleared = self.enemies.deactivate_all();
        self.spawned = 0;
        self.spawn_timer.restart_with(self.cfg.spawn_seconds);
        self.boss_timer.restart_with(self.cfg.boss_seconds);
        info!(cleared, "wave restarted");
    }
}
