//! Headless boss rush.
//!
//! Runs stages back to back with a scripted player: it auto-fires,
//! charges a shot now and then, switches main weapons and throws every
//! sub-weapon it has stocked. Waves run until the boss is due, then the
//! boss fight, then the clear or game-over menu picks what comes next.
//! Everything the actors ask for is logged through `tracing`.

use std::path::PathBuf;

use barrage::prelude::*;
use barrage::ui::MenuPhase;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Levels past this one play like it.
const MAX_LEVEL: u32 = 5;

/// Seconds between scripted charge shots, and how long each is held.
const CHARGE_EVERY: f32 = 6.0;
const CHARGE_HOLD: f32 = 2.0;

/// Seconds between main-weapon switches.
const SWITCH_EVERY: f32 = 15.0;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "boss-rush")]
#[command(about = "Run Barrage stages headless and log what happens")]
#[command(version)]
struct Args {
    /// JSON tuning file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Game seconds to simulate
    #[arg(short, long, default_value_t = 120.0)]
    seconds: f32,

    /// Step as fast as possible instead of in real time
    #[arg(long)]
    fast: bool,

    /// Tick rate in Hz
    #[arg(long, default_value_t = 60)]
    rate: u32,

    /// Seed for spawns, drops and missions
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Pause for a moment at this many seconds in
    #[arg(long)]
    pause_at: Option<f32>,
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

enum Clock {
    Real(FrameClock),
    Fast(StepClock),
}

impl Clock {
    async fn tick(&mut self) -> TickInfo {
        match self {
            Self::Real(clock) => clock.wait_for_tick().await,
            Self::Fast(clock) => clock.step(),
        }
    }

    fn end_tick(&mut self) {
        if let Self::Real(clock) = self {
            clock.record_tick_end();
        }
    }

    fn set_time_scale(&mut self, scale: f32) {
        match self {
            Self::Real(clock) => clock.set_time_scale(scale),
            Self::Fast(clock) => clock.set_time_scale(scale),
        }
    }
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Logs every cue and keeps the ones the stage must act on.
#[derive(Debug, Default)]
struct StageServices {
    log: TracingServices,
    kills: Vec<(EnemyKind, Option<WeaponKind>)>,
    drops: Vec<(ItemKind, Vec2)>,
    boss_defeated: bool,
    gameover: bool,
    decisions: Vec<MenuDecision>,
    time_scale: Option<f32>,
}

impl Services for StageServices {
    fn play_sound(&mut self, sound: SoundCue) {
        self.log.play_sound(sound);
    }

    fn shake_camera(&mut self, amplitude: f32, seconds: f32) {
        self.log.shake_camera(amplitude, seconds);
    }

    fn record_kill(&mut self, kind: EnemyKind, weakness: Option<WeaponKind>) {
        self.log.record_kill(kind, weakness);
        self.kills.push((kind, weakness));
    }

    fn drop_item(&mut self, kind: ItemKind, position: Vec2) {
        self.log.drop_item(kind, position);
        self.drops.push((kind, position));
    }

    fn boss_defeated(&mut self) {
        self.log.boss_defeated();
        self.boss_defeated = true;
    }

    fn gameover(&mut self) {
        self.log.gameover();
        self.gameover = true;
    }

    fn menu_decided(&mut self, decision: MenuDecision) {
        self.log.menu_decided(decision);
        self.decisions.push(decision);
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.log.set_time_scale(scale);
        self.time_scale = Some(scale);
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Summary {
    stages_cleared: u32,
    kills: u32,
    pickups: u32,
    deaths: u32,
    unlocked: Vec<WeaponKind>,
}

struct Stage {
    world: WorldView,
    level: u32,
    wave: EnemyWave,
    boss: Boss,
    player: Player,
    items: ItemDrops,
    missions: MissionBoard,
    menu: MenuOverlay,
    pause: PauseControl,
    charge_cycle: Timer,
    hold: Timer,
    switch_cycle: Timer,
    outbox: Outbox,
    services: StageServices,
    summary: Summary,
}

impl Stage {
    fn new(cfg: &GameConfig, seed: u64) -> Result<Self, BarrageError> {
        let world = WorldView::default();
        let mut missions = MissionBoard::new(&cfg.mission_ui, seed);
        missions.restart(locked_weapons(&world))?;
        Ok(Self {
            world,
            level: 0,
            wave: EnemyWave::new(&cfg.wave, &cfg.enemy, seed),
            boss: Boss::new(&cfg.boss, &cfg.beam, seed)?,
            player: Player::new(&cfg.player, &cfg.bomb, &cfg.beam, seed),
            items: ItemDrops::new(&cfg.item, seed),
            missions,
            menu: MenuOverlay::new(&cfg.menu)?,
            pause: PauseControl::new(&cfg.pause),
            charge_cycle: Timer::new().with_interval(CHARGE_EVERY).looping().started(),
            hold: Timer::new().with_interval(CHARGE_HOLD),
            switch_cycle: Timer::new().with_interval(SWITCH_EVERY).looping().started(),
            outbox: Outbox::new(),
            services: StageServices::default(),
            summary: Summary::default(),
        })
    }

    fn tick(&mut self, delta: FrameDelta) -> Result<(), BarrageError> {
        if let WaveSignal::BossDue = self.wave.tick(delta, &self.world, &mut self.outbox)? {
            self.boss.spawn(&self.world)?;
        }
        self.boss.tick(delta, &self.world, &mut self.outbox)?;
        for summon in self.boss.drain_summons() {
            self.wave.adopt(&summon, &self.world)?;
        }

        self.drive_player(delta)?;

        self.items.update(delta, &self.world);
        for pickup in self.items.pick_up(self.world.player, 1.0) {
            self.player.apply(pickup, &mut self.outbox);
            self.summary.pickups += 1;
        }

        for weapon in self.missions.update(delta)? {
            self.world.unlocked.insert(weapon);
            self.summary.unlocked.push(weapon);
        }

        if self.menu.phase() == Some(MenuPhase::Select) {
            self.menu.input(MenuInput::Confirm);
        }
        self.menu.update(delta, &mut self.outbox)?;
        self.pause.update(delta, &mut self.outbox);

        self.outbox.dispatch(&mut self.services);
        self.apply_services()
    }

    /// Plays the ship: weaves up and down, fires, then settles hits both
    /// ways.
    fn drive_player(&mut self, delta: FrameDelta) -> Result<(), BarrageError> {
        let near = self.player.chase_target(&self.wave, &self.boss);
        let weave = (self.wave.boss_progress().to_fraction() * 40.0).sin();
        self.player.move_vertical(weave, delta.scaled);

        if self.switch_cycle.advance_frame(delta) {
            let kind = self.player.cycle_shot();
            debug!(?kind, "main weapon switched");
        }
        if self.charge_cycle.advance_frame(delta) {
            self.player.begin_charge(&mut self.outbox);
            self.hold.restart();
        }
        if self.hold.advance_frame(delta) {
            self.player.release_charge(near, &mut self.outbox)?;
        }
        for weapon in [WeaponKind::Bomb, WeaponKind::Beam] {
            self.player.use_sub_weapon(weapon, &self.world, &mut self.outbox)?;
        }

        self.player.update(delta, &self.world, near, &mut self.outbox)?;
        self.player.strike(&mut self.wave, &mut self.boss, &mut self.outbox);
        self.player
            .collide_hostiles(&mut self.wave, &mut self.boss, &mut self.outbox);

        self.world.player = self.player.position();
        self.world.player_alive = self.player.is_alive();
        Ok(())
    }

    fn apply_services(&mut self) -> Result<(), BarrageError> {
        for (kind, weakness) in std::mem::take(&mut self.services.kills) {
            self.summary.kills += 1;
            self.missions.record(kind, weakness)?;
        }
        for (kind, position) in std::mem::take(&mut self.services.drops) {
            self.items.drop_item(kind, position)?;
        }
        if std::mem::take(&mut self.services.boss_defeated) {
            self.menu.call(MenuKind::Clear)?;
        }
        if std::mem::take(&mut self.services.gameover) {
            self.summary.deaths += 1;
            self.menu.call(MenuKind::Gameover)?;
        }
        for decision in std::mem::take(&mut self.services.decisions) {
            match decision {
                MenuDecision::NextLevel => {
                    self.summary.stages_cleared += 1;
                    self.level += 1;
                    self.restart()?;
                }
                MenuDecision::Retry => {
                    self.pause.end(&mut self.outbox);
                    self.restart()?;
                }
                MenuDecision::ToTitle => warn!("title screen is not part of the demo"),
                MenuDecision::Resume => debug!("resumed"),
            }
        }
        Ok(())
    }

    fn restart(&mut self) -> Result<(), BarrageError> {
        self.world.level = Ratio::new(self.level.min(MAX_LEVEL) as f32 / MAX_LEVEL as f32);
        self.wave.restart();
        self.boss.reset(self.world.level)?;
        self.player.restart();
        self.world.player = self.player.position();
        self.world.player_alive = true;
        self.items.restart();
        self.missions.restart(locked_weapons(&self.world))?;
        info!(level = self.level, "stage started");
        Ok(())
    }
}

fn locked_weapons(world: &WorldView) -> Vec<WeaponKind> {
    WeaponKind::ALL
        .into_iter()
        .filter(|&weapon| !world.unlocked.contains(weapon))
        .collect()
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

async fn run(args: Args) -> Result<Summary, BarrageError> {
    let cfg = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let mut clock = if args.fast {
        Clock::Fast(StepClock::new(args.rate))
    } else {
        Clock::Real(FrameClock::with_rate(args.rate))
    };
    let mut stage = Stage::new(&cfg, args.seed)?;
    info!(seconds = args.seconds, fast = args.fast, seed = args.seed, "boss rush started");

    let mut elapsed = 0.0;
    let mut pause_at = args.pause_at;
    while elapsed < args.seconds {
        let info = clock.tick().await;
        elapsed += info.delta.unscaled;

        if pause_at.is_some_and(|at| elapsed >= at) {
            pause_at = None;
            stage
                .pause
                .toggle(stage.world.player_alive, &mut stage.menu, &mut stage.outbox)?;
        }
        // Unpause once the pause menu is up.
        if stage.pause.is_paused() && !stage.pause.is_transitioning() {
            stage
                .pause
                .toggle(stage.world.player_alive, &mut stage.menu, &mut stage.outbox)?;
        }

        stage.tick(info.delta)?;
        if let Some(scale) = stage.services.time_scale.take() {
            clock.set_time_scale(scale);
        }
        clock.end_tick();
    }
    Ok(stage.summary)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(summary) => info!(
            stages = summary.stages_cleared,
            kills = summary.kills,
            pickups = summary.pickups,
            deaths = summary.deaths,
            unlocked = ?summary.unlocked,
            "boss rush finished"
        ),
        Err(err) => {
            error!(%err, "boss rush failed");
            std::process::exit(1);
        }
    }
}
