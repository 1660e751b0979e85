//! # Barrage
//!
//! Gameplay core of a side-scrolling shooter.
//!
//! The crate builds its actors out of three small engines, each in its own
//! crate and re-exported here:
//!
//! - [`Timer`](barrage_timer::Timer): per-tick countdowns that loop, stop
//!   or reset when they fire.
//! - [`Pool`](barrage_pool::Pool): recycles enemies, bullets, beams,
//!   items and UI cards instead of reallocating them.
//! - [`StateManager`](barrage_state::StateManager): labelled states with
//!   guarded transitions, driving the boss, beams, menus and mission
//!   cards.
//!
//! The [`Player`](actor::Player) fires from pooled bullets, bombs and
//! beams and resolves its own hits against the wave and the boss.
//!
//! Actors read the world through a [`WorldView`](world::WorldView)
//! snapshot and report side effects as [`Cue`](services::Cue)s in an
//! [`Outbox`](services::Outbox), which the game loop dispatches through
//! its [`Services`](services::Services).
//!
//! ## Quick Start
//!
//! ```rust
//! use barrage::prelude::*;
//!
//! # fn main() -> Result<(), BarrageError> {
//! let cfg = GameConfig::default();
//! let mut wave = EnemyWave::new(&cfg.wave, &cfg.enemy, 7);
//! let mut clock = StepClock::new(60);
//! let world = WorldView::default();
//! let mut outbox = Outbox::new();
//!
//! for _ in 0..120 {
//!     let info = clock.step();
//!     wave.tick(info.delta, &world, &mut outbox)?;
//! }
//! outbox.dispatch(&mut TracingServices);
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod body;
pub mod buff;
pub mod config;
mod error;
pub mod services;
pub mod ui;
pub mod world;

pub use error::BarrageError;

pub use barrage_math as math;
pub use barrage_pool as pool;
pub use barrage_state as state;
pub use barrage_tick as tick;
pub use barrage_timer as timer;

pub mod prelude {
    pub use barrage_math::{Degree, Gauge, Limit, Percentage, Ratio, Vec2};
    pub use barrage_pool::{Pool, PoolError, PoolKey, Poolable};
    pub use barrage_state::{Redirect, StateError, StateManager};
    pub use barrage_tick::{FrameClock, StepClock, TickConfig, TickInfo, TickPolicy};
    pub use barrage_timer::{FrameDelta, Timer};

    pub use crate::BarrageError;
    pub use crate::actor::{
        Beam, BeamPhase, Blast, Bomb, Boss, BossPhase, Bullet, Enemy, EnemyKind, EnemyWave, Flight,
        HitOutcome, Item, ItemDrops, ItemKind, Pickup, Player, PlayerBuffs, ShotKind, Summon,
        WaveSignal,
    };
    pub use crate::body::{Body, Damaging, HasWeakness, Movable, Team, WeaponKind};
    pub use crate::buff::{DecayBuff, GrowthBuff};
    pub use crate::config::GameConfig;
    pub use crate::services::{Cue, Outbox, Services, SoundCue, TracingServices};
    pub use crate::ui::{
        MenuDecision, MenuInput, MenuKind, MenuOverlay, MissionBoard, PauseControl, ProgressBar,
    };
    pub use crate::world::{Bounds, WeaponSet, WorldView};
}
